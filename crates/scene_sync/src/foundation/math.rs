//! Math utilities and types
//!
//! Provides the fundamental math types used across the scene and physics
//! subsystems, as thin aliases over nalgebra.

pub use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Convert euler angles in degrees (XYZ order) to a rotation quaternion
pub fn quat_from_euler_degrees(euler: [f32; 3]) -> Quat {
    Quat::from_euler_angles(
        euler[0].to_radians(),
        euler[1].to_radians(),
        euler[2].to_radians(),
    )
}

/// Convert euler angles in radians (XYZ order) to a rotation quaternion
pub fn quat_from_euler_radians(euler: [f32; 3]) -> Quat {
    Quat::from_euler_angles(euler[0], euler[1], euler[2])
}

/// Extract euler angles in degrees (XYZ order) from a rotation quaternion
pub fn euler_degrees_from_quat(rotation: &Quat) -> [f32; 3] {
    let (roll, pitch, yaw) = rotation.euler_angles();
    [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()]
}

/// Build a quaternion from raw xyzw components, renormalizing the input
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    Unit::new_normalize(Quaternion::new(w, x, y, z))
}

/// Build a `Vec3` from a descriptor-style array
pub fn vec3(components: [f32; 3]) -> Vec3 {
    Vec3::new(components[0], components[1], components[2])
}

/// Flatten a `Vec3` back into a descriptor-style array
pub fn array3(v: &Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}
