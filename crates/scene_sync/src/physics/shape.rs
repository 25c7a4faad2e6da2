//! Collision shape derivation
//!
//! Translates a visual shape descriptor plus the object's current scale into
//! a physics-appropriate collision shape. This is re-derived on every
//! transition into physics and never cached, because the object's scale may
//! have changed since the shape was authored.

use crate::config::ShapeConfig;
use crate::foundation::math::{Aabb, Vec3};

/// Collision shape descriptor consumed by the physics backend
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsShape {
    /// Box with full (not half) extents
    Box {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
        /// Extent along Z
        depth: f32,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Plane lying in the XZ world plane
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Z
        height: f32,
    },
    /// Cylinder, axis along Y
    Cylinder {
        /// Radius at the top cap
        radius_top: f32,
        /// Radius at the bottom cap
        radius_bottom: f32,
        /// Extent along Y
        height: f32,
    },
    /// Cone, axis along Y
    Cone {
        /// Base radius
        radius: f32,
        /// Extent along Y
        height: f32,
    },
    /// Torus in the XZ plane
    Torus {
        /// Ring radius
        radius: f32,
        /// Tube radius
        tube: f32,
    },
}

impl PhysicsShape {
    /// Conservative bounding half-extents, used by the reference backend
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => Vec3::new(width * 0.5, height * 0.5, depth * 0.5),
            Self::Sphere { radius } => Vec3::new(radius, radius, radius),
            Self::Plane { width, height } => Vec3::new(width * 0.5, 0.0, height * 0.5),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Self::Cone { radius, height } => Vec3::new(radius, height * 0.5, radius),
            Self::Torus { radius, tube } => {
                Vec3::new(radius + tube, tube, radius + tube)
            }
        }
    }
}

/// Derive the collision shape for a visual shape at the given scale
///
/// Sphere-like radii use the max scale component so scaled spheres stay
/// round instead of becoming ellipsoids. Plane height scales by Z because
/// planes are assumed to lie in the XZ world plane. Unrecognized shapes fall
/// back to a box around `world_aabb`, the render node's world-space bounds.
pub fn scaled_shape(shape: Option<&ShapeConfig>, scale: Vec3, world_aabb: Aabb) -> PhysicsShape {
    let max_xyz = scale.x.max(scale.y).max(scale.z);
    let max_xz = scale.x.max(scale.z);

    match shape {
        Some(&ShapeConfig::Box {
            width,
            height,
            depth,
        }) => PhysicsShape::Box {
            width: width * scale.x,
            height: height * scale.y,
            depth: depth * scale.z,
        },
        Some(&ShapeConfig::Sphere { radius }) => PhysicsShape::Sphere {
            radius: radius * max_xyz,
        },
        Some(&ShapeConfig::Plane { width, height }) => PhysicsShape::Plane {
            width: width * scale.x,
            height: height * scale.z,
        },
        Some(&ShapeConfig::Cylinder {
            radius_top,
            radius_bottom,
            height,
        }) => PhysicsShape::Cylinder {
            radius_top: radius_top * max_xz,
            radius_bottom: radius_bottom * max_xz,
            height: height * scale.y,
        },
        Some(&ShapeConfig::Cone { radius, height }) => PhysicsShape::Cone {
            radius: radius * max_xz,
            height: height * scale.y,
        },
        Some(&ShapeConfig::Torus { radius, tube }) => PhysicsShape::Torus {
            radius: radius * max_xz,
            tube: tube * max_xyz,
        },
        Some(&ShapeConfig::Other) | None => {
            let size = world_aabb.size();
            PhysicsShape::Box {
                width: size.x,
                height: size.y,
                depth: size.z,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_aabb() -> Aabb {
        Aabb::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5))
    }

    fn identity() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_identity_scale_preserves_all_shapes() {
        let shapes = [
            ShapeConfig::Box {
                width: 2.0,
                height: 3.0,
                depth: 4.0,
            },
            ShapeConfig::Sphere { radius: 1.5 },
            ShapeConfig::Plane {
                width: 10.0,
                height: 20.0,
            },
            ShapeConfig::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.7,
                height: 2.0,
            },
            ShapeConfig::Cone {
                radius: 0.5,
                height: 1.0,
            },
            ShapeConfig::Torus {
                radius: 1.0,
                tube: 0.25,
            },
        ];

        for shape in &shapes {
            let scaled = scaled_shape(Some(shape), identity(), unit_aabb());
            match (shape, &scaled) {
                (
                    &ShapeConfig::Box {
                        width,
                        height,
                        depth,
                    },
                    &PhysicsShape::Box {
                        width: w,
                        height: h,
                        depth: d,
                    },
                ) => {
                    assert_relative_eq!(width, w);
                    assert_relative_eq!(height, h);
                    assert_relative_eq!(depth, d);
                }
                (&ShapeConfig::Sphere { radius }, &PhysicsShape::Sphere { radius: r }) => {
                    assert_relative_eq!(radius, r);
                }
                (
                    &ShapeConfig::Plane { width, height },
                    &PhysicsShape::Plane {
                        width: w,
                        height: h,
                    },
                ) => {
                    assert_relative_eq!(width, w);
                    assert_relative_eq!(height, h);
                }
                (
                    &ShapeConfig::Cylinder {
                        radius_top,
                        radius_bottom,
                        height,
                    },
                    &PhysicsShape::Cylinder {
                        radius_top: rt,
                        radius_bottom: rb,
                        height: h,
                    },
                ) => {
                    assert_relative_eq!(radius_top, rt);
                    assert_relative_eq!(radius_bottom, rb);
                    assert_relative_eq!(height, h);
                }
                (
                    &ShapeConfig::Cone { radius, height },
                    &PhysicsShape::Cone {
                        radius: r,
                        height: h,
                    },
                ) => {
                    assert_relative_eq!(radius, r);
                    assert_relative_eq!(height, h);
                }
                (
                    &ShapeConfig::Torus { radius, tube },
                    &PhysicsShape::Torus {
                        radius: r,
                        tube: t,
                    },
                ) => {
                    assert_relative_eq!(radius, r);
                    assert_relative_eq!(tube, t);
                }
                (config, derived) => {
                    panic!("shape kind changed: {:?} became {:?}", config, derived)
                }
            }
        }
    }

    #[test]
    fn test_sphere_uses_max_scale_component() {
        let shape = ShapeConfig::Sphere { radius: 1.0 };
        let scaled = scaled_shape(Some(&shape), Vec3::new(1.0, 3.0, 2.0), unit_aabb());
        assert_eq!(scaled, PhysicsShape::Sphere { radius: 3.0 });
    }

    #[test]
    fn test_plane_height_scales_by_z() {
        let shape = ShapeConfig::Plane {
            width: 2.0,
            height: 2.0,
        };
        let scaled = scaled_shape(Some(&shape), Vec3::new(2.0, 5.0, 3.0), unit_aabb());
        assert_eq!(
            scaled,
            PhysicsShape::Plane {
                width: 4.0,
                height: 6.0,
            }
        );
    }

    #[test]
    fn test_cylinder_radius_ignores_y_scale() {
        let shape = ShapeConfig::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 1.0,
        };
        let scaled = scaled_shape(Some(&shape), Vec3::new(2.0, 10.0, 3.0), unit_aabb());
        assert_eq!(
            scaled,
            PhysicsShape::Cylinder {
                radius_top: 3.0,
                radius_bottom: 3.0,
                height: 10.0,
            }
        );
    }

    #[test]
    fn test_unknown_shape_falls_back_to_world_aabb() {
        let aabb = Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 4.0, 2.0));
        let scaled = scaled_shape(Some(&ShapeConfig::Other), identity(), aabb);
        assert_eq!(
            scaled,
            PhysicsShape::Box {
                width: 2.0,
                height: 4.0,
                depth: 4.0,
            }
        );
    }
}
