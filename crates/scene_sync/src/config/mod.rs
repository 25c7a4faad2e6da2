//! Scene descriptor data model
//!
//! The declarative JSON boundary of the engine. A scene is a JSON array of
//! object descriptors; every descriptor is a closed, tagged type here rather
//! than an open property bag, with an explicit unsupported terminal per tag.
//!
//! Colors are decimal integers in both input and exported output. A lenient
//! pre-parse step rewrites `0x..` literals to decimal before structural
//! parsing, and malformed JSON yields an empty scene rather than an error.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{self, Quat};
use crate::physics::backend::MotionType;

/// Top-level object classification, dispatched on the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Ambient scene configuration (background, fog, gravity, camera);
    /// does not create a scene object
    Scene,
    /// Light source
    Light,
    /// Visual helper (grid, axes)
    Helper,
    /// Renderable mesh (the default when `type` is absent)
    #[default]
    Mesh,
    /// Container grouping child descriptors
    Group,
}

/// Geometry descriptor, dispatched on `shape.type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeConfig {
    /// Axis-aligned box
    Box {
        /// Extent along X
        #[serde(default = "default_dim")]
        width: f32,
        /// Extent along Y
        #[serde(default = "default_dim")]
        height: f32,
        /// Extent along Z
        #[serde(default = "default_dim")]
        depth: f32,
    },
    /// Sphere
    Sphere {
        /// Base radius
        #[serde(default = "default_radius")]
        radius: f32,
    },
    /// Plane lying in the XZ world plane
    Plane {
        /// Extent along X
        #[serde(default = "default_dim")]
        width: f32,
        /// Extent along Z
        #[serde(default = "default_dim")]
        height: f32,
    },
    /// Cylinder, axis along Y
    #[serde(rename_all = "camelCase")]
    Cylinder {
        /// Radius at the top cap
        #[serde(default = "default_radius")]
        radius_top: f32,
        /// Radius at the bottom cap
        #[serde(default = "default_radius")]
        radius_bottom: f32,
        /// Extent along Y
        #[serde(default = "default_dim")]
        height: f32,
    },
    /// Cone, axis along Y
    Cone {
        /// Base radius
        #[serde(default = "default_radius")]
        radius: f32,
        /// Extent along Y
        #[serde(default = "default_dim")]
        height: f32,
    },
    /// Torus in the XZ plane
    Torus {
        /// Ring radius
        #[serde(default = "default_radius")]
        radius: f32,
        /// Tube radius
        #[serde(default = "default_tube")]
        tube: f32,
    },
    /// Unsupported shape type (terminal case)
    #[serde(other)]
    Other,
}

/// Material classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Physically-based standard material (the default)
    #[default]
    Standard,
    /// Unlit flat-color material
    Basic,
    /// Classic specular material
    Phong,
    /// Unsupported material type (terminal case)
    #[serde(other)]
    Other,
}

/// Material descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Material classification
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    /// Color as a decimal integer (never hex literals or strings)
    pub color: u32,
    /// Base opacity in `0..=1`
    pub opacity: f32,
    /// Metalness in `0..=1` (standard materials)
    pub metalness: f32,
    /// Roughness in `0..=1` (standard materials)
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: 0x88_88_88,
            opacity: 1.0,
            metalness: 0.0,
            roughness: 0.8,
        }
    }
}

/// Light classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Omnidirectional fill light
    #[default]
    Ambient,
    /// Parallel-ray light
    Directional,
    /// Point light
    Point,
    /// Unsupported light type (terminal case)
    #[serde(other)]
    Other,
}

/// Light descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Light classification
    #[serde(rename = "type")]
    pub kind: LightKind,
    /// Color as a decimal integer
    pub color: u32,
    /// Light intensity
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            kind: LightKind::Ambient,
            color: 0xFF_FF_FF,
            intensity: 1.0,
        }
    }
}

/// Helper classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelperKind {
    /// Ground grid
    #[default]
    Grid,
    /// Axis gizmo
    Axes,
    /// Unsupported helper type (terminal case)
    #[serde(other)]
    Other,
}

/// Helper descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    /// Helper classification
    #[serde(rename = "type")]
    pub kind: HelperKind,
    /// Helper size in world units
    pub size: f32,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            kind: HelperKind::Grid,
            size: 10.0,
        }
    }
}

/// Per-object physics descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Motion classification of the body
    pub motion_type: MotionType,
    /// Mass in kilograms; meaningful only for dynamic bodies
    pub mass: f32,
    /// Surface friction coefficient
    pub friction: f32,
    /// Surface restitution (bounciness)
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            motion_type: MotionType::Static,
            mass: 1.0,
            friction: 0.2,
            restitution: 0.0,
        }
    }
}

/// Fog descriptor for the ambient scene configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    /// Fog color as a decimal integer
    pub color: u32,
    /// Distance at which fog starts
    pub near: f32,
    /// Distance at which fog fully occludes
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: 0xCC_CC_CC,
            near: 10.0,
            far: 100.0,
        }
    }
}

/// Camera rig configuration; round-trips unchanged through get/set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Camera position
    pub position: [f32; 3],
    /// Point the camera looks at
    pub look_at: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Whether user camera controls are locked out
    pub locked: bool,
    /// Orbit pivot point
    pub orbit_target: [f32; 3],
    /// Whether orbit controls are active
    pub orbit_enabled: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 5.0],
            look_at: [0.0, 0.0, 0.0],
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            locked: false,
            orbit_target: [0.0, 0.0, 0.0],
            orbit_enabled: true,
        }
    }
}

/// Ambient scene configuration, updated by `type == "scene"` descriptors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Background color as a decimal integer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<u32>,
    /// Fog configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog: Option<FogConfig>,
    /// Gravity vector handed to the physics engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<[f32; 3]>,
    /// Camera rig configuration
    pub camera: CameraConfig,
}

/// One element of the declarative scene array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Stable logical identity; generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Object classification
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Position
    pub pos: [f32; 3],
    /// Rotation: 4 components are a quaternion (xyzw), 3 are radians euler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rot: Option<Vec<f32>>,
    /// Euler rotation in degrees; takes precedence over `rot`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub euler: Option<[f32; 3]>,
    /// Scale factors
    pub scale: [f32; 3],
    /// Layer membership; defaults to `"main"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Per-object visibility flag; defaults to `true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Geometry descriptor (meshes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeConfig>,
    /// Material descriptor (meshes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialConfig>,
    /// Light descriptor (`type == "light"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<LightConfig>,
    /// Helper descriptor (`type == "helper"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper: Option<HelperConfig>,
    /// Physics attachment descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physics: Option<PhysicsConfig>,
    /// Radial-gravity attraction strength; a static sphere carrying this
    /// becomes the attractor center when attached to physics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction: Option<f32>,
    /// Background color (`type == "scene"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<u32>,
    /// Fog configuration (`type == "scene"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog: Option<FogConfig>,
    /// Gravity vector (`type == "scene"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<[f32; 3]>,
    /// Camera configuration (`type == "scene"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraConfig>,
    /// Child descriptors (`type == "group"`); stored and re-exported as-is
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectConfig>,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            kind: ObjectKind::Mesh,
            pos: [0.0; 3],
            rot: None,
            euler: None,
            scale: [1.0; 3],
            layer: None,
            enabled: None,
            shape: None,
            material: None,
            light: None,
            helper: None,
            physics: None,
            attraction: None,
            background: None,
            fog: None,
            gravity: None,
            camera: None,
            children: Vec::new(),
        }
    }
}

impl ObjectConfig {
    /// Resolve the rotation fields into a quaternion using the engine-wide
    /// precedence rule (see [`resolve_rotation`])
    pub fn rotation(&self) -> Quat {
        resolve_rotation(self.euler, self.rot.as_deref())
    }
}

/// Partial descriptor accepted by `update`; only present fields are applied
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPatch {
    /// New position
    pub pos: Option<[f32; 3]>,
    /// New rotation (3 = radians euler, 4 = quaternion xyzw)
    pub rot: Option<Vec<f32>>,
    /// New euler rotation in degrees; wins over `rot`
    pub euler: Option<[f32; 3]>,
    /// New scale
    pub scale: Option<[f32; 3]>,
    /// New layer membership
    pub layer: Option<String>,
    /// New visibility flag
    pub enabled: Option<bool>,
    /// Replacement geometry; reconstructs only the geometry sub-resource
    pub shape: Option<ShapeConfig>,
    /// Replacement material; reconstructs only the material sub-resource
    pub material: Option<MaterialConfig>,
}

/// Rotation precedence rule shared by every entry point that accepts
/// rotation: `euler` (degrees) wins; else a 4-component `rot` is a
/// quaternion (xyzw); else a 3-component `rot` is radians euler.
pub fn resolve_rotation(euler: Option<[f32; 3]>, rot: Option<&[f32]>) -> Quat {
    if let Some(degrees) = euler {
        return math::quat_from_euler_degrees(degrees);
    }
    match rot {
        Some([x, y, z, w]) => math::quat_from_xyzw(*x, *y, *z, *w),
        Some([x, y, z]) => math::quat_from_euler_radians([*x, *y, *z]),
        _ => Quat::identity(),
    }
}

/// Parse a JSON scene array leniently
///
/// `0x..` numeric literals are rewritten to decimal before structural
/// parsing. Malformed JSON yields an empty scene with a warning, never an
/// error.
pub fn parse_scene_json(text: &str) -> Vec<ObjectConfig> {
    let rewritten = rewrite_hex_literals(text);
    match serde_json::from_str::<Vec<ObjectConfig>>(&rewritten) {
        Ok(objects) => objects,
        Err(err) => {
            log::warn!("Malformed scene JSON, loading empty scene: {}", err);
            Vec::new()
        }
    }
}

/// Rewrite bare `0x..` numeric literals to their decimal value
///
/// String contents are left untouched. Literals that overflow `u64` are
/// passed through unchanged and left for the structural parser to reject.
fn rewrite_hex_literals(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < bytes.len() {
                out.push(bytes[i + 1] as char);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
            continue;
        }
        if c == '0' && i + 2 < bytes.len() && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
            let start = i + 2;
            let mut end = start;
            while end < bytes.len() && (bytes[end] as char).is_ascii_hexdigit() {
                end += 1;
            }
            if end > start {
                if let Ok(value) = u64::from_str_radix(&text[start..end], 16) {
                    out.push_str(&value.to_string());
                    i = end;
                    continue;
                }
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

fn default_dim() -> f32 {
    1.0
}

fn default_radius() -> f32 {
    0.5
}

fn default_tube() -> f32 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_applied() {
        let objects = parse_scene_json(r#"[{"shape": {"type": "box"}}]"#);
        assert_eq!(objects.len(), 1);

        let obj = &objects[0];
        assert_eq!(obj.kind, ObjectKind::Mesh);
        assert_eq!(obj.pos, [0.0; 3]);
        assert_eq!(obj.scale, [1.0; 3]);
        assert_eq!(
            obj.shape,
            Some(ShapeConfig::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0
            })
        );
    }

    #[test]
    fn test_hex_literals_rewritten() {
        let objects =
            parse_scene_json(r#"[{"material": {"type": "basic", "color": 0xFF0000}}]"#);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].material.as_ref().unwrap().color, 16_711_680);
    }

    #[test]
    fn test_hex_inside_strings_untouched() {
        let objects = parse_scene_json(r#"[{"name": "0xFF"}]"#);
        assert_eq!(objects[0].name.as_deref(), Some("0xFF"));
    }

    #[test]
    fn test_malformed_json_yields_empty_scene() {
        assert!(parse_scene_json("[{").is_empty());
        assert!(parse_scene_json("not json at all").is_empty());
    }

    #[test]
    fn test_unknown_shape_is_terminal_variant() {
        let objects = parse_scene_json(r#"[{"shape": {"type": "dodecahedron"}}]"#);
        assert_eq!(objects[0].shape, Some(ShapeConfig::Other));
    }

    #[test]
    fn test_rotation_precedence_euler_wins() {
        // euler in degrees beats a rot quaternion
        let q = resolve_rotation(Some([0.0, 90.0, 0.0]), Some(&[0.0, 0.0, 0.0, 1.0]));
        let expected = crate::foundation::math::quat_from_euler_degrees([0.0, 90.0, 0.0]);
        assert_relative_eq!(q, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_four_components_is_quaternion() {
        let q = resolve_rotation(None, Some(&[0.0, 0.0, 0.0, 1.0]));
        assert_relative_eq!(q, Quat::identity(), epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_three_components_is_radians() {
        let q = resolve_rotation(None, Some(&[0.0, std::f32::consts::FRAC_PI_2, 0.0]));
        let expected = crate::foundation::math::quat_from_euler_radians([
            0.0,
            std::f32::consts::FRAC_PI_2,
            0.0,
        ]);
        assert_relative_eq!(q, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_config_round_trip() {
        let camera = CameraConfig {
            position: [1.0, 2.0, 3.0],
            look_at: [0.0, 1.0, 0.0],
            fov: 60.0,
            near: 0.5,
            far: 500.0,
            locked: true,
            orbit_target: [0.0, 1.0, 0.0],
            orbit_enabled: false,
        };
        let json = serde_json::to_string(&camera).unwrap();
        let back: CameraConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(camera, back);
    }

    #[test]
    fn test_colors_serialize_as_decimal_integers() {
        let material = MaterialConfig {
            color: 16_711_680,
            ..MaterialConfig::default()
        };
        let json = serde_json::to_string(&material).unwrap();
        assert!(json.contains("16711680"));
        assert!(!json.contains("0x"));
    }
}
