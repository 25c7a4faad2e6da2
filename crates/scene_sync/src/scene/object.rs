//! Scene object and layer types

use serde::{Deserialize, Serialize};

use crate::config::{ObjectConfig, PhysicsConfig};
use crate::physics::BodyKey;
use crate::render::RenderKey;

/// One logical scene object
///
/// Identity is the caller-supplied name (or a generated fallback). Every
/// live object has exactly one render handle and belongs to exactly one
/// layer. The physics body, when present, is owned by the physics world;
/// `body` is a weak back-reference that must be released explicitly.
#[derive(Debug)]
pub struct SceneObject {
    /// Stable logical identity
    pub name: String,
    /// Full declarative descriptor; canonical source of truth for export
    pub config: ObjectConfig,
    /// Render-engine handle, exclusively owned by the registry
    pub render_key: RenderKey,
    /// Layer membership
    pub layer: String,
    /// Per-object visibility flag; ANDed with the layer's visibility
    pub enabled: bool,
    /// Back-reference to the physics body, if one is attached
    pub body: Option<BodyKey>,
    /// Physics config recorded at attach time, for queries and export
    pub physics: Option<PhysicsConfig>,
    /// Selection highlight node, if this object is selected
    pub highlight: Option<RenderKey>,
}

/// Render layer state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Whether member objects are drawn
    pub visible: bool,
    /// Layer opacity in `0..=1`; below 1 forces transparency on members
    pub opacity: f32,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
        }
    }
}
