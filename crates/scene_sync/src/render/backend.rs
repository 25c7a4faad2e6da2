//! Rendering engine boundary
//!
//! The collaborator interface the core needs from a renderer: scene-graph
//! node creation from shape/material/light/helper descriptors, disposal,
//! per-node transform/visibility/material-opacity access, and a world-space
//! AABB query used by the collision shape fallback.

use slotmap::new_key_type;
use thiserror::Error;

use crate::config::{HelperConfig, LightConfig, MaterialConfig, ShapeConfig};
use crate::foundation::math::{Aabb, Transform};

new_key_type! {
    /// Handle to a node owned by the render scene graph
    ///
    /// Generational: disposing a node invalidates its key, so stale keys are
    /// detectable rather than dangling.
    pub struct RenderKey;
}

/// Rendering boundary errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The shape descriptor names a geometry this renderer cannot build
    #[error("unsupported shape descriptor")]
    UnsupportedShape,

    /// The material descriptor names a material this renderer cannot build
    #[error("unsupported material descriptor")]
    UnsupportedMaterial,

    /// The light descriptor names a light this renderer cannot build
    #[error("unsupported light descriptor")]
    UnsupportedLight,

    /// The helper descriptor names a helper this renderer cannot build
    #[error("unsupported helper descriptor")]
    UnsupportedHelper,

    /// The referenced node does not exist in the scene graph
    #[error("render node not found")]
    NodeMissing,
}

/// Interface the core requires from a rendering engine
pub trait RenderBackend {
    /// Create a mesh node from geometry and material descriptors
    fn create_mesh(
        &mut self,
        shape: &ShapeConfig,
        material: &MaterialConfig,
    ) -> Result<RenderKey, RenderError>;

    /// Create a light node
    fn create_light(&mut self, light: &LightConfig) -> Result<RenderKey, RenderError>;

    /// Create a helper node (grid, axes)
    fn create_helper(&mut self, helper: &HelperConfig) -> Result<RenderKey, RenderError>;

    /// Create an empty group node
    fn create_group(&mut self) -> RenderKey;

    /// Remove a node from the scene and release its resources
    fn dispose(&mut self, node: RenderKey);

    /// Whether the node is still live in the scene graph
    fn contains(&self, node: RenderKey) -> bool;

    /// Set a node's TRS transform
    fn set_transform(&mut self, node: RenderKey, transform: &Transform);

    /// Get a node's TRS transform
    fn transform(&self, node: RenderKey) -> Option<Transform>;

    /// Set node visibility
    fn set_visible(&mut self, node: RenderKey, visible: bool);

    /// Get node visibility
    fn visible(&self, node: RenderKey) -> Option<bool>;

    /// Replace only the node's geometry, disposing the old one
    fn set_geometry(&mut self, node: RenderKey, shape: &ShapeConfig) -> Result<(), RenderError>;

    /// Replace only the node's material, disposing the old one
    ///
    /// Resets the effective opacity to the new material's base opacity.
    fn set_material(
        &mut self,
        node: RenderKey,
        material: &MaterialConfig,
    ) -> Result<(), RenderError>;

    /// Override the node's effective opacity and transparency flag
    fn set_material_opacity(&mut self, node: RenderKey, opacity: f32, transparent: bool);

    /// Effective (opacity, transparent) of a mesh node's material
    fn material_opacity(&self, node: RenderKey) -> Option<(f32, bool)>;

    /// The material's authored base opacity, before any layer scaling
    fn base_opacity(&self, node: RenderKey) -> Option<f32>;

    /// World-space axis-aligned bounds of the node
    fn world_aabb(&self, node: RenderKey) -> Option<Aabb>;

    /// Number of live nodes in the scene graph
    fn node_count(&self) -> usize;
}
