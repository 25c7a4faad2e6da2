//! Headless reference renderer
//!
//! An in-memory scene graph implementing [`RenderBackend`]. Nodes live in a
//! slotmap; geometry and material are kept as validated descriptors plus the
//! mutable state (transform, visibility, effective opacity) the core reads
//! back. Used by the test suite and the sandbox demo; a GPU renderer
//! implements the same trait.

use slotmap::SlotMap;

use super::backend::{RenderBackend, RenderError, RenderKey};
use crate::config::{
    HelperConfig, HelperKind, LightConfig, LightKind, MaterialConfig, MaterialKind, ShapeConfig,
};
use crate::foundation::math::{Aabb, Transform, Vec3};

/// What a node renders as
#[derive(Debug, Clone)]
enum NodeKind {
    Mesh { shape: ShapeConfig },
    Light(LightConfig),
    Helper(HelperConfig),
    Group,
}

/// Mutable material state attached to mesh nodes
#[derive(Debug, Clone)]
struct MaterialState {
    base: MaterialConfig,
    opacity: f32,
    transparent: bool,
}

impl MaterialState {
    fn new(base: MaterialConfig) -> Self {
        Self {
            opacity: base.opacity,
            transparent: base.opacity < 1.0,
            base,
        }
    }
}

#[derive(Debug)]
struct RenderNode {
    kind: NodeKind,
    material: Option<MaterialState>,
    transform: Transform,
    visible: bool,
}

/// In-memory scene graph
pub struct HeadlessRenderer {
    nodes: SlotMap<RenderKey, RenderNode>,
    geometry_builds: u64,
    material_builds: u64,
}

impl HeadlessRenderer {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            geometry_builds: 0,
            material_builds: 0,
        }
    }

    /// Total geometry constructions since creation (test instrumentation)
    pub fn geometry_builds(&self) -> u64 {
        self.geometry_builds
    }

    /// Total material constructions since creation (test instrumentation)
    pub fn material_builds(&self) -> u64 {
        self.material_builds
    }

    fn validate_shape(shape: &ShapeConfig) -> Result<(), RenderError> {
        if matches!(shape, ShapeConfig::Other) {
            return Err(RenderError::UnsupportedShape);
        }
        Ok(())
    }

    fn validate_material(material: &MaterialConfig) -> Result<(), RenderError> {
        if material.kind == MaterialKind::Other {
            return Err(RenderError::UnsupportedMaterial);
        }
        Ok(())
    }

    /// Local-space bounding half-extents of a supported shape
    fn shape_half_extents(shape: &ShapeConfig) -> Vec3 {
        match *shape {
            ShapeConfig::Box {
                width,
                height,
                depth,
            } => Vec3::new(width * 0.5, height * 0.5, depth * 0.5),
            ShapeConfig::Sphere { radius } => Vec3::new(radius, radius, radius),
            ShapeConfig::Plane { width, height } => Vec3::new(width * 0.5, 0.0, height * 0.5),
            ShapeConfig::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            ShapeConfig::Cone { radius, height } => Vec3::new(radius, height * 0.5, radius),
            ShapeConfig::Torus { radius, tube } => {
                Vec3::new(radius + tube, tube, radius + tube)
            }
            ShapeConfig::Other => Vec3::zeros(),
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn create_mesh(
        &mut self,
        shape: &ShapeConfig,
        material: &MaterialConfig,
    ) -> Result<RenderKey, RenderError> {
        Self::validate_shape(shape)?;
        Self::validate_material(material)?;
        self.geometry_builds += 1;
        self.material_builds += 1;
        Ok(self.nodes.insert(RenderNode {
            kind: NodeKind::Mesh {
                shape: shape.clone(),
            },
            material: Some(MaterialState::new(material.clone())),
            transform: Transform::identity(),
            visible: true,
        }))
    }

    fn create_light(&mut self, light: &LightConfig) -> Result<RenderKey, RenderError> {
        if light.kind == LightKind::Other {
            return Err(RenderError::UnsupportedLight);
        }
        Ok(self.nodes.insert(RenderNode {
            kind: NodeKind::Light(light.clone()),
            material: None,
            transform: Transform::identity(),
            visible: true,
        }))
    }

    fn create_helper(&mut self, helper: &HelperConfig) -> Result<RenderKey, RenderError> {
        if helper.kind == HelperKind::Other {
            return Err(RenderError::UnsupportedHelper);
        }
        Ok(self.nodes.insert(RenderNode {
            kind: NodeKind::Helper(helper.clone()),
            material: None,
            transform: Transform::identity(),
            visible: true,
        }))
    }

    fn create_group(&mut self) -> RenderKey {
        self.nodes.insert(RenderNode {
            kind: NodeKind::Group,
            material: None,
            transform: Transform::identity(),
            visible: true,
        })
    }

    fn dispose(&mut self, node: RenderKey) {
        if self.nodes.remove(node).is_none() {
            log::warn!("Dispose of unknown render node {:?}", node);
        }
    }

    fn contains(&self, node: RenderKey) -> bool {
        self.nodes.contains_key(node)
    }

    fn set_transform(&mut self, node: RenderKey, transform: &Transform) {
        if let Some(entry) = self.nodes.get_mut(node) {
            entry.transform = transform.clone();
        }
    }

    fn transform(&self, node: RenderKey) -> Option<Transform> {
        self.nodes.get(node).map(|n| n.transform.clone())
    }

    fn set_visible(&mut self, node: RenderKey, visible: bool) {
        if let Some(entry) = self.nodes.get_mut(node) {
            entry.visible = visible;
        }
    }

    fn visible(&self, node: RenderKey) -> Option<bool> {
        self.nodes.get(node).map(|n| n.visible)
    }

    fn set_geometry(&mut self, node: RenderKey, shape: &ShapeConfig) -> Result<(), RenderError> {
        Self::validate_shape(shape)?;
        let entry = self.nodes.get_mut(node).ok_or(RenderError::NodeMissing)?;
        match &mut entry.kind {
            NodeKind::Mesh { shape: current } => {
                *current = shape.clone();
                self.geometry_builds += 1;
                Ok(())
            }
            _ => Err(RenderError::UnsupportedShape),
        }
    }

    fn set_material(
        &mut self,
        node: RenderKey,
        material: &MaterialConfig,
    ) -> Result<(), RenderError> {
        Self::validate_material(material)?;
        let entry = self.nodes.get_mut(node).ok_or(RenderError::NodeMissing)?;
        match entry.kind {
            NodeKind::Mesh { .. } => {
                entry.material = Some(MaterialState::new(material.clone()));
                self.material_builds += 1;
                Ok(())
            }
            _ => Err(RenderError::UnsupportedMaterial),
        }
    }

    fn set_material_opacity(&mut self, node: RenderKey, opacity: f32, transparent: bool) {
        if let Some(state) = self.nodes.get_mut(node).and_then(|n| n.material.as_mut()) {
            state.opacity = opacity;
            state.transparent = transparent;
        }
    }

    fn material_opacity(&self, node: RenderKey) -> Option<(f32, bool)> {
        self.nodes
            .get(node)
            .and_then(|n| n.material.as_ref())
            .map(|m| (m.opacity, m.transparent))
    }

    fn base_opacity(&self, node: RenderKey) -> Option<f32> {
        self.nodes
            .get(node)
            .and_then(|n| n.material.as_ref())
            .map(|m| m.base.opacity)
    }

    fn world_aabb(&self, node: RenderKey) -> Option<Aabb> {
        let entry = self.nodes.get(node)?;
        let local = match &entry.kind {
            NodeKind::Mesh { shape } => Self::shape_half_extents(shape),
            NodeKind::Helper(helper) => Vec3::new(helper.size * 0.5, 0.0, helper.size * 0.5),
            NodeKind::Light(_) | NodeKind::Group => Vec3::zeros(),
        };
        let extents = Vec3::new(
            local.x * entry.transform.scale.x,
            local.y * entry.transform.scale.y,
            local.z * entry.transform.scale.z,
        );
        Some(Aabb::from_center_extents(entry.transform.position, extents))
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
