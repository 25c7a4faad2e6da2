//! Object Registry
//!
//! Central owner of the logical scene: objects, their configs and render
//! handles, layers, selection, and the ambient scene settings. All render
//! handles are created and disposed here and nowhere else.
//!
//! `replace` is atomic with respect to visible registry state: the
//! replacement node is constructed before the original is touched, so any
//! construction failure leaves the original entry exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::object::{Layer, SceneObject};
use super::SceneError;
use crate::config::{CameraConfig, ObjectConfig, ObjectKind, ObjectPatch, SceneSettings, ShapeConfig};
use crate::foundation::math::{self, Transform};
use crate::render::{RenderBackend, RenderKey};

/// Layer objects land on when the descriptor names none
pub const DEFAULT_LAYER: &str = "main";

/// Per-item tally produced by bulk add operations
#[derive(Debug, Default)]
pub struct BulkAddReport {
    /// True generated id of every object that was added
    pub ids: Vec<String>,
    /// Diagnostics for every descriptor that was rejected
    pub failures: Vec<String>,
}

/// Serialized form of the live scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneExport {
    /// Ambient configuration (background, fog, gravity, camera)
    #[serde(flatten)]
    pub settings: SceneSettings,
    /// Layer states by name
    pub layers: BTreeMap<String, Layer>,
    /// Every live object's config, transforms refreshed from render handles
    pub objects: Vec<ObjectConfig>,
}

/// Central owner of scene objects, layers, and render handles
pub struct ObjectRegistry<R: RenderBackend> {
    render: R,
    objects: Vec<SceneObject>,
    layers: BTreeMap<String, Layer>,
    settings: SceneSettings,
    selection: Option<String>,
    revision: u64,
    generated_names: u64,
}

impl<R: RenderBackend> ObjectRegistry<R> {
    /// Create an empty registry over the given render backend
    pub fn new(render: R) -> Self {
        let mut layers = BTreeMap::new();
        layers.insert(DEFAULT_LAYER.to_string(), Layer::default());
        Self {
            render,
            objects: Vec::new(),
            layers,
            settings: SceneSettings::default(),
            selection: None,
            revision: 0,
            generated_names: 0,
        }
    }

    /// Add one descriptor to the scene
    ///
    /// Returns the object's id, or `None` when the descriptor was ambient
    /// scene configuration (`type == "scene"`), which creates no object.
    pub fn add(&mut self, mut config: ObjectConfig) -> Result<Option<String>, SceneError> {
        if config.kind == ObjectKind::Scene {
            self.apply_scene_settings(&config);
            self.touch();
            return Ok(None);
        }

        let name = match config.name.clone() {
            Some(name) => name,
            None => self.generate_name(),
        };
        if self.objects.iter().any(|o| o.name == name) {
            return Err(SceneError::DuplicateName(name));
        }
        config.name = Some(name.clone());

        let layer_name = config
            .layer
            .clone()
            .unwrap_or_else(|| DEFAULT_LAYER.to_string());
        let layer = *self.layers.entry(layer_name.clone()).or_default();

        let render_key = self.build_node(&config)?;
        let enabled = config.enabled.unwrap_or(true);
        self.apply_object_state(render_key, &config, enabled, layer);

        self.objects.push(SceneObject {
            name: name.clone(),
            config,
            render_key,
            layer: layer_name,
            enabled,
            body: None,
            physics: None,
            highlight: None,
        });
        self.touch();
        log::debug!("Added object '{}' ({} in scene)", name, self.objects.len());
        Ok(Some(name))
    }

    /// Add several descriptors onto one layer, reporting true per-object ids
    pub fn add_objects_to_layer(
        &mut self,
        configs: Vec<ObjectConfig>,
        layer: &str,
    ) -> BulkAddReport {
        let mut report = BulkAddReport::default();
        for mut config in configs {
            config.layer = Some(layer.to_string());
            match self.add(config) {
                Ok(Some(id)) => report.ids.push(id),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Skipping descriptor on layer '{}': {}", layer, err);
                    report.failures.push(err.to_string());
                }
            }
        }
        report
    }

    /// Replace an object's descriptor wholesale, keeping its identity
    ///
    /// Atomic: the replacement node is constructed first; on any failure the
    /// original entry and its handle are untouched. The previous handle is
    /// disposed only after the replacement exists.
    pub fn replace(&mut self, name: &str, mut config: ObjectConfig) -> Result<(), SceneError> {
        if config.kind == ObjectKind::Scene {
            return Err(SceneError::AmbientDescriptor(name.to_string()));
        }
        let index = self.index_of(name)?;
        config.name = Some(name.to_string());

        let layer_name = config
            .layer
            .clone()
            .unwrap_or_else(|| DEFAULT_LAYER.to_string());
        let layer = *self.layers.entry(layer_name.clone()).or_default();

        // Construction happens before disposal so failure rolls back fully
        let new_key = self.build_node(&config)?;
        let enabled = config.enabled.unwrap_or(true);
        self.apply_object_state(new_key, &config, enabled, layer);

        let old_key = self.objects[index].render_key;
        let old_highlight = self.objects[index].highlight.take();
        self.render.dispose(old_key);
        if let Some(highlight) = old_highlight {
            self.render.dispose(highlight);
        }
        if self.selection.as_deref() == Some(name) {
            self.selection = None;
        }

        let object = &mut self.objects[index];
        object.render_key = new_key;
        object.config = config;
        object.layer = layer_name;
        object.enabled = enabled;
        self.touch();
        Ok(())
    }

    /// Merge a partial descriptor into an object
    ///
    /// Reapplying position/rotation/scale never reconstructs geometry; a new
    /// `shape` or `material` reconstructs only that sub-resource.
    pub fn update(&mut self, name: &str, patch: &ObjectPatch) -> Result<(), SceneError> {
        let index = self.index_of(name)?;
        let render_key = self.objects[index].render_key;

        if let Some(shape) = &patch.shape {
            self.render.set_geometry(render_key, shape)?;
            self.objects[index].config.shape = Some(shape.clone());
        }
        if let Some(material) = &patch.material {
            self.render.set_material(render_key, material)?;
            self.objects[index].config.material = Some(material.clone());
            let layer = self.layer_state(&self.objects[index].layer.clone());
            Self::apply_layer_opacity(&mut self.render, render_key, layer.opacity);
        }

        if let Some(pos) = patch.pos {
            self.objects[index].config.pos = pos;
        }
        if let Some(euler) = patch.euler {
            let config = &mut self.objects[index].config;
            config.euler = Some(euler);
            config.rot = None;
        } else if let Some(rot) = &patch.rot {
            let config = &mut self.objects[index].config;
            config.rot = Some(rot.clone());
            config.euler = None;
        }
        if let Some(scale) = patch.scale {
            self.objects[index].config.scale = scale;
        }

        if let Some(layer_name) = &patch.layer {
            self.layers.entry(layer_name.clone()).or_default();
            self.objects[index].layer = layer_name.clone();
            self.objects[index].config.layer = Some(layer_name.clone());
        }
        if let Some(enabled) = patch.enabled {
            self.objects[index].enabled = enabled;
            self.objects[index].config.enabled = Some(enabled);
        }

        // Transform and visibility reapply without touching geometry
        let object = &self.objects[index];
        let layer = self.layers.get(&object.layer).copied().unwrap_or_default();
        let transform = transform_from_config(&object.config);
        let visible = object.enabled && layer.visible;
        self.render.set_transform(render_key, &transform);
        self.render.set_visible(render_key, visible);
        if patch.layer.is_some() {
            Self::apply_layer_opacity(&mut self.render, render_key, layer.opacity);
        }

        self.touch();
        Ok(())
    }

    /// Remove an object, disposing its render handle and highlight
    ///
    /// Returns the removed entry so the caller can release any physics body
    /// it still references.
    pub fn remove(&mut self, name: &str) -> Result<SceneObject, SceneError> {
        let index = self.index_of(name)?;
        let object = self.objects.remove(index);
        self.render.dispose(object.render_key);
        if let Some(highlight) = object.highlight {
            self.render.dispose(highlight);
        }
        if self.selection.as_deref() == Some(name) {
            self.selection = None;
        }
        self.touch();
        log::debug!(
            "Removed object '{}' ({} in scene)",
            name,
            self.objects.len()
        );
        Ok(object)
    }

    /// Show or hide every object on a layer
    ///
    /// Effective visibility is the layer flag ANDed with each object's own
    /// `enabled` flag.
    pub fn set_layer_visibility(&mut self, layer: &str, visible: bool) {
        self.layers.entry(layer.to_string()).or_default().visible = visible;
        let keys: Vec<(RenderKey, bool)> = self
            .objects
            .iter()
            .filter(|o| o.layer == layer)
            .map(|o| (o.render_key, visible && o.enabled))
            .collect();
        for (key, effective) in keys {
            self.render.set_visible(key, effective);
        }
        self.touch();
    }

    /// Set a layer's opacity, cascading to every member material
    ///
    /// Effective opacity is recomputed from each material's *base* opacity,
    /// never the previously scaled value, so repeated calls do not compound.
    /// Opacity below 1 forces transparency; restoring 1 on an opaque base
    /// clears the transparency flag.
    pub fn set_layer_opacity(&mut self, layer: &str, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.layers.entry(layer.to_string()).or_default().opacity = opacity;
        let keys: Vec<RenderKey> = self
            .objects
            .iter()
            .filter(|o| o.layer == layer)
            .map(|o| o.render_key)
            .collect();
        for key in keys {
            Self::apply_layer_opacity(&mut self.render, key, opacity);
        }
        self.touch();
    }

    /// Attach a selection highlight to an object
    pub fn select(&mut self, name: &str) -> Result<(), SceneError> {
        self.clear_selection();
        let index = self.index_of(name)?;
        let highlight = self.render.create_group();
        if let Some(transform) = self.render.transform(self.objects[index].render_key) {
            self.render.set_transform(highlight, &transform);
        }
        self.objects[index].highlight = Some(highlight);
        self.selection = Some(name.to_string());
        self.touch();
        Ok(())
    }

    /// Drop the current selection highlight, if any
    pub fn clear_selection(&mut self) {
        if let Some(name) = self.selection.take() {
            if let Ok(index) = self.index_of(&name) {
                if let Some(highlight) = self.objects[index].highlight.take() {
                    self.render.dispose(highlight);
                }
            }
            self.touch();
        }
    }

    /// Currently selected object, if any
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Serialize the live scene
    ///
    /// Object position/euler(degrees)/scale are refreshed from the live
    /// render handles; the physics config is included only when attached.
    pub fn export(&self) -> SceneExport {
        let objects = self
            .objects
            .iter()
            .map(|object| {
                let mut config = object.config.clone();
                if let Some(transform) = self.render.transform(object.render_key) {
                    config.pos = math::array3(&transform.position);
                    config.euler = Some(math::euler_degrees_from_quat(&transform.rotation));
                    config.rot = None;
                    config.scale = math::array3(&transform.scale);
                }
                config.layer = Some(object.layer.clone());
                config.enabled = Some(object.enabled);
                config.physics = object.physics;
                config
            })
            .collect();

        SceneExport {
            settings: self.settings.clone(),
            layers: self.layers.clone(),
            objects,
        }
    }

    /// Look up an object by name
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub(crate) fn object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Iterate over all live objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Current state of a layer
    pub fn layer(&self, name: &str) -> Option<Layer> {
        self.layers.get(name).copied()
    }

    /// Ambient scene settings
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Current camera configuration
    pub fn camera(&self) -> &CameraConfig {
        &self.settings.camera
    }

    /// Replace the camera configuration
    pub fn set_camera(&mut self, camera: CameraConfig) {
        self.settings.camera = camera;
        self.touch();
    }

    /// The render backend (read access)
    pub fn render(&self) -> &R {
        &self.render
    }

    /// The render backend (write access)
    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    /// Monotonic revision counter, bumped by every mutating operation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn index_of(&self, name: &str) -> Result<usize, SceneError> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .ok_or_else(|| SceneError::UnknownObject(name.to_string()))
    }

    fn generate_name(&mut self) -> String {
        loop {
            self.generated_names += 1;
            let candidate = format!("object-{}", self.generated_names);
            if !self.objects.iter().any(|o| o.name == candidate) {
                return candidate;
            }
        }
    }

    fn layer_state(&self, name: &str) -> Layer {
        self.layers.get(name).copied().unwrap_or_default()
    }

    /// Dispatch a descriptor to the render backend, creating its node
    fn build_node(&mut self, config: &ObjectConfig) -> Result<RenderKey, SceneError> {
        let key = match config.kind {
            ObjectKind::Mesh => {
                let shape = config.shape.clone().unwrap_or(ShapeConfig::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                });
                let material = config.material.clone().unwrap_or_default();
                self.render.create_mesh(&shape, &material)?
            }
            ObjectKind::Group => self.render.create_group(),
            ObjectKind::Light => {
                let light = config.light.clone().unwrap_or_default();
                self.render.create_light(&light)?
            }
            ObjectKind::Helper => {
                let helper = config.helper.clone().unwrap_or_default();
                self.render.create_helper(&helper)?
            }
            ObjectKind::Scene => unreachable!("scene descriptors never build nodes"),
        };
        Ok(key)
    }

    fn apply_object_state(
        &mut self,
        key: RenderKey,
        config: &ObjectConfig,
        enabled: bool,
        layer: Layer,
    ) {
        let transform = transform_from_config(config);
        self.render.set_transform(key, &transform);
        self.render.set_visible(key, enabled && layer.visible);
        Self::apply_layer_opacity(&mut self.render, key, layer.opacity);
    }

    fn apply_layer_opacity(render: &mut R, key: RenderKey, layer_opacity: f32) {
        if let Some(base) = render.base_opacity(key) {
            let effective = base * layer_opacity;
            let transparent = layer_opacity < 1.0 || base < 1.0;
            render.set_material_opacity(key, effective, transparent);
        }
    }

    fn apply_scene_settings(&mut self, config: &ObjectConfig) {
        if let Some(background) = config.background {
            self.settings.background = Some(background);
        }
        if let Some(fog) = config.fog {
            self.settings.fog = Some(fog);
        }
        if let Some(gravity) = config.gravity {
            self.settings.gravity = Some(gravity);
        }
        if let Some(camera) = &config.camera {
            self.settings.camera = camera.clone();
        }
        log::debug!("Applied ambient scene configuration");
    }
}

/// Build the TRS transform a descriptor declares, honoring the rotation
/// precedence rule
fn transform_from_config(config: &ObjectConfig) -> Transform {
    Transform {
        position: math::vec3(config.pos),
        rotation: config.rotation(),
        scale: math::vec3(config.scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MaterialConfig, MaterialKind};
    use crate::render::HeadlessRenderer;
    use approx::assert_relative_eq;

    fn registry() -> ObjectRegistry<HeadlessRenderer> {
        ObjectRegistry::new(HeadlessRenderer::new())
    }

    fn box_config(name: &str) -> ObjectConfig {
        ObjectConfig {
            name: Some(name.to_string()),
            shape: Some(ShapeConfig::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            }),
            ..ObjectConfig::default()
        }
    }

    #[test]
    fn test_add_then_remove_restores_counts() {
        let mut reg = registry();
        let before_objects = reg.len();
        let before_nodes = reg.render().node_count();

        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let key = reg.object(&id).unwrap().render_key;
        assert_eq!(reg.len(), before_objects + 1);
        assert!(reg.render().contains(key));

        reg.remove(&id).unwrap();
        assert_eq!(reg.len(), before_objects);
        assert_eq!(reg.render().node_count(), before_nodes);
        assert!(!reg.render().contains(key));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let mut reg = registry();
        let a = reg
            .add(ObjectConfig::default())
            .unwrap()
            .unwrap();
        let b = reg
            .add(ObjectConfig::default())
            .unwrap()
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut reg = registry();
        reg.add(box_config("crate")).unwrap();
        let err = reg.add(box_config("crate")).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateName(_)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_scene_descriptor_creates_no_object() {
        let mut reg = registry();
        let result = reg
            .add(ObjectConfig {
                kind: ObjectKind::Scene,
                background: Some(255),
                gravity: Some([0.0, -9.81, 0.0]),
                ..ObjectConfig::default()
            })
            .unwrap();
        assert!(result.is_none());
        assert_eq!(reg.len(), 0);
        assert_eq!(reg.settings().background, Some(255));
        assert_eq!(reg.settings().gravity, Some([0.0, -9.81, 0.0]));
    }

    #[test]
    fn test_replace_is_atomic_on_failure() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let key_before = reg.object(&id).unwrap().render_key;

        let bad = ObjectConfig {
            shape: Some(ShapeConfig::Other),
            ..box_config("crate")
        };
        assert!(reg.replace(&id, bad).is_err());

        // Original node untouched
        let object = reg.object(&id).unwrap();
        assert_eq!(object.render_key, key_before);
        assert!(reg.render().contains(key_before));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_replace_rejects_ambient_scene_descriptor() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let key_before = reg.object(&id).unwrap().render_key;

        let ambient = ObjectConfig {
            kind: ObjectKind::Scene,
            background: Some(255),
            ..ObjectConfig::default()
        };
        let err = reg.replace(&id, ambient).unwrap_err();
        assert!(matches!(err, SceneError::AmbientDescriptor(_)));

        // Original entry untouched, ambient settings not applied
        let object = reg.object(&id).unwrap();
        assert_eq!(object.render_key, key_before);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.settings().background, None);
    }

    #[test]
    fn test_replace_disposes_old_handle_on_success() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let key_before = reg.object(&id).unwrap().render_key;

        reg.replace(
            &id,
            ObjectConfig {
                shape: Some(ShapeConfig::Sphere { radius: 2.0 }),
                ..box_config("crate")
            },
        )
        .unwrap();

        assert!(!reg.render().contains(key_before));
        assert!(reg.render().contains(reg.object(&id).unwrap().render_key));
        assert_eq!(reg.render().node_count(), 1);
    }

    #[test]
    fn test_update_position_does_not_rebuild_geometry() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let builds = reg.render().geometry_builds();

        reg.update(
            &id,
            &ObjectPatch {
                pos: Some([3.0, 2.0, 1.0]),
                ..ObjectPatch::default()
            },
        )
        .unwrap();

        assert_eq!(reg.render().geometry_builds(), builds);
        let key = reg.object(&id).unwrap().render_key;
        let transform = reg.render().transform(key).unwrap();
        assert_eq!(math::array3(&transform.position), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_update_shape_rebuilds_only_geometry() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        let geometry_before = reg.render().geometry_builds();
        let materials_before = reg.render().material_builds();

        reg.update(
            &id,
            &ObjectPatch {
                shape: Some(ShapeConfig::Sphere { radius: 1.0 }),
                ..ObjectPatch::default()
            },
        )
        .unwrap();

        assert_eq!(reg.render().geometry_builds(), geometry_before + 1);
        assert_eq!(reg.render().material_builds(), materials_before);
    }

    #[test]
    fn test_layer_opacity_does_not_compound() {
        let mut reg = registry();
        let mut config = box_config("glow");
        config.layer = Some("fx".to_string());
        let id = reg.add(config).unwrap().unwrap();
        let key = reg.object(&id).unwrap().render_key;

        reg.set_layer_opacity("fx", 0.5);
        assert_eq!(reg.render().material_opacity(key), Some((0.5, true)));

        // A second application still derives from the base opacity
        reg.set_layer_opacity("fx", 0.5);
        assert_eq!(reg.render().material_opacity(key), Some((0.5, true)));

        reg.set_layer_opacity("fx", 1.0);
        assert_eq!(reg.render().material_opacity(key), Some((1.0, false)));
    }

    #[test]
    fn test_layer_visibility_ands_with_enabled() {
        let mut reg = registry();
        let mut disabled = box_config("hidden");
        disabled.enabled = Some(false);
        let hidden = reg.add(disabled).unwrap().unwrap();
        let shown = reg.add(box_config("shown")).unwrap().unwrap();

        reg.set_layer_visibility(DEFAULT_LAYER, true);
        let hidden_key = reg.object(&hidden).unwrap().render_key;
        let shown_key = reg.object(&shown).unwrap().render_key;
        assert_eq!(reg.render().visible(hidden_key), Some(false));
        assert_eq!(reg.render().visible(shown_key), Some(true));

        reg.set_layer_visibility(DEFAULT_LAYER, false);
        assert_eq!(reg.render().visible(shown_key), Some(false));
    }

    #[test]
    fn test_rotation_precedence_consistent_across_entry_points() {
        let mut reg = registry();
        let mut config = box_config("spinner");
        config.euler = Some([0.0, 90.0, 0.0]);
        config.rot = Some(vec![0.0, 0.0, 0.0, 1.0]);
        let id = reg.add(config).unwrap().unwrap();

        let key = reg.object(&id).unwrap().render_key;
        let added = reg.render().transform(key).unwrap().rotation;
        let expected = math::quat_from_euler_degrees([0.0, 90.0, 0.0]);
        assert_relative_eq!(added, expected, epsilon = 1e-5);

        // update with a quaternion takes over once euler is absent
        reg.update(
            &id,
            &ObjectPatch {
                rot: Some(vec![0.0, 0.0, 0.0, 1.0]),
                ..ObjectPatch::default()
            },
        )
        .unwrap();
        let updated = reg.render().transform(key).unwrap().rotation;
        assert_relative_eq!(
            updated,
            crate::foundation::math::Quat::identity(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_remove_clears_selection_highlight() {
        let mut reg = registry();
        let id = reg.add(box_config("crate")).unwrap().unwrap();
        reg.select(&id).unwrap();
        assert_eq!(reg.render().node_count(), 2);

        reg.remove(&id).unwrap();
        assert_eq!(reg.render().node_count(), 0);
        assert!(reg.selection().is_none());
    }

    #[test]
    fn test_unsupported_material_leaves_count_unchanged() {
        let mut reg = registry();
        let mut config = box_config("weird");
        config.material = Some(MaterialConfig {
            kind: MaterialKind::Other,
            ..MaterialConfig::default()
        });
        assert!(reg.add(config).is_err());
        assert_eq!(reg.len(), 0);
        assert_eq!(reg.render().node_count(), 0);
    }

    #[test]
    fn test_bulk_add_reports_real_ids() {
        let mut reg = registry();
        let configs = vec![box_config("a"), box_config("b")];
        let report = reg.add_objects_to_layer(configs, "stage");
        assert_eq!(report.ids, vec!["a".to_string(), "b".to_string()]);
        assert!(report.failures.is_empty());
        assert_eq!(reg.object("a").unwrap().layer, "stage");
    }

    #[test]
    fn test_export_refreshes_transforms_from_render() {
        let mut reg = registry();
        let mut config = box_config("crate");
        config.pos = [1.0, 2.0, 3.0];
        config.euler = Some([0.0, 45.0, 0.0]);
        let id = reg.add(config).unwrap().unwrap();

        // Nudge the render node directly, as the simulation loop would
        let key = reg.object(&id).unwrap().render_key;
        let mut transform = reg.render().transform(key).unwrap();
        transform.position.y = 7.5;
        reg.render_mut().set_transform(key, &transform);

        let export = reg.export();
        assert_eq!(export.objects.len(), 1);
        assert_relative_eq!(export.objects[0].pos[1], 7.5, epsilon = 1e-5);
        let euler = export.objects[0].euler.unwrap();
        assert_relative_eq!(euler[1], 45.0, epsilon = 1e-3);
    }
}
