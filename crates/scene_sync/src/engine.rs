//! Scene engine facade
//!
//! [`SceneEngine`] wires the object registry, the physics synchronization
//! engine, and the simulation clock into one surface: declarative JSON in,
//! live paired render/physics state out, declarative JSON back out.

use thiserror::Error;

use crate::config::{
    parse_scene_json, CameraConfig, ObjectConfig, ObjectKind, ObjectPatch, PhysicsConfig,
};
use crate::foundation::math;
use crate::physics::{
    GravityModel, PhysicsBackend, PhysicsError, PhysicsSync,
};
use crate::render::RenderBackend;
use crate::scene::registry::{BulkAddReport, ObjectRegistry, SceneExport};
use crate::scene::SceneError;
use crate::simulation::SimulationClock;

/// Top-level engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Object registry failure
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Physics subsystem failure
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// The assembled scene/physics synchronization engine
pub struct SceneEngine<R: RenderBackend> {
    registry: ObjectRegistry<R>,
    physics: PhysicsSync,
    clock: SimulationClock,
}

impl<R: RenderBackend> SceneEngine<R> {
    /// Create an engine over a render backend; physics stays uninitialized
    /// until [`SceneEngine::initialize_physics`]
    pub fn new(render: R) -> Self {
        Self {
            registry: ObjectRegistry::new(render),
            physics: PhysicsSync::new(),
            clock: SimulationClock::new(),
        }
    }

    /// Install the physics world
    pub fn initialize_physics(&mut self, backend: Box<dyn PhysicsBackend>) {
        self.physics.initialize(backend);
    }

    /// Whether the physics world is available
    pub fn physics_initialized(&self) -> bool {
        self.physics.is_initialized()
    }

    /// Load a whole scene from descriptor JSON
    ///
    /// Hex color literals are rewritten before parsing; malformed JSON loads
    /// an empty scene. Objects carrying a `physics` block are auto-attached
    /// when the physics world is initialized, otherwise the block is kept on
    /// the config and ignored until an explicit attach. A `scene` descriptor
    /// declaring `gravity` installs it as the uniform gravity model.
    pub fn load_scene_json(&mut self, text: &str) -> BulkAddReport {
        let mut report = BulkAddReport::default();
        for config in parse_scene_json(text) {
            let physics = config.physics;
            let ambient_gravity = if config.kind == ObjectKind::Scene {
                config.gravity
            } else {
                None
            };
            match self.registry.add(config) {
                Ok(Some(name)) => {
                    if let Some(physics_config) = physics {
                        if self.physics.is_initialized() {
                            if let Err(err) =
                                self.physics.attach_body(&mut self.registry, &name, physics_config)
                            {
                                log::warn!("Physics attach failed for '{}': {}", name, err);
                            }
                        }
                    }
                    report.ids.push(name);
                }
                Ok(None) => self.apply_ambient_gravity(ambient_gravity),
                Err(err) => report.failures.push(err.to_string()),
            }
        }
        report
    }

    /// Add one object from its descriptor
    ///
    /// Returns the object's true id, or `None` for ambient (`scene`-type)
    /// descriptors.
    pub fn add_object(&mut self, config: ObjectConfig) -> Result<Option<String>, EngineError> {
        let physics = config.physics;
        let ambient_gravity = if config.kind == ObjectKind::Scene {
            config.gravity
        } else {
            None
        };
        let name = self.registry.add(config)?;
        match &name {
            Some(name) => {
                if let Some(physics_config) = physics {
                    if self.physics.is_initialized() {
                        self.physics
                            .attach_body(&mut self.registry, name, physics_config)?;
                    }
                }
            }
            None => self.apply_ambient_gravity(ambient_gravity),
        }
        Ok(name)
    }

    /// Add several objects to one layer; per-item tally, real ids
    pub fn add_objects_to_layer(
        &mut self,
        configs: Vec<ObjectConfig>,
        layer: &str,
    ) -> BulkAddReport {
        self.registry.add_objects_to_layer(configs, layer)
    }

    /// Replace an object's visuals in place, keeping identity and body
    pub fn replace_object(&mut self, name: &str, config: ObjectConfig) -> Result<(), EngineError> {
        self.registry.replace(name, config)?;
        Ok(())
    }

    /// Apply a partial descriptor to an object
    pub fn update_object(&mut self, name: &str, patch: &ObjectPatch) -> Result<(), EngineError> {
        self.registry.update(name, patch)?;
        Ok(())
    }

    /// Remove an object, releasing its body and render handle
    pub fn remove_object(&mut self, name: &str) -> Result<(), EngineError> {
        self.physics.detach_body(&mut self.registry, name)?;
        let removed = self.registry.remove(name)?;
        debug_assert!(removed.body.is_none());
        Ok(())
    }

    /// Show or hide a whole layer
    pub fn set_layer_visibility(&mut self, layer: &str, visible: bool) {
        self.registry.set_layer_visibility(layer, visible);
    }

    /// Fade a whole layer; member opacity derives from material base values
    pub fn set_layer_opacity(&mut self, layer: &str, opacity: f32) {
        self.registry.set_layer_opacity(layer, opacity);
    }

    /// Mark an object as selected
    pub fn select_object(&mut self, name: &str) -> Result<(), EngineError> {
        self.registry.select(name)?;
        Ok(())
    }

    /// Drop the current selection
    pub fn clear_selection(&mut self) {
        self.registry.clear_selection();
    }

    /// Attach a physics body to an object
    pub fn attach_physics(
        &mut self,
        name: &str,
        config: PhysicsConfig,
    ) -> Result<(), EngineError> {
        self.physics.attach_body(&mut self.registry, name, config)?;
        Ok(())
    }

    /// Attach the same physics config to several objects
    pub fn batch_attach_physics(
        &mut self,
        names: &[String],
        config: PhysicsConfig,
    ) -> crate::physics::BatchAttachReport {
        self.physics.batch_attach(&mut self.registry, names, config)
    }

    /// Release an object's physics body
    pub fn detach_physics(&mut self, name: &str) -> Result<(), EngineError> {
        self.physics.detach_body(&mut self.registry, name)?;
        Ok(())
    }

    /// Convert every enabled mesh on the default layer into a static body
    pub fn convert_layer_to_static(&mut self) -> crate::physics::BatchAttachReport {
        self.physics.convert_layer_to_static(&mut self.registry)
    }

    /// Spawn the paired static floor
    pub fn spawn_floor(&mut self, half_extent: f32) -> Result<(), EngineError> {
        self.physics.spawn_floor(&mut self.registry, half_extent)?;
        Ok(())
    }

    /// Tear down all physics state; snapshots are discarded with it
    pub fn reset_physics(&mut self) {
        self.physics.reset(&mut self.registry);
        self.clock.clear_snapshots();
    }

    /// Switch the system-wide gravity model
    pub fn set_gravity(&mut self, model: GravityModel) {
        self.physics.set_gravity(model);
    }

    /// The active gravity model
    pub fn gravity_model(&self) -> &GravityModel {
        self.physics.gravity_model()
    }

    /// Start the simulation
    pub fn start_simulation(&mut self) {
        self.clock.start(&self.registry);
    }

    /// Stop the simulation, restoring the pre-start snapshot
    pub fn stop_simulation(&mut self) {
        self.clock.stop(&mut self.registry, &mut self.physics);
    }

    /// Toggle the simulation
    pub fn toggle_simulation(&mut self) {
        self.clock.toggle(&mut self.registry, &mut self.physics);
    }

    /// Whether the simulation is advancing
    pub fn simulation_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Advance one frame
    pub fn tick(&mut self, delta_time: f32) -> Result<(), EngineError> {
        self.clock
            .tick(&mut self.registry, &mut self.physics, delta_time)?;
        Ok(())
    }

    /// Snapshot the live scene as a declarative export
    pub fn export(&self) -> SceneExport {
        self.registry.export()
    }

    /// Snapshot the live scene as descriptor JSON
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.registry.export())
    }

    /// Current camera configuration
    pub fn camera(&self) -> &CameraConfig {
        self.registry.camera()
    }

    /// Replace the camera configuration
    pub fn set_camera(&mut self, camera: CameraConfig) {
        self.registry.set_camera(camera);
    }

    /// The object registry
    pub fn registry(&self) -> &ObjectRegistry<R> {
        &self.registry
    }

    /// The object registry (write access)
    pub fn registry_mut(&mut self) -> &mut ObjectRegistry<R> {
        &mut self.registry
    }

    /// The physics synchronization engine
    pub fn physics(&self) -> &PhysicsSync {
        &self.physics
    }

    /// The simulation clock
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Monotonic change counter; bumps on every mutating registry operation
    pub fn revision(&self) -> u64 {
        self.registry.revision()
    }

    /// Install a scene-declared gravity vector as the uniform model
    fn apply_ambient_gravity(&mut self, gravity: Option<[f32; 3]>) {
        if let Some(vector) = gravity {
            self.physics
                .set_gravity(GravityModel::uniform(math::vec3(vector)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RigidWorld;
    use crate::render::HeadlessRenderer;
    use approx::assert_relative_eq;

    fn engine() -> SceneEngine<HeadlessRenderer> {
        let mut engine = SceneEngine::new(HeadlessRenderer::new());
        engine.initialize_physics(Box::new(RigidWorld::new()));
        engine
    }

    const SCENE_JSON: &str = r#"[
        {"type": "scene", "background": 0x202020, "camera": {"fov": 60.0}},
        {"name": "ground", "shape": {"type": "box", "width": 20.0, "height": 1.0, "depth": 20.0},
         "pos": [0.0, -0.5, 0.0],
         "physics": {"motionType": "static"}},
        {"name": "ball", "shape": {"type": "sphere", "radius": 0.5},
         "pos": [0.0, 5.0, 0.0],
         "material": {"color": 0xff0000},
         "physics": {"motionType": "dynamic", "mass": 2.0}}
    ]"#;

    #[test]
    fn test_load_scene_json_auto_attaches_physics() {
        let mut engine = engine();
        let report = engine.load_scene_json(SCENE_JSON);

        assert_eq!(report.ids, vec!["ground".to_string(), "ball".to_string()]);
        assert!(report.failures.is_empty());
        // Scene descriptor applied ambient settings without creating an object
        assert_eq!(engine.registry().settings().background, Some(0x0020_2020));
        assert_relative_eq!(engine.camera().fov, 60.0);

        assert!(engine.physics().is_dynamic("ball"));
        assert!(!engine.physics().is_dynamic("ground"));
        assert_eq!(engine.physics().backend().unwrap().body_count(), 2);
    }

    #[test]
    fn test_physics_block_deferred_until_initialized() {
        let mut engine = SceneEngine::new(HeadlessRenderer::new());
        let report = engine.load_scene_json(SCENE_JSON);

        assert_eq!(report.ids.len(), 2);
        assert!(engine.registry().object("ball").unwrap().body.is_none());

        engine.initialize_physics(Box::new(RigidWorld::new()));
        let config = engine
            .registry()
            .object("ball")
            .unwrap()
            .config
            .physics
            .unwrap();
        engine.attach_physics("ball", config).unwrap();
        assert!(engine.physics().is_dynamic("ball"));
    }

    #[test]
    fn test_scene_gravity_reaches_physics_engine() {
        use crate::foundation::math::Vec3;

        let mut engine = engine();
        engine.load_scene_json(
            r#"[
            {"type": "scene", "gravity": [0.0, 9.81, 0.0]},
            {"name": "ball", "shape": {"type": "sphere", "radius": 0.5},
             "pos": [0.0, 3.0, 0.0],
             "physics": {"motionType": "dynamic", "mass": 1.0}}
        ]"#,
        );

        assert_eq!(
            engine.physics().backend().unwrap().gravity(),
            Vec3::new(0.0, 9.81, 0.0)
        );

        // Upward gravity: the ball rises instead of falling
        engine.start_simulation();
        for _ in 0..30 {
            engine.tick(1.0 / 60.0).unwrap();
        }
        let key = engine.registry().object("ball").unwrap().render_key;
        let transform = engine.registry().render().transform(key).unwrap();
        assert!(transform.position.y > 3.0);
    }

    #[test]
    fn test_simulation_lifecycle_moves_and_restores() {
        let mut engine = engine();
        engine.load_scene_json(SCENE_JSON);

        engine.start_simulation();
        for _ in 0..30 {
            engine.tick(1.0 / 60.0).unwrap();
        }
        let key = engine.registry().object("ball").unwrap().render_key;
        let fallen = engine.registry().render().transform(key).unwrap();
        assert!(fallen.position.y < 5.0);

        engine.stop_simulation();
        let restored = engine.registry().render().transform(key).unwrap();
        assert_relative_eq!(restored.position.y, 5.0, epsilon = 1e-5);
        assert!(!engine.simulation_running());
    }

    #[test]
    fn test_remove_object_releases_body() {
        let mut engine = engine();
        engine.load_scene_json(SCENE_JSON);
        assert_eq!(engine.physics().backend().unwrap().body_count(), 2);

        engine.remove_object("ball").unwrap();

        assert_eq!(engine.physics().backend().unwrap().body_count(), 1);
        assert!(!engine.physics().is_dynamic("ball"));
        assert!(engine.registry().object("ball").is_none());
    }

    #[test]
    fn test_export_round_trips_through_load() {
        let mut engine = engine();
        engine.load_scene_json(SCENE_JSON);
        let json = engine.export_json().unwrap();

        let mut rebuilt = SceneEngine::new(HeadlessRenderer::new());
        rebuilt.initialize_physics(Box::new(RigidWorld::new()));
        let export: SceneExport = serde_json::from_str(&json).unwrap();
        for config in export.objects {
            rebuilt.add_object(config).unwrap();
        }

        assert_eq!(rebuilt.registry().len(), engine.registry().len());
        let key = rebuilt.registry().object("ball").unwrap().render_key;
        let transform = rebuilt.registry().render().transform(key).unwrap();
        assert_relative_eq!(transform.position.y, 5.0, epsilon = 1e-5);
        assert!(rebuilt.physics().is_dynamic("ball"));
    }

    #[test]
    fn test_reset_physics_clears_snapshots() {
        let mut engine = engine();
        engine.load_scene_json(SCENE_JSON);
        engine.start_simulation();
        for _ in 0..10 {
            engine.tick(1.0 / 60.0).unwrap();
        }
        engine.stop_simulation();

        engine.reset_physics();
        assert!(!engine.physics_initialized());
        assert!(engine.registry().object("ball").unwrap().body.is_none());

        // Ticking after reset is inert rather than an error while stopped
        engine.tick(1.0 / 60.0).unwrap();
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut engine = engine();
        let before = engine.revision();
        engine.load_scene_json(SCENE_JSON);
        assert!(engine.revision() > before);
    }
}
