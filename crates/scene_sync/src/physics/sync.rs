//! Physics synchronization engine
//!
//! Creates and destroys physics bodies for registry entries, classifies them
//! by motion type, maintains the dynamic subset needing per-frame transform
//! pull, and exposes batch conversion. The physics world lives behind an
//! explicit `initialize` gate; every body operation before it fails fast
//! with `NotInitialized` rather than queuing.

use std::collections::HashSet;

use super::backend::{BodyKey, BodySettings, MotionType, PhysicsBackend};
use super::gravity::GravityModel;
use super::shape::{scaled_shape, PhysicsShape};
use super::PhysicsError;
use crate::config::{MaterialConfig, ObjectKind, PhysicsConfig, ShapeConfig};
use crate::foundation::math::{Aabb, Quat, Transform, Vec3};
use crate::render::{RenderBackend, RenderKey};
use crate::scene::registry::{ObjectRegistry, DEFAULT_LAYER};

/// Per-item tally produced by batch conversion
#[derive(Debug, Default)]
pub struct BatchAttachReport {
    /// Number of objects successfully attached
    pub success_count: usize,
    /// Ids of objects that failed to attach
    pub failed: Vec<String>,
}

/// Body lifecycle manager bridging the registry and the physics world
pub struct PhysicsSync {
    backend: Option<Box<dyn PhysicsBackend>>,
    dynamic_set: HashSet<String>,
    gravity: GravityModel,
    floor: Option<(RenderKey, BodyKey)>,
}

impl PhysicsSync {
    /// Create an uninitialized synchronization engine
    pub fn new() -> Self {
        Self {
            backend: None,
            dynamic_set: HashSet::new(),
            gravity: GravityModel::default(),
            floor: None,
        }
    }

    /// Install the physics world, completing the bootstrap
    ///
    /// The active gravity model is applied to the fresh world immediately:
    /// uniform forwards its vector natively, radial zeroes native gravity.
    pub fn initialize(&mut self, mut backend: Box<dyn PhysicsBackend>) {
        match &self.gravity {
            GravityModel::Uniform { vector } => backend.set_gravity(*vector),
            GravityModel::Radial { .. } => backend.set_gravity(Vec3::zeros()),
        }
        self.backend = Some(backend);
        log::info!("Physics world initialized");
    }

    /// Whether the physics world is available
    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// The physics backend, if initialized
    pub fn backend(&self) -> Option<&dyn PhysicsBackend> {
        self.backend.as_deref()
    }

    /// The physics backend (write access), if initialized
    pub fn backend_mut(&mut self) -> Option<&mut (dyn PhysicsBackend + 'static)> {
        self.backend.as_deref_mut()
    }

    /// The active gravity model
    pub fn gravity_model(&self) -> &GravityModel {
        &self.gravity
    }

    /// Switch the system-wide gravity model
    ///
    /// Uniform gravity is forwarded to the engine natively; switching to
    /// radial zeroes native gravity so per-step forces are not
    /// double-applied.
    pub fn set_gravity(&mut self, model: GravityModel) {
        if let Some(backend) = self.backend.as_mut() {
            match &model {
                GravityModel::Uniform { vector } => backend.set_gravity(*vector),
                GravityModel::Radial { .. } => backend.set_gravity(Vec3::zeros()),
            }
        }
        self.gravity = model;
    }

    /// Install the primary radial attractor center
    pub fn set_attractor_center(&mut self, position: Vec3) {
        self.gravity.set_attractor_center(position);
    }

    /// Attach (or re-attach) a physics body to an object
    ///
    /// Any existing body is released first. The collision shape is derived
    /// from the visual shape at the object's *current* scale, and the body
    /// is constructed at the object's current world transform, not its
    /// originally-authored one. Friction and restitution apply post-create;
    /// mass is meaningful only for dynamic bodies.
    pub fn attach_body<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        name: &str,
        config: PhysicsConfig,
    ) -> Result<(), PhysicsError> {
        if self.backend.is_none() {
            return Err(PhysicsError::NotInitialized);
        }
        let object = registry
            .object(name)
            .ok_or_else(|| PhysicsError::ObjectMissing(name.to_string()))?;
        let render_key = object.render_key;
        let shape_config = object.config.shape.clone();
        let attraction = object.config.attraction;
        let existing = object.body;

        // Clear the old attachment entirely before anything fallible: a
        // creation failure below must not leave a key to a destroyed body
        if let Some(body) = existing {
            self.release_body(body);
            self.dynamic_set.remove(name);
            if let Some(object) = registry.object_mut(name) {
                object.body = None;
                object.physics = None;
            }
        }

        let transform = registry.render().transform(render_key).ok_or_else(|| {
            PhysicsError::ShapeCreationFailed(format!("no live render handle for '{}'", name))
        })?;
        let aabb = registry
            .render()
            .world_aabb(render_key)
            .unwrap_or_else(|| Aabb::from_center_extents(transform.position, Vec3::zeros()));
        // Re-derived on every transition; scale may have changed since authoring
        let shape = scaled_shape(shape_config.as_ref(), transform.scale, aabb);

        let backend = self.backend.as_mut().ok_or(PhysicsError::NotInitialized)?;
        let body = backend.create_body(BodySettings {
            shape,
            position: transform.position,
            rotation: transform.rotation,
            motion_type: config.motion_type,
            mass: config.mass,
        })?;
        backend.set_friction(body, config.friction);
        backend.set_restitution(body, config.restitution);

        if config.motion_type == MotionType::Dynamic {
            self.dynamic_set.insert(name.to_string());
        } else {
            self.dynamic_set.remove(name);
        }

        // A static body carrying an attraction strength becomes the radial
        // attractor center
        if let (Some(strength), MotionType::Static) = (attraction, config.motion_type) {
            if self.gravity.is_radial() {
                self.gravity.set_attractor_center(transform.position);
                if let GravityModel::Radial {
                    strength: model_strength,
                    ..
                } = &mut self.gravity
                {
                    if strength > 0.0 {
                        *model_strength = strength;
                    }
                }
            }
        }

        let object = registry
            .object_mut(name)
            .ok_or_else(|| PhysicsError::ObjectMissing(name.to_string()))?;
        object.body = Some(body);
        object.physics = Some(config);
        log::debug!(
            "Attached {:?} body to '{}' ({} dynamic)",
            config.motion_type,
            name,
            self.dynamic_set.len()
        );
        Ok(())
    }

    /// Release an object's physics body, keeping the object itself
    pub fn detach_body<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        name: &str,
    ) -> Result<(), PhysicsError> {
        let object = registry
            .object_mut(name)
            .ok_or_else(|| PhysicsError::ObjectMissing(name.to_string()))?;
        let body = object.body.take();
        object.physics = None;
        self.dynamic_set.remove(name);
        if let Some(body) = body {
            self.release_body(body);
        }
        Ok(())
    }

    /// Attach the same physics config to several objects independently
    ///
    /// One failure never blocks subsequent ids; the report tallies both.
    pub fn batch_attach<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        names: &[String],
        config: PhysicsConfig,
    ) -> BatchAttachReport {
        let mut report = BatchAttachReport::default();
        for name in names {
            match self.attach_body(registry, name, config) {
                Ok(()) => report.success_count += 1,
                Err(err) => {
                    log::warn!("Batch attach failed for '{}': {}", name, err);
                    report.failed.push(name.clone());
                }
            }
        }
        report
    }

    /// Convert every enabled, body-less mesh on the default layer into a
    /// static body
    ///
    /// Uses zero-cost contact parameters (friction 0.2, restitution 0.0) and
    /// records the physics config on each object for later export. Objects
    /// that already carry a body keep it untouched.
    pub fn convert_layer_to_static<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
    ) -> BatchAttachReport {
        let names: Vec<String> = registry
            .objects()
            .filter(|o| {
                o.config.kind == ObjectKind::Mesh
                    && o.enabled
                    && o.layer == DEFAULT_LAYER
                    && o.body.is_none()
            })
            .map(|o| o.name.clone())
            .collect();
        let config = PhysicsConfig {
            motion_type: MotionType::Static,
            mass: 0.0,
            friction: 0.2,
            restitution: 0.0,
        };
        self.batch_attach(registry, &names, config)
    }

    /// Spawn a static floor: one body plus a paired render node, sized to
    /// the given half-extent and independent of the JSON registry
    pub fn spawn_floor<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        half_extent: f32,
    ) -> Result<(), PhysicsError> {
        if self.backend.is_none() {
            return Err(PhysicsError::NotInitialized);
        }
        if let Some((render_key, body)) = self.floor.take() {
            registry.render_mut().dispose(render_key);
            self.release_body(body);
        }

        let size = half_extent * 2.0;
        let shape = ShapeConfig::Box {
            width: size,
            height: 1.0,
            depth: size,
        };
        let render_key = registry
            .render_mut()
            .create_mesh(&shape, &MaterialConfig::default())
            .map_err(|err| PhysicsError::ShapeCreationFailed(err.to_string()))?;
        let transform = Transform {
            position: Vec3::new(0.0, -0.5, 0.0),
            ..Transform::identity()
        };
        registry.render_mut().set_transform(render_key, &transform);

        let backend = self.backend.as_mut().ok_or(PhysicsError::NotInitialized)?;
        let body = backend.create_body(BodySettings {
            shape: PhysicsShape::Box {
                width: size,
                height: 1.0,
                depth: size,
            },
            position: transform.position,
            rotation: Quat::identity(),
            motion_type: MotionType::Static,
            mass: 0.0,
        })?;
        backend.set_friction(body, 0.2);

        self.floor = Some((render_key, body));
        log::debug!("Spawned {}x{} floor", size, size);
        Ok(())
    }

    /// Tear down all physics state, releasing the world interface
    ///
    /// Engine-level removal errors are logged and skipped so partial cleanup
    /// never aborts the sweep. The synchronization engine itself stays
    /// usable: a subsequent `initialize` starts a fresh world.
    pub fn reset<R: RenderBackend>(&mut self, registry: &mut ObjectRegistry<R>) {
        let tracked: Vec<(String, BodyKey)> = registry
            .objects()
            .filter_map(|o| o.body.map(|b| (o.name.clone(), b)))
            .collect();

        for (name, body) in tracked {
            if let Some(object) = registry.object_mut(&name) {
                object.body = None;
                object.physics = None;
            }
            self.release_body(body);
        }
        if let Some((render_key, body)) = self.floor.take() {
            registry.render_mut().dispose(render_key);
            self.release_body(body);
        }
        self.dynamic_set.clear();
        self.backend = None;
        log::info!("Physics reset: world interface released");
    }

    /// Names of objects whose body is dynamic
    pub fn dynamic_set(&self) -> &HashSet<String> {
        &self.dynamic_set
    }

    /// Whether the object's body is in the dynamic subset
    pub fn is_dynamic(&self, name: &str) -> bool {
        self.dynamic_set.contains(name)
    }

    /// Recorded physics config of an object, if attached
    pub fn object_physics_config<R: RenderBackend>(
        &self,
        registry: &ObjectRegistry<R>,
        name: &str,
    ) -> Option<PhysicsConfig> {
        registry.object(name).and_then(|o| o.physics)
    }

    /// Inject the gravity model's radial forces for the coming step
    pub fn apply_radial_forces<R: RenderBackend>(&mut self, registry: &ObjectRegistry<R>) {
        if !self.gravity.is_radial() {
            return;
        }
        let Some(backend) = self.backend.as_deref_mut() else {
            return;
        };
        let bodies: Vec<BodyKey> = self
            .dynamic_set
            .iter()
            .filter_map(|name| registry.object(name).and_then(|o| o.body))
            .collect();
        self.gravity.apply_radial_forces(backend, bodies.iter());
    }

    /// Advance the physics world
    pub fn step(&mut self, delta_time: f32, sub_steps: u32) -> Result<(), PhysicsError> {
        let backend = self.backend.as_deref_mut().ok_or(PhysicsError::NotInitialized)?;
        backend.step(delta_time, sub_steps);
        Ok(())
    }

    /// Copy every dynamic body's position/rotation into its render handle
    pub fn sync_transforms<R: RenderBackend>(&mut self, registry: &mut ObjectRegistry<R>) {
        let Some(backend) = self.backend.as_deref() else {
            return;
        };
        let updates: Vec<(RenderKey, Vec3, Quat)> = self
            .dynamic_set
            .iter()
            .filter_map(|name| {
                let object = registry.object(name)?;
                let body = object.body?;
                let position = backend.body_position(body)?;
                let rotation = backend.body_rotation(body)?;
                Some((object.render_key, position, rotation))
            })
            .collect();

        for (render_key, position, rotation) in updates {
            if let Some(mut transform) = registry.render().transform(render_key) {
                transform.position = position;
                transform.rotation = rotation;
                registry.render_mut().set_transform(render_key, &transform);
            }
        }
    }

    /// Remove-then-destroy a body, tolerating engine-level errors
    fn release_body(&mut self, body: BodyKey) {
        let Some(backend) = self.backend.as_deref_mut() else {
            return;
        };
        if let Err(err) = backend.remove_body(body) {
            log::warn!("Body removal failed, continuing sweep: {}", err);
        }
        if let Err(err) = backend.destroy_body(body) {
            log::warn!("Body destruction failed, continuing sweep: {}", err);
        }
    }
}

impl Default for PhysicsSync {
    fn default() -> Self {
        Self::new()
    }
}
