//! Simulation clock
//!
//! Owns the running flag, the pre-simulation snapshot used by stop-restore,
//! delta-time clamping, sub-step selection, and the fixed-rate action hook.

use std::collections::HashMap;

use crate::config::ObjectKind;
use crate::foundation::math::Transform;
use crate::physics::{PhysicsError, PhysicsSync};
use crate::render::RenderBackend;
use crate::scene::registry::ObjectRegistry;

/// Largest delta-time fed to one physics step (a 30 FPS frame)
pub const MAX_STEP: f32 = 1.0 / 30.0;

/// Frames slower than this get two sub-steps
pub const SUBSTEP_THRESHOLD: f32 = 1.0 / 55.0;

/// Sub-step count for a given (already clamped) delta-time
pub fn sub_steps_for(delta_time: f32) -> u32 {
    if delta_time > SUBSTEP_THRESHOLD {
        2
    } else {
        1
    }
}

/// Hook invoked at a fixed simulated-time rate while running
pub type ActionHook = Box<dyn FnMut(f64)>;

/// Start/stop lifecycle and per-frame advancement of the simulation
pub struct SimulationClock {
    running: bool,
    sim_time: f64,
    snapshots: HashMap<String, Transform>,
    actions_per_second: f64,
    action_accumulator: f64,
    action_hook: Option<ActionHook>,
}

impl SimulationClock {
    /// Create a stopped clock with no action hook
    pub fn new() -> Self {
        Self {
            running: false,
            sim_time: 0.0,
            snapshots: HashMap::new(),
            actions_per_second: 0.0,
            action_accumulator: 0.0,
            action_hook: None,
        }
    }

    /// Whether the simulation is advancing
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulated simulated seconds since the last start
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Install a hook fired `rate` times per simulated second
    pub fn set_action_hook(&mut self, rate: f64, hook: ActionHook) {
        self.actions_per_second = rate;
        self.action_hook = Some(hook);
    }

    /// Start the simulation, snapshotting restorable object transforms
    ///
    /// Meshes and groups are snapshotted; lights and helpers never move
    /// under physics, so they are skipped. Starting while already running
    /// is a no-op and keeps the original snapshot.
    pub fn start<R: RenderBackend>(&mut self, registry: &ObjectRegistry<R>) {
        if self.running {
            return;
        }
        self.snapshots.clear();
        for object in registry.objects() {
            if !matches!(object.config.kind, ObjectKind::Mesh | ObjectKind::Group) {
                continue;
            }
            if let Some(transform) = registry.render().transform(object.render_key) {
                self.snapshots.insert(object.name.clone(), transform);
            }
        }
        self.sim_time = 0.0;
        self.action_accumulator = 0.0;
        self.running = true;
        log::info!("Simulation started ({} snapshots)", self.snapshots.len());
    }

    /// Stop the simulation and restore the pre-start snapshot
    ///
    /// Restores both the render transform and, for objects with a live
    /// body, the body transform with velocities zeroed so a later restart
    /// does not inherit stale momentum. Objects added mid-run have no
    /// snapshot and keep their current transform.
    pub fn stop<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        physics: &mut PhysicsSync,
    ) {
        if !self.running {
            return;
        }
        self.running = false;

        let names: Vec<String> = self.snapshots.keys().cloned().collect();
        for name in names {
            let Some(transform) = self.snapshots.get(&name).cloned() else {
                continue;
            };
            let Some(object) = registry.object(&name) else {
                continue;
            };
            let render_key = object.render_key;
            let body = object.body;
            registry.render_mut().set_transform(render_key, &transform);

            if let (Some(body), Some(backend)) = (body, physics.backend_mut()) {
                backend.set_body_transform(body, transform.position, transform.rotation);
                backend.set_linear_velocity(body, crate::foundation::math::Vec3::zeros());
                backend.set_angular_velocity(body, crate::foundation::math::Vec3::zeros());
            }
        }
        self.snapshots.clear();
        log::info!("Simulation stopped after {:.2}s", self.sim_time);
    }

    /// Toggle between running and stopped
    pub fn toggle<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        physics: &mut PhysicsSync,
    ) {
        if self.running {
            self.stop(registry, physics);
        } else {
            self.start(registry);
        }
    }

    /// Discard the snapshot store without restoring anything
    ///
    /// Used when physics is reset while stopped: the snapshots reference
    /// bodies that no longer exist.
    pub fn clear_snapshots(&mut self) {
        self.snapshots.clear();
    }

    /// Advance one frame
    ///
    /// No-op while stopped. Delta-time is clamped to `0..=`[`MAX_STEP`] so a
    /// paused-process frame cannot tunnel bodies and a backwards scheduler
    /// clock cannot rewind them; radial forces are injected before stepping,
    /// and dynamic transforms are pulled back into the render engine
    /// afterwards.
    pub fn tick<R: RenderBackend>(
        &mut self,
        registry: &mut ObjectRegistry<R>,
        physics: &mut PhysicsSync,
        delta_time: f32,
    ) -> Result<(), PhysicsError> {
        if !self.running {
            return Ok(());
        }
        let delta_time = delta_time.clamp(0.0, MAX_STEP);

        physics.apply_radial_forces(registry);
        physics.step(delta_time, sub_steps_for(delta_time))?;
        physics.sync_transforms(registry);

        self.sim_time += f64::from(delta_time);
        if self.actions_per_second > 0.0 {
            let interval = 1.0 / self.actions_per_second;
            self.action_accumulator += f64::from(delta_time);
            while self.action_accumulator >= interval {
                self.action_accumulator -= interval;
                if let Some(hook) = self.action_hook.as_mut() {
                    hook(self.sim_time);
                }
            }
        }
        Ok(())
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
