//! Reference physics backend
//!
//! A minimal rigid-body world implementing [`PhysicsBackend`]: slotmap body
//! table, semi-implicit Euler integration, force accumulation cleared after
//! each step. There is no narrow-phase collision response; a full engine
//! (Jolt, Rapier) plugs in behind the same trait. This backend exists so the
//! synchronization core is exercisable headlessly.

use slotmap::SlotMap;

use super::backend::{BodyKey, BodySettings, BroadPhaseLayer, MotionType, PhysicsBackend};
use super::shape::PhysicsShape;
use super::PhysicsError;
use crate::foundation::math::{Quat, Vec3};

/// One body in the reference world
#[derive(Debug)]
struct RigidBody {
    #[allow(dead_code)] // kept for narrow-phase extensions
    shape: PhysicsShape,
    motion_type: MotionType,
    layer: BroadPhaseLayer,
    position: Vec3,
    rotation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    inverse_mass: f32,
    friction: f32,
    restitution: f32,
    force: Vec3,
    in_world: bool,
}

/// Reference rigid-body world
pub struct RigidWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    gravity: Vec3,
}

impl RigidWorld {
    /// Create an empty world with zero gravity
    pub fn new() -> Self {
        Self {
            bodies: SlotMap::with_key(),
            gravity: Vec3::zeros(),
        }
    }

    fn integrate(&mut self, h: f32) {
        for body in self.bodies.values_mut() {
            if !body.in_world
                || body.motion_type != MotionType::Dynamic
                || body.inverse_mass == 0.0
            {
                continue;
            }
            let acceleration = self.gravity + body.force * body.inverse_mass;
            body.linear_velocity += acceleration * h;
            body.position += body.linear_velocity * h;
            if body.angular_velocity != Vec3::zeros() {
                let delta = Quat::from_scaled_axis(body.angular_velocity * h);
                body.rotation = delta * body.rotation;
            }
        }
    }
}

impl Default for RigidWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for RigidWorld {
    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn create_body(&mut self, settings: BodySettings) -> Result<BodyKey, PhysicsError> {
        let inverse_mass =
            if settings.motion_type == MotionType::Dynamic && settings.mass > 0.0 {
                1.0 / settings.mass
            } else {
                0.0
            };

        let key = self.bodies.insert(RigidBody {
            layer: settings.motion_type.broad_phase_layer(),
            shape: settings.shape,
            motion_type: settings.motion_type,
            position: settings.position,
            rotation: settings.rotation,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            inverse_mass,
            friction: 0.0,
            restitution: 0.0,
            force: Vec3::zeros(),
            in_world: true,
        });

        log::debug!(
            "Created {:?} body {:?} ({} in world)",
            settings.motion_type,
            key,
            self.bodies.len()
        );
        Ok(key)
    }

    fn remove_body(&mut self, body: BodyKey) -> Result<(), PhysicsError> {
        let entry = self.bodies.get_mut(body).ok_or(PhysicsError::BodyMissing)?;
        if !entry.in_world {
            return Err(PhysicsError::BodyMissing);
        }
        entry.in_world = false;
        Ok(())
    }

    fn destroy_body(&mut self, body: BodyKey) -> Result<(), PhysicsError> {
        self.bodies
            .remove(body)
            .map(|_| ())
            .ok_or(PhysicsError::BodyMissing)
    }

    fn body_position(&self, body: BodyKey) -> Option<Vec3> {
        self.bodies.get(body).map(|b| b.position)
    }

    fn body_rotation(&self, body: BodyKey) -> Option<Quat> {
        self.bodies.get(body).map(|b| b.rotation)
    }

    fn set_body_transform(&mut self, body: BodyKey, position: Vec3, rotation: Quat) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.position = position;
            entry.rotation = rotation;
        }
    }

    fn linear_velocity(&self, body: BodyKey) -> Option<Vec3> {
        self.bodies.get(body).map(|b| b.linear_velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyKey, velocity: Vec3) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.linear_velocity = velocity;
        }
    }

    fn angular_velocity(&self, body: BodyKey) -> Option<Vec3> {
        self.bodies.get(body).map(|b| b.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyKey, velocity: Vec3) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.angular_velocity = velocity;
        }
    }

    fn set_friction(&mut self, body: BodyKey, friction: f32) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.friction = friction;
        }
    }

    fn set_restitution(&mut self, body: BodyKey, restitution: f32) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.restitution = restitution;
        }
    }

    fn inverse_mass(&self, body: BodyKey) -> Option<f32> {
        self.bodies.get(body).map(|b| b.inverse_mass)
    }

    fn broad_phase_layer(&self, body: BodyKey) -> Option<BroadPhaseLayer> {
        self.bodies.get(body).map(|b| b.layer)
    }

    fn apply_force(&mut self, body: BodyKey, force: Vec3) {
        if let Some(entry) = self.bodies.get_mut(body) {
            entry.force += force;
        }
    }

    fn step(&mut self, delta_time: f32, sub_steps: u32) {
        let sub_steps = sub_steps.max(1);
        let h = delta_time / sub_steps as f32;
        for _ in 0..sub_steps {
            self.integrate(h);
        }
        // Forces are one-shot: injected before each step, consumed by it
        for body in self.bodies.values_mut() {
            body.force = Vec3::zeros();
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dynamic_settings(position: Vec3, mass: f32) -> BodySettings {
        BodySettings {
            shape: PhysicsShape::Sphere { radius: 0.5 },
            position,
            rotation: Quat::identity(),
            motion_type: MotionType::Dynamic,
            mass,
        }
    }

    #[test]
    fn test_dynamic_body_falls_under_gravity() {
        let mut world = RigidWorld::new();
        world.set_gravity(Vec3::new(0.0, -9.81, 0.0));
        let body = world
            .create_body(dynamic_settings(Vec3::new(0.0, 10.0, 0.0), 1.0))
            .unwrap();

        for _ in 0..60 {
            world.step(1.0 / 60.0, 1);
        }

        let y = world.body_position(body).unwrap().y;
        assert!(y < 10.0, "body did not fall: y = {}", y);
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut world = RigidWorld::new();
        world.set_gravity(Vec3::new(0.0, -9.81, 0.0));
        let body = world
            .create_body(BodySettings {
                shape: PhysicsShape::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                position: Vec3::new(0.0, -0.5, 0.0),
                rotation: Quat::identity(),
                motion_type: MotionType::Static,
                mass: 0.0,
            })
            .unwrap();

        world.step(1.0, 2);
        assert_eq!(
            world.body_position(body).unwrap(),
            Vec3::new(0.0, -0.5, 0.0)
        );
        assert_eq!(world.inverse_mass(body), Some(0.0));
    }

    #[test]
    fn test_forces_cleared_after_step() {
        let mut world = RigidWorld::new();
        let body = world
            .create_body(dynamic_settings(Vec3::zeros(), 2.0))
            .unwrap();

        world.apply_force(body, Vec3::new(4.0, 0.0, 0.0));
        world.step(1.0, 1);
        let vx_after_push = world.linear_velocity(body).unwrap().x;
        assert_relative_eq!(vx_after_push, 2.0, epsilon = 1e-5);

        // No new force: velocity stays constant
        world.step(1.0, 1);
        assert_relative_eq!(
            world.linear_velocity(body).unwrap().x,
            vx_after_push,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_remove_then_destroy_lifecycle() {
        let mut world = RigidWorld::new();
        let body = world
            .create_body(dynamic_settings(Vec3::zeros(), 1.0))
            .unwrap();

        world.remove_body(body).unwrap();
        assert!(world.remove_body(body).is_err());
        world.destroy_body(body).unwrap();
        assert!(world.destroy_body(body).is_err());
        assert_eq!(world.body_count(), 0);
    }
}
