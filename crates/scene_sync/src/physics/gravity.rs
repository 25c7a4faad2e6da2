//! Gravity model
//!
//! Exactly one model is active system-wide: a uniform vector applied
//! natively by the physics engine, or a radial attractor field injected as
//! explicit per-step forces. Switching to radial must zero the engine's
//! native gravity so forces are never double-applied; the caller that owns
//! the backend enforces that (see `PhysicsSync::set_gravity`).

use super::backend::{BodyKey, PhysicsBackend};
use crate::foundation::math::Vec3;

/// Squared-distance floor below which radial force is skipped, avoiding the
/// inverse-square singularity at the attractor center
pub const RADIAL_EPSILON_SQ: f32 = 1e-6;

/// Active gravity model
#[derive(Debug, Clone, PartialEq)]
pub enum GravityModel {
    /// Constant acceleration vector, applied natively by the engine
    Uniform {
        /// Gravity vector in m/s²
        vector: Vec3,
    },
    /// Inverse-square attraction toward a center plus point attractors
    Radial {
        /// Primary attractor center; not known at model-set time, installed
        /// when the attracting body is added
        center: Option<Vec3>,
        /// Primary attractor strength
        strength: f32,
        /// Additional point attractors as (position, strength)
        attractors: Vec<(Vec3, f32)>,
    },
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::Uniform {
            vector: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl GravityModel {
    /// Uniform gravity with the given vector
    pub fn uniform(vector: Vec3) -> Self {
        Self::Uniform { vector }
    }

    /// Radial gravity with the given primary strength and no center yet
    pub fn radial(strength: f32) -> Self {
        Self::Radial {
            center: None,
            strength,
            attractors: Vec::new(),
        }
    }

    /// Whether the radial model is active
    pub fn is_radial(&self) -> bool {
        matches!(self, Self::Radial { .. })
    }

    /// Install the primary attractor center (radial model only)
    pub fn set_attractor_center(&mut self, position: Vec3) {
        match self {
            Self::Radial { center, .. } => *center = Some(position),
            Self::Uniform { .. } => {
                log::warn!("Ignoring attractor center: uniform gravity is active");
            }
        }
    }

    /// Register an additional point attractor (radial model only)
    pub fn add_attractor(&mut self, position: Vec3, strength: f32) {
        match self {
            Self::Radial { attractors, .. } => attractors.push((position, strength)),
            Self::Uniform { .. } => {
                log::warn!("Ignoring point attractor: uniform gravity is active");
            }
        }
    }

    /// Inject radial forces for one simulation step
    ///
    /// For every dynamic body: bodies closer to an attractor than the
    /// epsilon are skipped (no singularity), bodies with zero inverse mass
    /// are exempt, and the force magnitude is inverse-square in distance and
    /// proportional to the body's mass, directed from the body toward the
    /// attractor. Does nothing under the uniform model.
    pub fn apply_radial_forces<'a>(
        &self,
        backend: &mut dyn PhysicsBackend,
        bodies: impl IntoIterator<Item = &'a BodyKey>,
    ) {
        let Self::Radial {
            center,
            strength,
            attractors,
        } = self
        else {
            return;
        };

        for &body in bodies {
            let Some(position) = backend.body_position(body) else {
                continue;
            };
            let Some(inverse_mass) = backend.inverse_mass(body) else {
                continue;
            };
            if inverse_mass == 0.0 {
                // Effectively infinite mass: exempt from attraction
                continue;
            }
            let mass = 1.0 / inverse_mass;

            let mut total = Vec3::zeros();
            let primary = center.iter().map(|&c| (c, *strength));
            for (attractor, gain) in primary.chain(attractors.iter().copied()) {
                let displacement = attractor - position;
                let distance_sq = displacement.norm_squared();
                if distance_sq < RADIAL_EPSILON_SQ {
                    continue;
                }
                total += displacement.normalize() * (gain * mass / distance_sq);
            }
            if total != Vec3::zeros() {
                backend.apply_force(body, total);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::backend::{BodySettings, MotionType};
    use crate::physics::rigid_world::RigidWorld;
    use crate::physics::shape::PhysicsShape;
    use crate::foundation::math::Quat;

    fn spawn(world: &mut RigidWorld, position: Vec3, motion_type: MotionType) -> BodyKey {
        world
            .create_body(BodySettings {
                shape: PhysicsShape::Sphere { radius: 0.5 },
                position,
                rotation: Quat::identity(),
                motion_type,
                mass: 1.0,
            })
            .unwrap()
    }

    #[test]
    fn test_radial_pulls_body_toward_center() {
        let mut world = RigidWorld::new();
        let body = spawn(&mut world, Vec3::new(10.0, 0.0, 0.0), MotionType::Dynamic);

        let mut model = GravityModel::radial(100.0);
        model.set_attractor_center(Vec3::zeros());

        model.apply_radial_forces(&mut world, [&body]);
        world.step(1.0 / 60.0, 1);

        let velocity = world.linear_velocity(body).unwrap();
        assert!(velocity.x < 0.0, "expected pull toward -x, got {:?}", velocity);
        assert!(velocity.x.is_finite());
    }

    #[test]
    fn test_no_force_inside_epsilon() {
        let mut world = RigidWorld::new();
        let body = spawn(&mut world, Vec3::zeros(), MotionType::Dynamic);

        let mut model = GravityModel::radial(1000.0);
        model.set_attractor_center(Vec3::zeros());

        model.apply_radial_forces(&mut world, [&body]);
        world.step(1.0 / 60.0, 1);

        let velocity = world.linear_velocity(body).unwrap();
        assert_eq!(velocity, Vec3::zeros());
        assert!(velocity.x.is_finite() && velocity.y.is_finite() && velocity.z.is_finite());
    }

    #[test]
    fn test_infinite_mass_bodies_exempt() {
        let mut world = RigidWorld::new();
        let body = spawn(&mut world, Vec3::new(5.0, 0.0, 0.0), MotionType::Static);

        let mut model = GravityModel::radial(100.0);
        model.set_attractor_center(Vec3::zeros());

        model.apply_radial_forces(&mut world, [&body]);
        world.step(1.0 / 60.0, 1);

        assert_eq!(world.body_position(body), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_uniform_model_applies_nothing() {
        let mut world = RigidWorld::new();
        let body = spawn(&mut world, Vec3::new(5.0, 0.0, 0.0), MotionType::Dynamic);

        let model = GravityModel::uniform(Vec3::new(0.0, -9.81, 0.0));
        model.apply_radial_forces(&mut world, [&body]);
        world.step(1.0 / 60.0, 1);

        // Backend gravity was never set, and the model injected no force
        assert_eq!(world.linear_velocity(body), Some(Vec3::zeros()));
    }

    #[test]
    fn test_point_attractors_accumulate() {
        let mut world = RigidWorld::new();
        let body = spawn(&mut world, Vec3::zeros(), MotionType::Dynamic);

        let mut model = GravityModel::radial(0.0);
        model.add_attractor(Vec3::new(2.0, 0.0, 0.0), 10.0);
        model.add_attractor(Vec3::new(0.0, 2.0, 0.0), 10.0);

        model.apply_radial_forces(&mut world, [&body]);
        world.step(1.0, 1);

        let velocity = world.linear_velocity(body).unwrap();
        assert!(velocity.x > 0.0 && velocity.y > 0.0);
    }
}
