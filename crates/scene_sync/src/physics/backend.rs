//! Physics engine boundary
//!
//! The collaborator interface the synchronization core needs from a physics
//! engine: body lifecycle, per-body state access, force injection, and a
//! sub-stepped `step` entry point. A body's broad-phase layer is determined
//! solely by its motion type, never set independently.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::shape::PhysicsShape;
use super::PhysicsError;
use crate::foundation::math::{Quat, Vec3};

new_key_type! {
    /// Handle to a body owned by the physics world
    ///
    /// Generational: a key outliving its body is detectably stale, so scene
    /// objects can hold it as a weak back-reference without owning the body.
    pub struct BodyKey;
}

/// Motion classification of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionType {
    /// Immovable; participates in collision but never integrates
    #[default]
    Static,
    /// Fully simulated; responds to gravity and forces
    Dynamic,
    /// Externally driven; moves but ignores forces
    Kinematic,
}

impl MotionType {
    /// Broad-phase bucket implied by this motion type
    pub fn broad_phase_layer(self) -> BroadPhaseLayer {
        match self {
            Self::Dynamic => BroadPhaseLayer::Moving,
            Self::Static | Self::Kinematic => BroadPhaseLayer::NonMoving,
        }
    }
}

/// Coarse collision-filtering bucket used by the broad phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadPhaseLayer {
    /// Bodies that never move (static and kinematic)
    NonMoving,
    /// Simulated bodies
    Moving,
}

/// Everything the physics engine needs to construct a body
#[derive(Debug, Clone)]
pub struct BodySettings {
    /// Collision shape, already scaled to world dimensions
    pub shape: PhysicsShape,
    /// Initial world position
    pub position: Vec3,
    /// Initial world rotation
    pub rotation: Quat,
    /// Motion classification; also fixes the broad-phase layer
    pub motion_type: MotionType,
    /// Mass in kilograms; ignored unless the body is dynamic
    pub mass: f32,
}

/// Interface the synchronization core requires from a physics engine
///
/// Implementations own their bodies outright; callers keep only [`BodyKey`]
/// back-references and must release bodies explicitly.
pub trait PhysicsBackend {
    /// Set the engine's native uniform gravity vector
    fn set_gravity(&mut self, gravity: Vec3);

    /// Get the engine's native uniform gravity vector
    fn gravity(&self) -> Vec3;

    /// Create a body and add it to the world
    fn create_body(&mut self, settings: BodySettings) -> Result<BodyKey, PhysicsError>;

    /// Remove a body from the simulation without destroying it
    fn remove_body(&mut self, body: BodyKey) -> Result<(), PhysicsError>;

    /// Destroy a previously removed body, releasing its storage
    fn destroy_body(&mut self, body: BodyKey) -> Result<(), PhysicsError>;

    /// Current world position of a body
    fn body_position(&self, body: BodyKey) -> Option<Vec3>;

    /// Current world rotation of a body
    fn body_rotation(&self, body: BodyKey) -> Option<Quat>;

    /// Teleport a body to a new position and rotation
    fn set_body_transform(&mut self, body: BodyKey, position: Vec3, rotation: Quat);

    /// Current linear velocity of a body
    fn linear_velocity(&self, body: BodyKey) -> Option<Vec3>;

    /// Set the linear velocity of a body
    fn set_linear_velocity(&mut self, body: BodyKey, velocity: Vec3);

    /// Current angular velocity of a body
    fn angular_velocity(&self, body: BodyKey) -> Option<Vec3>;

    /// Set the angular velocity of a body
    fn set_angular_velocity(&mut self, body: BodyKey, velocity: Vec3);

    /// Set the surface friction coefficient of a body
    fn set_friction(&mut self, body: BodyKey, friction: f32);

    /// Set the surface restitution of a body
    fn set_restitution(&mut self, body: BodyKey, restitution: f32);

    /// Inverse mass of a body; zero means effectively infinite mass
    fn inverse_mass(&self, body: BodyKey) -> Option<f32>;

    /// Broad-phase layer the body was classified into
    fn broad_phase_layer(&self, body: BodyKey) -> Option<BroadPhaseLayer>;

    /// Accumulate an external force on a body for the next step
    fn apply_force(&mut self, body: BodyKey, force: Vec3);

    /// Advance the simulation by `delta_time` using `sub_steps` integration
    /// passes
    fn step(&mut self, delta_time: f32, sub_steps: u32);

    /// Number of bodies currently in the world
    fn body_count(&self) -> usize;
}
