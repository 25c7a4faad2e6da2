//! Physics subsystem
//!
//! The physics engine itself lives behind the [`backend::PhysicsBackend`]
//! boundary; this module owns everything that synchronizes scene objects
//! with it: shape derivation, the gravity model, and the body lifecycle.

pub mod backend;
pub mod gravity;
pub mod rigid_world;
pub mod shape;
pub mod sync;

pub use backend::{BodyKey, BodySettings, BroadPhaseLayer, MotionType, PhysicsBackend};
pub use gravity::GravityModel;
pub use rigid_world::RigidWorld;
pub use shape::{scaled_shape, PhysicsShape};
pub use sync::{BatchAttachReport, PhysicsSync};

use thiserror::Error;

/// Physics subsystem errors
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// A physics operation was attempted before the backend was installed
    #[error("physics engine not initialized")]
    NotInitialized,

    /// The referenced scene object does not exist
    #[error("object not found: {0}")]
    ObjectMissing(String),

    /// Deriving or constructing the collision shape failed
    #[error("shape creation failed: {0}")]
    ShapeCreationFailed(String),

    /// The referenced body does not exist in the physics world
    #[error("body not found in physics world")]
    BodyMissing,
}
