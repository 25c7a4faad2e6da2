//! # Scene Sync
//!
//! A declarative scene-and-physics synchronization engine.
//!
//! ## Features
//!
//! - **Object Registry**: Logical ids mapped to paired render/physics handles
//! - **Declarative Scenes**: JSON descriptors in, live state out, JSON back
//! - **Physics Sync**: Body lifecycle, motion-type classification, per-frame
//!   transform pull for the dynamic subset
//! - **Gravity Models**: Uniform vector or radial attractors
//! - **Simulation Clock**: Start/stop with lossless snapshot restore
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_sync::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = SceneEngine::new(HeadlessRenderer::new());
//!     engine.initialize_physics(Box::new(RigidWorld::new()));
//!
//!     engine.load_scene_json(
//!         r#"[{"name": "ball",
//!              "shape": {"type": "sphere", "radius": 0.5},
//!              "pos": [0.0, 5.0, 0.0],
//!              "physics": {"motionType": "dynamic", "mass": 1.0}}]"#,
//!     );
//!
//!     engine.start_simulation();
//!     engine.tick(1.0 / 60.0)?;
//!
//!     println!("{}", engine.export_json()?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;
pub mod simulation;

mod engine;

pub use engine::{EngineError, SceneEngine};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{MaterialConfig, ObjectConfig, ObjectPatch, PhysicsConfig, ShapeConfig},
        foundation::math::{Transform, Vec3},
        physics::{GravityModel, MotionType, PhysicsBackend, PhysicsSync, RigidWorld},
        render::{HeadlessRenderer, RenderBackend},
        scene::{ObjectRegistry, SceneError, SceneExport},
        simulation::SimulationClock,
        EngineError, SceneEngine,
    };
}
