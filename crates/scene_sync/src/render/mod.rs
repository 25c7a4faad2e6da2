//! Rendering subsystem boundary
//!
//! The engine never draws anything itself; it drives a scene graph behind
//! the [`backend::RenderBackend`] trait. [`headless::HeadlessRenderer`] is
//! the in-memory reference implementation used by tests and demos.

pub mod backend;
pub mod headless;

pub use backend::{RenderBackend, RenderError, RenderKey};
pub use headless::HeadlessRenderer;
