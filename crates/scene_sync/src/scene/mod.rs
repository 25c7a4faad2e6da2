//! Scene object lifecycle
//!
//! The [`registry::ObjectRegistry`] owns the list of logical scene objects,
//! their declarative configs, and their render-engine handles; it mediates
//! add/replace/update/remove and layer visibility/opacity.

pub mod object;
pub mod registry;

pub use object::{Layer, SceneObject};
pub use registry::{BulkAddReport, ObjectRegistry, SceneExport};

use thiserror::Error;

use crate::render::RenderError;

/// Object registry errors
///
/// Construction failures are recovered locally: the failing operation is a
/// no-op on registry state and the caller gets this diagnostic.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Unknown shape/material/light/helper descriptor
    #[error(transparent)]
    UnsupportedDescriptor(#[from] RenderError),

    /// An object with this name already exists
    #[error("duplicate object name: {0}")]
    DuplicateName(String),

    /// A `scene`-type descriptor carries ambient configuration, not an
    /// object, and cannot stand in for one
    #[error("ambient scene descriptor cannot replace object: {0}")]
    AmbientDescriptor(String),

    /// The referenced object does not exist
    #[error("object not found: {0}")]
    UnknownObject(String),
}
