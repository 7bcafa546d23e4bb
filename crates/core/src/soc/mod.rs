//! External collaborators.
//!
//! The traits the core uses to reach memory and tracing, plus a flat RAM
//! implementation used by tests and simple embedders.

/// Flat RAM implementation of [`Memory`].
pub mod memory;

/// Collaborator trait definitions.
pub mod traits;

pub use memory::FlatMemory;
pub use traits::{FlushScope, Memory, NullSink, TraceSink, TracingSink};
