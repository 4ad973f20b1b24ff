//! Subject sessions and the per-role registry.

pub mod registry;
pub mod subject;

pub use registry::SessionRegistry;
pub use subject::{SessionDeps, SubjectSession};
