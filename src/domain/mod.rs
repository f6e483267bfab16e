//! Domain layer for Workflow Guardian
//!
//! Pure types describing candidate branch references and the outcome of a run.
//! Nothing here touches the file system or the environment.

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
