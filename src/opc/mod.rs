//! Open Packaging Convention plumbing shared by every mutator: relationship
//! tables and the package content-type registry.

pub mod constants;
pub mod content_types;
pub mod rels;

pub use content_types::ContentTypes;
pub use rels::{Relationship, Relationships};
