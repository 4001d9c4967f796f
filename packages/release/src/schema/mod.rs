//! Release schema configuration for the merge engine.
//!
//! The schema says which paths hold entity collections, which attribute
//! identifies an entity in each of them, and which fields deviate from the
//! default merge policy. It is resolved once when the engine is built.

mod config;
mod registry;
mod types;

pub use config::create_ocds_schema;
pub use registry::SchemaRegistry;
pub use types::{CollectionSpec, Identity, MergePolicy};
