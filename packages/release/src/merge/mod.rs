//! Fragment merging.
//!
//! The engine walks a fragment and mirrors the walk into the release,
//! choosing a merge policy at every path from the [`SchemaRegistry`].
//!
//! [`SchemaRegistry`]: crate::schema::SchemaRegistry

mod engine;
mod list;

pub use engine::MergeEngine;
