//! OCDS release documents and the fragment merge engine.
//!
//! Business-term producers each emit a small, release-shaped [`Fragment`].
//! The [`MergeEngine`] folds those fragments into one [`Release`] while
//! keeping every entity collection a set keyed by identity.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use ted_ocds_release::{create_ocds_schema, MergeEngine, Release};
//!
//! let engine = MergeEngine::new(create_ocds_schema());
//! let mut release = Release::new();
//!
//! engine.apply(&mut release, json!({"parties": [{"id": "ORG-1", "roles": ["buyer"]}]})).unwrap();
//! engine.apply(&mut release, json!({"parties": [{"id": "ORG-1", "roles": ["supplier"]}]})).unwrap();
//!
//! assert_eq!(
//!     release.get("parties"),
//!     Some(&json!([{"id": "ORG-1", "roles": ["buyer", "supplier"]}]))
//! );
//! ```
//!
//! # Architecture
//!
//! - [`path`]: Dotted field paths with entity positions elided
//! - [`schema`]: Per-collection identity keys and per-field merge policies
//! - [`fragment`]: Typed fragments and the [`Mergeable`] capability
//! - [`merge`]: The merge engine itself
//! - [`release`]: The release document
//! - [`sequence`]: Notice-scoped id sequences for producers that mint ids
//! - [`error`]: Error types and Result alias

pub mod error;
pub mod fragment;
pub mod merge;
pub mod path;
pub mod release;
pub mod schema;
pub mod sequence;

pub use error::{MergeError, Result};
pub use fragment::{Entity, Fragment, Mergeable};
pub use merge::MergeEngine;
pub use path::FieldPath;
pub use release::Release;
pub use schema::{create_ocds_schema, CollectionSpec, Identity, MergePolicy, SchemaRegistry};
pub use sequence::IdSequence;
