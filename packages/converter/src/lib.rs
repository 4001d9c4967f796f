//! TED OCDS converter - Convert eForms procurement notices into OCDS releases.
//!
//! Notices are staged into a scoped working directory, classified by
//! root element, and processed in a fixed order: prior information,
//! contract, award, then modification notices. Each notice is read by a
//! set of business-term producers whose fragments are merged into an OCDS
//! release by the [`ted_ocds_release`] merge engine.
//!
//! # Example
//!
//! ```
//! use ted_ocds_converter::{NoticeClassifier, NoticeType};
//!
//! let classifier = NoticeClassifier::default();
//! let notice_type = classifier.classify_xml("<ContractNotice/>").unwrap();
//! assert_eq!(notice_type, NoticeType::ContractNotice);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, validation, and [`ConverterConfig`]
//! - [`types`]: Notice types, staged files, and conversion reports
//! - [`error`]: Error types and Result alias
//! - [`xml`]: XML utilities and eForms navigation helpers
//! - [`classify`]: Notice classification by root element
//! - [`staging`]: Scoped working directory for input notices
//! - [`ordering`]: Deterministic processing order
//! - [`producer`]: Business-term producers and their registry
//! - [`accumulator`]: Producer fan-out and release accumulation
//! - [`output`]: JSON release and package output
//! - [`cli`]: Command-line interface

pub mod accumulator;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod ordering;
pub mod output;
pub mod producer;
pub mod staging;
pub mod types;
pub mod xml;

// Re-export main functions
pub use accumulator::{convert_input, ReleaseAccumulator};

// Re-export commonly used items
pub use classify::{ClassifierConfig, NoticeClassifier};
pub use config::{validate_ocid_prefix, ConverterConfig};
pub use error::{ConverterError, Result};
pub use ordering::NoticeOrderer;
pub use staging::NoticeStager;
pub use types::{AccumulationMode, ConversionReport, NoticeFile, NoticeOutcome, NoticeType};
