//! OCDS release package wrapper.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use ted_ocds_release::Release;

use super::writer::{generate_json, write_atomic};
use crate::config::{ConverterConfig, OCDS_VERSION, PACKAGE_FILE_NAME};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub name: String,
}

/// A release package: releases plus publication metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePackage {
    pub uri: String,
    pub published_date: String,
    pub publisher: Publisher,
    pub version: String,
    pub releases: Vec<Release>,
}

impl ReleasePackage {
    /// Package releases, published now by the configured publisher.
    ///
    /// `uri` is where the package will be available.
    #[must_use]
    pub fn new(releases: Vec<Release>, uri: impl Into<String>, config: &ConverterConfig) -> Self {
        Self {
            uri: uri.into(),
            published_date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            publisher: Publisher {
                name: config.publisher_name.clone(),
            },
            version: OCDS_VERSION.to_string(),
            releases,
        }
    }
}

/// Save a release package to `<output_dir>/release-package.json`.
///
/// The package `uri` is the file's `file://` URL.
///
/// # Errors
/// Returns `Io` if the file cannot be written, or `Json` if serialization
/// fails.
pub fn save_package(
    releases: Vec<Release>,
    output_dir: &Path,
    config: &ConverterConfig,
) -> Result<PathBuf> {
    let output_file = output_dir.join(PACKAGE_FILE_NAME);
    let uri = format!("file://{}", output_file.display());

    let package = ReleasePackage::new(releases, uri, config);
    write_atomic(&output_file, &generate_json(&package)?)?;
    Ok(output_file)
}
