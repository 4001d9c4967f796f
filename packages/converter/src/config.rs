//! Configuration constants, validation, and runtime settings.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ConverterError, Result};
use crate::types::AccumulationMode;

/// OCID prefix registered for TED notices.
pub const DEFAULT_OCID_PREFIX: &str = "ocds-0c46vo";

/// `NoticeTypeCode` value that marks a contract award notice as a
/// contract modification.
pub const MODIFICATION_NOTICE_CODE: &str = "can-modif";

/// Extension of notice files picked up from an input directory.
pub const NOTICE_FILE_EXTENSION: &str = "xml";

/// Default output directory for converted releases.
pub const DEFAULT_OUTPUT_DIR: &str = "releases";

/// OCDS schema version written to release packages.
pub const OCDS_VERSION: &str = "1.1";

/// File name of the release package written with `--package`.
pub const PACKAGE_FILE_NAME: &str = "release-package.json";

/// Publisher name written to release packages.
pub const DEFAULT_PUBLISHER: &str = "Publications Office of the European Union";

/// Environment variable overriding the OCID prefix.
pub const ENV_OCID_PREFIX: &str = "TED_OCDS_OCID_PREFIX";

/// Environment variable enabling per-procedure accumulation.
pub const ENV_PER_PROCEDURE: &str = "TED_OCDS_PER_PROCEDURE";

/// Environment variable enabling parallel producers.
pub const ENV_PARALLEL: &str = "TED_OCDS_PARALLEL";

/// OCID prefix pattern: `ocds-` followed by 6 alphanumerics.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static OCID_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ocds-[a-z0-9]{6}$").expect("valid regex"));

/// Validate an OCID prefix.
///
/// # Examples
/// ```
/// use ted_ocds_converter::config::validate_ocid_prefix;
///
/// assert!(validate_ocid_prefix("ocds-0c46vo").is_ok());
/// assert!(validate_ocid_prefix("ocds-short").is_err());
/// ```
pub fn validate_ocid_prefix(prefix: &str) -> Result<()> {
    if OCID_PREFIX_PATTERN.is_match(prefix) {
        Ok(())
    } else {
        Err(ConverterError::InvalidOcidPrefix(prefix.to_string()))
    }
}

/// Build an OCID from a prefix and a procedure identifier.
///
/// # Examples
/// ```
/// use ted_ocds_converter::config::ocid;
///
/// assert_eq!(
///     ocid("ocds-0c46vo", "1e86a664-ae3c-41eb-8529-0242ac130003"),
///     "ocds-0c46vo-1e86a664-ae3c-41eb-8529-0242ac130003"
/// );
/// ```
pub fn ocid(prefix: &str, procedure_id: &str) -> String {
    format!("{prefix}-{procedure_id}")
}

/// Runtime settings for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub ocid_prefix: String,
    pub mode: AccumulationMode,

    /// Run the producers of one notice on the rayon thread pool.
    pub parallel_producers: bool,

    pub publisher_name: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ocid_prefix: DEFAULT_OCID_PREFIX.to_string(),
            mode: AccumulationMode::PerNotice,
            parallel_producers: false,
            publisher_name: DEFAULT_PUBLISHER.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Defaults overridden by `TED_OCDS_*` environment variables.
    ///
    /// # Errors
    /// Returns `InvalidOcidPrefix` if `TED_OCDS_OCID_PREFIX` is malformed.
    pub fn from_env() -> Result<Self> {
        let config = Self::default();

        let config = match std::env::var(ENV_OCID_PREFIX) {
            Ok(prefix) => config.with_ocid_prefix(prefix)?,
            Err(_) => config,
        };

        let per_procedure = std::env::var(ENV_PER_PROCEDURE)
            .ok()
            .map(|v| env_flag(&v))
            .unwrap_or(false);

        let parallel = std::env::var(ENV_PARALLEL)
            .ok()
            .map(|v| env_flag(&v))
            .unwrap_or(false);

        Ok(config
            .with_mode(if per_procedure {
                AccumulationMode::PerProcedure
            } else {
                AccumulationMode::PerNotice
            })
            .with_parallel_producers(parallel))
    }

    /// Set the OCID prefix after validating it.
    ///
    /// # Errors
    /// Returns `InvalidOcidPrefix` if the prefix does not match `ocds-XXXXXX`.
    pub fn with_ocid_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_ocid_prefix(&prefix)?;
        self.ocid_prefix = prefix;
        Ok(self)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: AccumulationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_parallel_producers(mut self, parallel: bool) -> Self {
        self.parallel_producers = parallel;
        self
    }

    #[must_use]
    pub fn with_publisher_name(mut self, name: impl Into<String>) -> Self {
        self.publisher_name = name.into();
        self
    }
}

fn env_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
