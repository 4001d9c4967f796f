//! Core data types for the converter.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use ted_ocds_release::Release;

/// Kind of procurement notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NoticeType {
    PriorInformationNotice,
    ContractNotice,
    ContractAwardNotice,
    /// Contract award notice announcing a modification of a contract.
    ContractAwardNoticeModification,
    Unknown,
}

impl NoticeType {
    /// Known notice types in processing order.
    pub const ORDERED: [NoticeType; 4] = [
        NoticeType::PriorInformationNotice,
        NoticeType::ContractNotice,
        NoticeType::ContractAwardNotice,
        NoticeType::ContractAwardNoticeModification,
    ];

    /// Return the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeType::PriorInformationNotice => "PriorInformationNotice",
            NoticeType::ContractNotice => "ContractNotice",
            NoticeType::ContractAwardNotice => "ContractAwardNotice",
            NoticeType::ContractAwardNoticeModification => "ContractAwardNoticeModification",
            NoticeType::Unknown => "Unknown",
        }
    }

    /// Short label for terminal output.
    #[must_use]
    pub fn short_label(&self) -> &'static str {
        match self {
            NoticeType::PriorInformationNotice => "PIN",
            NoticeType::ContractNotice => "CN",
            NoticeType::ContractAwardNotice => "CAN",
            NoticeType::ContractAwardNoticeModification => "CAN-MOD",
            NoticeType::Unknown => "?",
        }
    }

    /// Position in the processing order, `None` for unknown notices.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        Self::ORDERED.iter().position(|t| t == self)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, NoticeType::Unknown)
    }
}

impl fmt::Display for NoticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How releases are accumulated across notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationMode {
    /// One fresh release per notice.
    #[default]
    PerNotice,
    /// One release per procedure (`ocid`); later notices fold into it.
    PerProcedure,
}

/// A staged notice file with its classified type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeFile {
    pub path: PathBuf,
    pub notice_type: NoticeType,
}

impl NoticeFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, notice_type: NoticeType) -> Self {
        Self {
            path: path.into(),
            notice_type,
        }
    }

    /// File name used for ordering and reporting.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of converting one notice.
#[derive(Debug, Clone)]
pub struct NoticeOutcome {
    pub file_name: String,
    pub notice_type: NoticeType,

    /// Number of fragments applied to the release.
    pub fragments: usize,

    /// The notice's own release, or the reason it failed.
    pub result: Result<Release, String>,
}

impl NoticeOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Error message if the notice failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }
}

/// Result of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// One outcome per processed notice, in processing order.
    pub outcomes: Vec<NoticeOutcome>,

    /// Releases to write: one per converted notice, or one per procedure.
    pub releases: Vec<Release>,

    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl ConversionReport {
    /// Number of notices that converted successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of notices that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Outcomes of failed notices.
    pub fn failures(&self) -> impl Iterator<Item = &NoticeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
