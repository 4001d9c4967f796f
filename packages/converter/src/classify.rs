//! Notice classification by root element.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::config::MODIFICATION_NOTICE_CODE;
use crate::error::{ConverterError, Result};
use crate::types::NoticeType;
use crate::xml::{find_child, get_tag_name, get_text};

/// Root element names and the notice type each one maps to.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    roots: HashMap<String, NoticeType>,

    /// `NoticeTypeCode` that turns a contract award notice into a
    /// modification notice.
    pub modification_code: String,
}

impl ClassifierConfig {
    /// Create a config with no known roots.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            roots: HashMap::new(),
            modification_code: MODIFICATION_NOTICE_CODE.to_string(),
        }
    }

    /// Map a root element name to a notice type.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>, notice_type: NoticeType) -> Self {
        self.roots.insert(root.into(), notice_type);
        self
    }

    #[must_use]
    pub fn with_modification_code(mut self, code: impl Into<String>) -> Self {
        self.modification_code = code.into();
        self
    }

    /// Notice type for a root element name, `Unknown` if not configured.
    #[must_use]
    pub fn notice_type(&self, root: &str) -> NoticeType {
        self.roots.get(root).copied().unwrap_or(NoticeType::Unknown)
    }
}

impl Default for ClassifierConfig {
    /// eForms roots plus the TED 2014 standard forms.
    fn default() -> Self {
        Self::empty()
            .with_root("PriorInformationNotice", NoticeType::PriorInformationNotice)
            .with_root("ContractNotice", NoticeType::ContractNotice)
            .with_root("ContractAwardNotice", NoticeType::ContractAwardNotice)
            // TED legacy forms: prior information, contract, and award
            // notices for the classic and utilities directives.
            .with_root("F01_2014", NoticeType::PriorInformationNotice)
            .with_root("F04_2014", NoticeType::PriorInformationNotice)
            .with_root("F02_2014", NoticeType::ContractNotice)
            .with_root("F05_2014", NoticeType::ContractNotice)
            .with_root("F03_2014", NoticeType::ContractAwardNotice)
            .with_root("F06_2014", NoticeType::ContractAwardNotice)
            .with_root("F20_2014", NoticeType::ContractAwardNoticeModification)
    }
}

/// Determines the notice type of an XML document.
#[derive(Debug, Clone, Default)]
pub struct NoticeClassifier {
    config: ClassifierConfig,
}

impl NoticeClassifier {
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a parsed document.
    #[must_use]
    pub fn classify(&self, doc: &Document<'_>) -> NoticeType {
        self.classify_root(doc.root_element())
    }

    /// Classify from the root element.
    ///
    /// A contract award notice whose `NoticeTypeCode` equals the
    /// modification code is a modification notice.
    #[must_use]
    pub fn classify_root(&self, root: Node<'_, '_>) -> NoticeType {
        match self.config.notice_type(get_tag_name(root)) {
            NoticeType::ContractAwardNotice if self.is_modification(root) => {
                NoticeType::ContractAwardNoticeModification
            }
            other => other,
        }
    }

    /// Parse and classify an XML string.
    ///
    /// # Errors
    /// Returns `XmlParse` if the text is not well-formed XML.
    pub fn classify_xml(&self, xml: &str) -> Result<NoticeType> {
        let doc = Document::parse(xml)?;
        Ok(self.classify(&doc))
    }

    /// Read, parse, and classify a notice file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read or `XmlParse` if it is not
    /// well-formed XML.
    pub fn classify_file(&self, path: &Path) -> Result<NoticeType> {
        let xml = fs::read_to_string(path)?;
        self.classify_xml(&xml)
    }

    /// Classification error for an unrecognized document.
    #[must_use]
    pub fn unrecognized(file: &str, root: Node<'_, '_>) -> ConverterError {
        ConverterError::Classification {
            file: file.to_string(),
            root: get_tag_name(root).to_string(),
        }
    }

    fn is_modification(&self, root: Node<'_, '_>) -> bool {
        find_child(root, "NoticeTypeCode")
            .is_some_and(|code| get_text(code) == self.config.modification_code)
    }
}
