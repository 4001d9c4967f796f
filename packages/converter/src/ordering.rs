//! Deterministic processing order for staged notices.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Document;

use crate::classify::NoticeClassifier;
use crate::error::Result;
use crate::types::{file_name, NoticeFile, NoticeType};

/// Groups notices by type and fixes the order they are processed in:
/// prior information, contract, award, then modification notices, each
/// group sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct NoticeOrderer {
    classifier: NoticeClassifier,
}

impl NoticeOrderer {
    #[must_use]
    pub fn new(classifier: NoticeClassifier) -> Self {
        Self { classifier }
    }

    #[must_use]
    pub fn classifier(&self) -> &NoticeClassifier {
        &self.classifier
    }

    /// Order classified notices. Unknown notices are dropped.
    ///
    /// The result does not depend on the order of `files`.
    #[must_use]
    pub fn order(&self, files: impl IntoIterator<Item = NoticeFile>) -> Vec<NoticeFile> {
        let mut buckets: [Vec<NoticeFile>; NoticeType::ORDERED.len()] = Default::default();

        for file in files {
            match file.notice_type.rank() {
                Some(rank) => buckets[rank].push(file),
                None => {
                    tracing::debug!(file = %file.file_name(), "Dropping unknown notice from order");
                }
            }
        }

        buckets
            .into_iter()
            .flat_map(|mut bucket| {
                bucket.sort_by(|a, b| {
                    a.file_name()
                        .cmp(&b.file_name())
                        .then_with(|| a.path.cmp(&b.path))
                });
                bucket
            })
            .collect()
    }

    /// Classify staged paths and order them.
    ///
    /// Unparseable and unrecognized files are logged and excluded.
    #[must_use]
    pub fn classify_and_order(&self, paths: &[PathBuf]) -> Vec<NoticeFile> {
        let mut classified = Vec::with_capacity(paths.len());

        for path in paths {
            let name = file_name(path);
            match self.classify_path(path, &name) {
                Ok(notice_type) => classified.push(NoticeFile::new(path.clone(), notice_type)),
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping notice"),
            }
        }

        self.order(classified)
    }

    fn classify_path(&self, path: &Path, name: &str) -> Result<NoticeType> {
        let xml = fs::read_to_string(path)?;
        let doc = Document::parse(&xml)?;
        match self.classifier.classify(&doc) {
            NoticeType::Unknown => Err(NoticeClassifier::unrecognized(name, doc.root_element())),
            notice_type => Ok(notice_type),
        }
    }
}
