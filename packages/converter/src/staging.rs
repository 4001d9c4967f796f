//! Staging of input notices into a scoped working directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::NOTICE_FILE_EXTENSION;
use crate::error::{ConverterError, Result};

/// Scoped working directory holding copies of the input notices.
///
/// The directory and every staged copy are removed when the stager is
/// dropped, whether conversion succeeded or not.
#[derive(Debug)]
pub struct NoticeStager {
    dir: TempDir,
    staged: Vec<PathBuf>,
}

impl NoticeStager {
    /// Create an empty working directory.
    ///
    /// # Errors
    /// Returns `Io` if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("ted-ocds-").tempdir()?;
        tracing::debug!(dir = %dir.path().display(), "Created staging directory");
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    /// Path of the working directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy a notice file, or every `*.xml` file directly inside a
    /// directory, into the working directory.
    ///
    /// Returns the staged paths in directory order.
    ///
    /// # Errors
    /// - `Input` if `input` is neither a file nor a directory, or a
    ///   directory holds no notice files
    /// - `Io` if copying fails
    pub fn stage(&mut self, input: &Path) -> Result<Vec<PathBuf>> {
        let sources = if input.is_file() {
            vec![input.to_path_buf()]
        } else if input.is_dir() {
            let sources = notice_files(input)?;
            if sources.is_empty() {
                return Err(ConverterError::input(
                    input,
                    format!("directory contains no .{NOTICE_FILE_EXTENSION} notices"),
                ));
            }
            sources
        } else {
            return Err(ConverterError::input(input, "not a file or directory"));
        };

        let mut staged = Vec::with_capacity(sources.len());
        for source in sources {
            let Some(name) = source.file_name() else {
                continue;
            };
            let target = self.dir.path().join(name);
            fs::copy(&source, &target)?;
            staged.push(target);
        }

        tracing::debug!(count = staged.len(), input = %input.display(), "Staged notices");
        self.staged.extend(staged.iter().cloned());
        Ok(staged)
    }

    /// All paths staged so far.
    #[must_use]
    pub fn staged(&self) -> &[PathBuf] {
        &self.staged
    }
}

/// Regular files with the notice extension (any case) directly in `dir`.
fn notice_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_notice = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTICE_FILE_EXTENSION));
        if is_notice && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
