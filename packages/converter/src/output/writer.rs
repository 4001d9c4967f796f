//! JSON writer for release files.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use ted_ocds_release::Release;

use crate::error::Result;

/// File stem for releases that carry neither an id nor an ocid.
const UNNAMED_RELEASE: &str = "release";

/// Pretty-printed JSON with a trailing newline.
///
/// # Errors
/// Returns `Json` if the value cannot be serialized.
pub fn generate_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// File name for a release: its id (or ocid) with path-unsafe characters
/// replaced, plus `.json`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use ted_ocds_release::Release;
/// use ted_ocds_converter::output::release_file_name;
///
/// let release = Release::from_value(json!({"id": "2024/S 012-345678"})).unwrap();
/// assert_eq!(release_file_name(&release), "2024_S_012-345678.json");
/// ```
#[must_use]
pub fn release_file_name(release: &Release) -> String {
    let stem = release.id().or_else(|| release.ocid()).unwrap_or(UNNAMED_RELEASE);
    format!("{}.json", sanitize(stem))
}

fn sanitize(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        UNNAMED_RELEASE.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Save a release to `<output_dir>/<release id>.json`.
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written, or `Json` if
/// serialization fails.
pub fn save_release(release: &Release, output_dir: &Path) -> Result<PathBuf> {
    let output_file = output_dir.join(release_file_name(release));
    write_atomic(&output_file, &generate_json(release)?)?;
    Ok(output_file)
}

/// Save releases to one file each.
///
/// Releases that would share a file name get a numeric suffix
/// (`N-1.json`, `N-1-2.json`, ...) instead of overwriting each other.
///
/// # Errors
/// See [`save_release`].
pub fn save_releases(releases: &[Release], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut taken = HashSet::new();
    let mut paths = Vec::with_capacity(releases.len());

    for release in releases {
        let name = release_file_name(release);
        let stem = name.trim_end_matches(".json").to_string();

        let mut candidate = name;
        let mut n = 2;
        while !taken.insert(candidate.clone()) {
            candidate = format!("{stem}-{n}.json");
            n += 1;
        }
        if n > 2 {
            tracing::warn!(file = %candidate, "Release file name already used, added suffix");
        }

        let output_file = output_dir.join(&candidate);
        write_atomic(&output_file, &generate_json(release)?)?;
        paths.push(output_file);
    }

    Ok(paths)
}

/// Write `content` to `path` through a temp file in the same directory,
/// then rename over the target.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}
