//! JSON output for releases and release packages.

mod package;
mod writer;

pub use package::{save_package, Publisher, ReleasePackage};
pub use writer::{generate_json, release_file_name, save_release, save_releases};
