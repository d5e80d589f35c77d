//! Input Discovery Module
//! Locates the CSV to load when none is given explicitly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File the dashboards looked for by default.
pub const DEFAULT_DATA_FILE: &str = "한국부동산 가격 데이터.csv";

/// Explicit path if given; else `dir/default_name` when it exists; else the
/// first `*.csv` in `dir` by file name.
pub fn resolve_source(explicit: Option<&Path>, dir: &Path, default_name: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let default_path = dir.join(default_name);
    if default_path.is_file() {
        return Some(default_path);
    }

    list_directory(dir)
        .ok()?
        .into_iter()
        .find(|name| name.to_lowercase().ends_with(".csv"))
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
}

/// Sorted entry names of `dir`, shown when loading fails.
pub fn list_directory(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
