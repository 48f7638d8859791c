//! Locating the optional scan configuration file

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::HookEnv;

/// Probe candidate directories in order and search each recursively for
/// `file_name`. The first hit wins; entries are visited in file-name order.
pub fn find_config_file(env: &HookEnv, candidates: &[String], file_name: &str) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|dir| env.resolve(dir))
        .filter(|dir| dir.is_dir())
        .find_map(|dir| search(&dir, file_name))
}

fn search(root: &Path, file_name: &str) -> Option<PathBuf> {
    let target = OsStr::new(file_name);
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == target)
        .map(|entry| entry.into_path())
}
