// Cache path utilities.
// Maps cache keys to files under the per-user cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "ghloc")
}

/// Get the base cache directory (~/.cache/ghloc on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the configuration directory (~/.config/ghloc on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory holding one file per LOC cache entry.
pub fn entries_dir(base: &Path) -> PathBuf {
    base.join("locs")
}

/// File for a single cache entry.
pub fn entry_path(base: &Path, key: &str) -> PathBuf {
    entries_dir(base).join(format!("{}.json", encode_key(key)))
}

/// Log file used while the terminal UI owns the screen.
pub fn log_path(base: &Path) -> PathBuf {
    base.join("ghloc.log")
}

/// Encode a key as a single file name.
/// Bytes outside `[A-Za-z0-9._-]` become `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
