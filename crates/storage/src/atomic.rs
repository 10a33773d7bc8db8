// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file replacement.

use std::fs;
use std::path::Path;

/// Write `bytes` to `path` via a same-directory temp file and rename.
///
/// Rename within one directory is atomic on POSIX filesystems, so a
/// concurrent reader sees either the old entry or the new one, never a
/// partial write.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Sibling temp path for an entry: `<name>.tmp` in the same directory.
pub(crate) fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// True when a directory entry name is a leftover temp file.
pub(crate) fn is_tmp_name(name: &str) -> bool {
    name.ends_with(".tmp")
}
