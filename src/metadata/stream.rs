// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! NTFS alternate data streams (`file.txt:description.txt`)
//!
//! Only Windows resolves the `path:stream` syntax; elsewhere the same path
//! would silently create a new regular file, so writes and reads are refused.

use std::path::{Path, PathBuf};

use crate::Result;

/// Path naming the stream `stream_name` attached to `path`
pub fn stream_path(path: &Path, stream_name: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(":");
    raw.push(stream_name);
    PathBuf::from(raw)
}

#[cfg(windows)]
pub fn write_stream(path: &Path, stream_name: &str, description: &str) -> Result<PathBuf> {
    let target = stream_path(path, stream_name);
    std::fs::write(&target, description)?;
    Ok(target)
}

#[cfg(windows)]
pub fn read_stream(path: &Path, stream_name: &str) -> Result<Option<String>> {
    match std::fs::read(stream_path(path, stream_name)) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(windows))]
pub fn write_stream(_path: &Path, _stream_name: &str, _description: &str) -> Result<PathBuf> {
    Err(crate::FolioError::StreamUnsupported)
}

#[cfg(not(windows))]
pub fn read_stream(_path: &Path, _stream_name: &str) -> Result<Option<String>> {
    Err(crate::FolioError::StreamUnsupported)
}
