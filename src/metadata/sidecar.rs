// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! JSON sidecar files (`<stem>.meta.json`)

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{FileFacts, TIMESTAMP_FORMAT};
use crate::Result;

/// Contents of a sidecar file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarRecord {
    pub original_file: String,
    pub description: String,
    pub analyzed_date: String,
    pub file_metadata: FileFacts,
}

impl SidecarRecord {
    /// Record stamped with the current local time
    pub fn new(facts: &FileFacts, description: &str) -> Self {
        Self {
            original_file: facts.filename.clone(),
            description: description.to_string(),
            analyzed_date: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            file_metadata: facts.clone(),
        }
    }
}

/// `dir/name.txt` -> `dir/name.meta.json`
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

pub fn write_sidecar(path: &Path, record: &SidecarRecord) -> Result<PathBuf> {
    let target = sidecar_path(path);
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&target, json)?;
    Ok(target)
}

/// `Ok(None)` when no sidecar exists
pub fn read_sidecar(path: &Path) -> Result<Option<SidecarRecord>> {
    let content = match std::fs::read_to_string(sidecar_path(path)) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}
