// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Model-written descriptions stored beside text files

pub mod sidecar;
pub mod stream;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

use crate::config::TaggingConfig;
use crate::extractors::text::read_preview;
use crate::model::ModelInvoker;
use crate::prompt::build_description_prompt;
use crate::{FolioError, Result};

pub use sidecar::SidecarRecord;

/// Timestamp layout used in facts and sidecars
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filesystem facts about a file plus a content preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFacts {
    pub filename: String,
    pub full_path: String,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub created: String,
    pub modified: String,
    pub preview: String,
}

/// Where a description gets written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageMethod {
    /// Hidden alternate data stream on the file itself
    Stream,
    /// Visible `<stem>.meta.json` companion file
    Sidecar,
    #[default]
    Both,
}

impl StorageMethod {
    pub fn includes_stream(self) -> bool {
        matches!(self, Self::Stream | Self::Both)
    }

    pub fn includes_sidecar(self) -> bool {
        matches!(self, Self::Sidecar | Self::Both)
    }
}

/// Result of writing to one storage target
#[derive(Debug)]
pub enum StoreResult {
    Stream(Result<PathBuf>),
    Sidecar(Result<PathBuf>),
}

/// Everything previously saved for a file
#[derive(Debug, Default)]
pub struct SavedMetadata {
    pub stream: Option<String>,
    pub sidecar: Option<SidecarRecord>,
}

impl SavedMetadata {
    pub fn is_empty(&self) -> bool {
        self.stream.is_none() && self.sidecar.is_none()
    }
}

/// Make sure the tagger is pointed at an existing `.txt` file
pub fn ensure_text_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(FolioError::InvalidInput(format!("File not found: {}", path.display())));
    }
    let is_txt = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);
    if !is_txt {
        return Err(FolioError::UnsupportedFileType(format!(
            "{} (please provide a .txt file)",
            path.display()
        )));
    }
    Ok(())
}

/// Gather size, timestamps and a preview of the first `preview_chars` characters
pub fn collect_facts(path: &Path, preview_chars: usize) -> Result<FileFacts> {
    let meta = std::fs::metadata(path)?;

    let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
    // Not every filesystem records a creation time
    let created = meta.created().unwrap_or(modified);

    let preview = match read_preview(path, preview_chars) {
        Ok(p) => p,
        Err(e) => {
            warn!("Could not read content of {:?}: {}", path, e);
            "Could not read content".to_string()
        }
    };

    let size_bytes = meta.len();
    Ok(FileFacts {
        filename: path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        full_path: path.to_string_lossy().into_owned(),
        size_bytes,
        size_kb: (size_bytes as f64 / 1024.0 * 100.0).round() / 100.0,
        created: format_time(created),
        modified: format_time(modified),
        preview,
    })
}

/// Local-time rendering shared by facts and sidecars
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIMESTAMP_FORMAT).to_string()
}

/// Ask the model for a short description of the file
pub async fn describe(invoker: &dyn ModelInvoker, facts: &FileFacts) -> Result<String> {
    let prompt = build_description_prompt(&facts.filename, &facts.preview);
    info!("Generating description for {}", facts.filename);

    let description = invoker.invoke(&prompt).await?;
    if description.is_empty() {
        return Err(FolioError::Invocation("model returned an empty description".to_string()));
    }
    Ok(description)
}

/// Write the description to every selected target; each target succeeds or fails on its own
pub fn save_description(
    path: &Path,
    description: &str,
    facts: &FileFacts,
    method: StorageMethod,
    config: &TaggingConfig,
) -> Vec<StoreResult> {
    let mut results = Vec::new();

    if method.includes_stream() {
        let result = stream::write_stream(path, &config.stream_name, description);
        match &result {
            Ok(p) => info!("Description written to stream {:?}", p),
            Err(e) => warn!("Could not write to stream: {}", e),
        }
        results.push(StoreResult::Stream(result));
    }

    if method.includes_sidecar() {
        let record = SidecarRecord::new(facts, description);
        let result = sidecar::write_sidecar(path, &record);
        match &result {
            Ok(p) => info!("Description saved to {:?}", p),
            Err(e) => warn!("Could not write sidecar file: {}", e),
        }
        results.push(StoreResult::Sidecar(result));
    }

    results
}

/// Read back whatever was saved; unreadable targets count as absent
pub fn load_saved(path: &Path, config: &TaggingConfig) -> SavedMetadata {
    let stream = match stream::read_stream(path, &config.stream_name) {
        Ok(s) => s,
        Err(FolioError::StreamUnsupported) => None,
        Err(e) => {
            warn!("Could not read stream: {}", e);
            None
        }
    };

    let sidecar = match sidecar::read_sidecar(path) {
        Ok(s) => s,
        Err(e) => {
            warn!("Could not read sidecar file: {}", e);
            None
        }
    };

    SavedMetadata { stream, sidecar }
}
