// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Folder renaming agent
//!
//! Every regular file directly inside the folder goes through
//! `Pending -> Loaded -> Queried -> Parsed -> Renamed`, or is skipped at one
//! of those stages. A failure only ever affects the file being processed.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis::{analyze, AnalysisOutcome};
use crate::extractors::{extension_of, ExtractorRegistry};
use crate::model::ModelInvoker;
use crate::naming::generate_name;
use crate::prompt::build_analysis_prompt;
use crate::{AppConfig, FolioError, Result};

/// Last state a file reached before being skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    Loaded,
    Queried,
    Parsed,
}

/// Why a file was left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Unsupported,
    NotRegularFile,
    Unreadable(String),
    EmptyText,
    InvocationFailed(String),
    /// Carries the raw model response
    ParseFailed(String),
    /// Carries the proposed name
    NameExists(String),
    RenameFailed(String),
}

impl SkipReason {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Unsupported | Self::NotRegularFile | Self::Unreadable(_) => Stage::Pending,
            Self::EmptyText => Stage::Loaded,
            Self::InvocationFailed(_) | Self::ParseFailed(_) => Stage::Queried,
            Self::NameExists(_) | Self::RenameFailed(_) => Stage::Parsed,
        }
    }

    /// Skips that are not worth a console line
    pub fn is_silent(&self) -> bool {
        matches!(self.stage(), Stage::Pending | Stage::Loaded)
    }
}

/// A computed rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
    pub document_type: String,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Final state of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Renamed(RenamePlan),
    /// Dry run: the rename was computed but not performed
    WouldRename(RenamePlan),
    Skipped { path: PathBuf, reason: SkipReason },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Renamed(plan) | Self::WouldRename(plan) => &plan.from,
            Self::Skipped { path, .. } => path,
        }
    }
}

/// Totals for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub renamed: usize,
    pub would_rename: usize,
    /// Reported skips (model, parse, collision and rename failures)
    pub skipped: usize,
    /// Silent skips (unsupported, unreadable or empty input)
    pub ignored: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    fn record(&mut self, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Renamed(_) => self.renamed += 1,
            FileOutcome::WouldRename(_) => self.would_rename += 1,
            FileOutcome::Skipped { reason, .. } if reason.is_silent() => self.ignored += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Sequential folder renamer
pub struct Agent {
    config: AppConfig,
    registry: ExtractorRegistry,
    invoker: Arc<dyn ModelInvoker>,
    dry_run: bool,
}

impl Agent {
    pub fn new(config: AppConfig, invoker: Arc<dyn ModelInvoker>) -> Self {
        let registry = ExtractorRegistry::new(&config.scan);
        Self {
            config,
            registry,
            invoker,
            dry_run: false,
        }
    }

    /// Compute names without touching any file
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every file of `folder`, calling `on_outcome` after each one.
    ///
    /// The listing is taken once up front, so files produced by a rename
    /// during the run are never revisited.
    pub async fn run<F>(&self, folder: &Path, mut on_outcome: F) -> Result<RunSummary>
    where
        F: FnMut(&FileOutcome),
    {
        if !folder.is_dir() {
            return Err(FolioError::InvalidInput(format!("Not a folder: {}", folder.display())));
        }

        let entries = list_entries(folder)?;
        info!("Scanning {} entries in {:?} with {}", entries.len(), folder, self.invoker.describe());

        let mut summary = RunSummary::default();
        for path in entries {
            let outcome = self.process_file(folder, &path).await;
            on_outcome(&outcome);
            summary.record(outcome);
        }

        info!(
            "Run finished: {} renamed, {} would rename, {} skipped, {} ignored",
            summary.renamed, summary.would_rename, summary.skipped, summary.ignored
        );
        Ok(summary)
    }

    /// Take one file as far through the pipeline as it goes
    pub async fn process_file(&self, folder: &Path, path: &Path) -> FileOutcome {
        let skip = |reason: SkipReason| {
            if reason.is_silent() {
                debug!("Ignoring {:?}: {:?}", path, reason);
            } else {
                warn!("Skipping {:?}: {:?}", path, reason);
            }
            FileOutcome::Skipped {
                path: path.to_path_buf(),
                reason,
            }
        };

        // Pending
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            _ => return skip(SkipReason::NotRegularFile),
        }

        let extension = match extension_of(path) {
            Some(ext) if self.config.scan.is_supported(&ext) => ext,
            _ => return skip(SkipReason::Unsupported),
        };

        let extractor = match self.registry.find_extractor(path) {
            Some(e) => e,
            None => return skip(SkipReason::Unsupported),
        };

        let text = match extractor.extract(path) {
            Ok(text) => text,
            Err(e) => return skip(SkipReason::Unreadable(e.to_string())),
        };

        // Loaded
        if text.trim().is_empty() {
            return skip(SkipReason::EmptyText);
        }

        let filename = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prompt = build_analysis_prompt(&filename, &text, self.config.scan.max_prompt_chars);

        info!("Querying model for {}", filename);
        let analysis = match analyze(self.invoker.as_ref(), &prompt).await {
            AnalysisOutcome::Success(analysis) => analysis,
            AnalysisOutcome::InvocationFailed(reason) => return skip(SkipReason::InvocationFailed(reason)),
            AnalysisOutcome::ParseFailed(raw) => return skip(SkipReason::ParseFailed(raw)),
        };

        // Parsed
        let document_type = analysis.document_type.to_lowercase();
        let new_name = generate_name(
            &document_type,
            &analysis.keywords,
            &format!(".{}", extension),
            &self.config.naming,
        );
        let target = folder.join(&new_name);

        // Checked live, earlier renames in this run count
        if target.exists() {
            return skip(SkipReason::NameExists(new_name));
        }

        let plan = RenamePlan {
            from: path.to_path_buf(),
            to: target,
            document_type,
            summary: analysis.summary,
            keywords: analysis.keywords,
        };

        if self.dry_run {
            info!("DRY RUN: Would rename {:?} to {:?}", plan.from, plan.to);
            return FileOutcome::WouldRename(plan);
        }

        match std::fs::rename(&plan.from, &plan.to) {
            Ok(()) => {
                info!("Renamed {:?} to {:?}", plan.from, plan.to);
                FileOutcome::Renamed(plan)
            }
            Err(e) => skip(SkipReason::RenameFailed(e.to_string())),
        }
    }
}

/// Direct children of a folder, sorted by name
fn list_entries(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}
