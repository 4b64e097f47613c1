// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Folio: Local AI Document Renamer & Tagger
//!
//! Renames the documents of a folder after a local model's classification,
//! and stores model-written descriptions beside text files.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use folio::agent::{Agent, FileOutcome, RunSummary, SkipReason};
use folio::config::AppConfig;
use folio::extractors::ExtractorRegistry;
use folio::metadata::{self, StorageMethod, StoreResult};
use folio::model::{ModelInvoker, ProcessInvoker};
use folio::{FolioError, Result};

const RULE: &str = "============================================================";

/// Folio CLI - Local AI Document Renamer & Tagger
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Local AI-powered document renamer and metadata tagger", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "folio.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rename the documents of a folder from their content
    Rename {
        /// Folder to scan (prompted for when omitted)
        dir: Option<PathBuf>,

        /// Dry run mode (show new names without renaming)
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate and store a description for a text file
    Describe {
        /// Text file to describe
        file: PathBuf,

        /// Where to store the description
        #[arg(short, long, value_enum, default_value_t = StorageMethod::Both)]
        method: StorageMethod,
    },

    /// Show the description saved for a text file
    Show {
        /// Text file to inspect
        file: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show model runtime status
    Status,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "folio.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Rename { dir, dry_run }) => {
            run_rename(config, dir, dry_run, &cli.format, cli.quiet).await
        }
        Some(Commands::Describe { file, method }) => {
            run_describe(config, file, method, &cli.format).await
        }
        Some(Commands::Show { file }) => {
            run_show(config, file, &cli.format)
        }
        Some(Commands::Config { action }) => {
            run_config_command(config, action, &cli.config)
        }
        Some(Commands::Status) => {
            run_status(config).await
        }
        None => {
            // Default: interactive rename
            run_rename(config, None, false, &cli.format, cli.quiet).await
        }
    }
}

/// Run the renaming agent over one folder
async fn run_rename(
    config: AppConfig,
    dir: Option<PathBuf>,
    dry_run: bool,
    format: &str,
    quiet: bool,
) -> Result<()> {
    let folder = match dir {
        Some(d) => d,
        None => prompt_folder()?,
    };

    if !folder.is_dir() {
        return Err(FolioError::InvalidInput(format!("Invalid folder: {}", folder.display())));
    }

    if dry_run {
        warn!("DRY RUN MODE - files will not be renamed");
    }

    let invoker = Arc::new(ProcessInvoker::from_config(&config.engine));
    let agent = Agent::new(config, invoker).with_dry_run(dry_run);

    if format == "text" && !quiet {
        println!("\nAgent running on {}...\n", folder.display());
    }

    let summary = agent
        .run(&folder, |outcome| match format {
            "jsonl" => match serde_json::to_string(outcome) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to serialize outcome: {}", e),
            },
            "json" => {}
            _ => {
                let block = render_outcome(outcome);
                if !block.is_empty() {
                    println!("{}", block);
                }
            }
        })
        .await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "jsonl" => {}
        _ => println!("\n{}", summary_line(&summary)),
    }

    Ok(())
}

fn prompt_folder() -> Result<PathBuf> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Enter path to folder")
        .interact_text()
        .map_err(|e| FolioError::InvalidInput(format!("Failed to read folder path: {}", e)))?;
    Ok(PathBuf::from(input.trim()))
}

/// Console block for one file; empty for silent skips
fn render_outcome(outcome: &FileOutcome) -> String {
    let name = outcome.path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines: Vec<String> = Vec::new();
    match outcome {
        FileOutcome::Skipped { reason, .. } if reason.is_silent() => {}
        FileOutcome::Renamed(plan) | FileOutcome::WouldRename(plan) => {
            let new_name = plan.to.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let verb = if matches!(outcome, FileOutcome::Renamed(_)) { "RENAMED" } else { "WOULD RENAME" };
            lines.push(RULE.to_string());
            lines.push(format!("FILE: {}", name));
            lines.push(format!("TYPE: {}", plan.document_type));
            lines.push(format!("KEYWORDS: {:?}", plan.keywords));
            lines.push(format!("{} → {}", verb, new_name));
        }
        FileOutcome::Skipped { reason, .. } => {
            lines.push(RULE.to_string());
            lines.push(format!("FILE: {}", name));
            match reason {
                SkipReason::NameExists(new_name) => lines.push(format!("Name exists, skipped → {}", new_name)),
                SkipReason::InvocationFailed(detail) | SkipReason::ParseFailed(detail) => {
                    lines.push("AI failure, skipped".to_string());
                    lines.push(detail.clone());
                }
                SkipReason::RenameFailed(why) => lines.push(format!("Rename failed, skipped: {}", why)),
                other => lines.push(format!("Skipped: {:?}", other)),
            }
        }
    }

    lines.join("\n")
}

fn summary_line(summary: &RunSummary) -> String {
    if summary.would_rename > 0 {
        format!(
            "Agent finished (dry run): {} would be renamed, {} skipped, {} ignored",
            summary.would_rename, summary.skipped, summary.ignored
        )
    } else {
        format!(
            "Agent finished: {} renamed, {} skipped, {} ignored",
            summary.renamed, summary.skipped, summary.ignored
        )
    }
}

/// Describe a text file and store the description
async fn run_describe(
    config: AppConfig,
    file: PathBuf,
    method: StorageMethod,
    format: &str,
) -> Result<()> {
    metadata::ensure_text_file(&file)?;

    let facts = metadata::collect_facts(&file, config.tagging.preview_chars)?;
    if format == "text" {
        println!("{}", RULE);
        println!("FILE METADATA:");
        println!("{}", RULE);
        println!("FILENAME: {}", facts.filename);
        println!("FULL_PATH: {}", facts.full_path);
        println!("SIZE_BYTES: {}", facts.size_bytes);
        println!("SIZE_KB: {}", facts.size_kb);
        println!("CREATED: {}", facts.created);
        println!("MODIFIED: {}", facts.modified);
        println!("{}", RULE);
    }

    let invoker = ProcessInvoker::from_config(&config.engine);
    info!("Generating description with {}", invoker.describe());
    let description = metadata::describe(&invoker, &facts).await?;

    let results = metadata::save_description(&file, &description, &facts, method, &config.tagging);

    if format == "text" {
        println!("\nGENERATED DESCRIPTION:");
        println!("{}", RULE);
        println!("{}", description);
        println!("{}\n", RULE);
        for result in &results {
            match result {
                StoreResult::Stream(Ok(p)) => println!("Metadata written to stream: {}", p.display()),
                StoreResult::Stream(Err(e)) => println!("Could not write to stream: {}", e),
                StoreResult::Sidecar(Ok(p)) => println!("Metadata saved to: {}", p.display()),
                StoreResult::Sidecar(Err(e)) => println!("Could not write sidecar file: {}", e),
            }
        }
    } else {
        let targets: Vec<serde_json::Value> = results.iter().map(store_result_json).collect();
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "description": description,
            "targets": targets,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn store_result_json(result: &StoreResult) -> serde_json::Value {
    let (target, outcome) = match result {
        StoreResult::Stream(r) => ("stream", r),
        StoreResult::Sidecar(r) => ("sidecar", r),
    };
    match outcome {
        Ok(p) => serde_json::json!({ "target": target, "path": p.to_string_lossy() }),
        Err(e) => serde_json::json!({ "target": target, "error": e.to_string() }),
    }
}

/// Print whatever metadata was saved for a file
fn run_show(config: AppConfig, file: PathBuf, format: &str) -> Result<()> {
    metadata::ensure_text_file(&file)?;
    let saved = metadata::load_saved(&file, &config.tagging);

    if format != "text" {
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "stream": saved.stream,
            "sidecar": saved.sidecar,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(ref description) = saved.stream {
        println!("{}", RULE);
        println!("METADATA FROM STREAM:");
        println!("{}", RULE);
        println!("{}", description);
        println!("{}", RULE);
    }

    if let Some(ref record) = saved.sidecar {
        println!("\n{}", RULE);
        println!("METADATA FROM SIDECAR FILE:");
        println!("{}", RULE);
        println!("{}", serde_json::to_string_pretty(record)?);
        println!("{}", RULE);
    }

    if saved.is_empty() {
        println!("No saved metadata found for this file.");
    }

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output, force } => {
            if output.exists() && !force {
                return Err(FolioError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    output.display()
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            // Loading already validated it
            println!("Configuration at {:?} is valid", config_path);
            println!("  Model command: {} {}", config.engine.command, config.engine.args.join(" "));
            println!("  Extensions: {:?}", config.scan.supported_extensions);
            println!("  Max name length: {}", config.naming.max_name_length);
        }
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig) -> Result<()> {
    let invoker = ProcessInvoker::from_config(&config.engine);

    println!("Folio v{} Status", env!("CARGO_PKG_VERSION"));
    println!("======================");

    let command = invoker.describe();
    if invoker.is_available().await {
        println!("Model command: {} (available)", command);
    } else {
        println!("Model command: {} (not found or not runnable)", command);
    }

    println!("\nConfiguration:");
    println!("  Extensions: {:?}", config.scan.supported_extensions);
    println!("  Extractors: {}", ExtractorRegistry::new(&config.scan).extractor_names().join(", "));
    println!("  Prompt excerpt: {} chars", config.scan.max_prompt_chars);
    println!("  Name limit: {} chars, {} words", config.naming.max_name_length, config.naming.max_tokens);
    println!("  Stream name: {}", config.tagging.stream_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::agent::RenamePlan;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["folio"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("folio.json"));
    }

    #[test]
    fn test_cli_rename_command() {
        let cli = Cli::try_parse_from(["folio", "rename", "/tmp/docs", "--dry-run"]).unwrap();

        match cli.command {
            Some(Commands::Rename { dir, dry_run }) => {
                assert!(dry_run);
                assert_eq!(dir, Some(PathBuf::from("/tmp/docs")));
            }
            _ => panic!("Expected Rename command"),
        }
    }

    #[test]
    fn test_cli_describe_defaults_to_both() {
        let cli = Cli::try_parse_from(["folio", "describe", "notes.txt"]).unwrap();

        match cli.command {
            Some(Commands::Describe { file, method }) => {
                assert_eq!(file, PathBuf::from("notes.txt"));
                assert_eq!(method, StorageMethod::Both);
            }
            _ => panic!("Expected Describe command"),
        }
    }

    #[test]
    fn test_cli_describe_method() {
        let cli = Cli::try_parse_from(["folio", "describe", "n.txt", "--method", "sidecar"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Describe { method: StorageMethod::Sidecar, .. })
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["folio", "--format", "xml", "status"]).is_err());
    }

    #[test]
    fn test_summary_line() {
        let mut summary = RunSummary::default();
        summary.renamed = 2;
        summary.skipped = 1;
        summary.ignored = 4;
        assert_eq!(summary_line(&summary), "Agent finished: 2 renamed, 1 skipped, 4 ignored");

        summary.renamed = 0;
        summary.would_rename = 3;
        assert!(summary_line(&summary).contains("dry run"));
    }

    #[test]
    fn test_store_result_json() {
        let ok = StoreResult::Sidecar(Ok(PathBuf::from("a.meta.json")));
        assert_eq!(store_result_json(&ok)["target"], "sidecar");
        let err = StoreResult::Stream(Err(FolioError::StreamUnsupported));
        assert!(store_result_json(&err)["error"].is_string());
    }

    #[test]
    fn test_render_outcome_blocks() {
        let plan = RenamePlan {
            from: PathBuf::from("/d/a.txt"),
            to: PathBuf::from("/d/Memo_Budget.txt"),
            document_type: "memo".to_string(),
            summary: String::new(),
            keywords: vec!["budget".to_string()],
        };

        let renamed = render_outcome(&FileOutcome::Renamed(plan.clone()));
        let lines: Vec<&str> = renamed.lines().collect();
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "FILE: a.txt");
        assert_eq!(lines[2], "TYPE: memo");
        assert_eq!(lines[3], "KEYWORDS: [\"budget\"]");
        assert_eq!(lines[4], "RENAMED → Memo_Budget.txt");

        let dry = render_outcome(&FileOutcome::WouldRename(plan));
        assert!(dry.ends_with("WOULD RENAME → Memo_Budget.txt"));

        let exists = render_outcome(&FileOutcome::Skipped {
            path: PathBuf::from("/d/b.txt"),
            reason: SkipReason::NameExists("Memo_Budget.txt".to_string()),
        });
        assert!(exists.contains("FILE: b.txt"));
        assert!(exists.ends_with("Name exists, skipped → Memo_Budget.txt"));

        let failed = render_outcome(&FileOutcome::Skipped {
            path: PathBuf::from("/d/c.txt"),
            reason: SkipReason::ParseFailed("not json".to_string()),
        });
        assert!(failed.ends_with("AI failure, skipped\nnot json"));
    }

    #[test]
    fn test_render_outcome_silent_skip_is_empty() {
        let block = render_outcome(&FileOutcome::Skipped {
            path: PathBuf::from("/d/photo.jpg"),
            reason: SkipReason::Unsupported,
        });
        assert!(block.is_empty());
    }
}
