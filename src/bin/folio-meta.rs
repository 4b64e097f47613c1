// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Folio Metadata Manager
//!
//! Interactive front end for describing a text file and reading back the
//! descriptions saved beside it.

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};

use folio::config::AppConfig;
use folio::metadata::{self, StorageMethod, StoreResult};
use folio::model::ProcessInvoker;

const RULE: &str = "============================================================";

#[derive(Parser, Debug)]
#[command(name = "folio-meta")]
#[command(version)]
#[command(about = "Add or view AI-generated descriptions for text files")]
struct Args {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "folio.json")]
    config: PathBuf,

    /// Text file to work on (prompted for when omitted)
    file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    println!("{}", RULE);
    println!("  TXT FILE METADATA MANAGER");
    println!("{}", RULE);

    let choice = Select::new()
        .with_prompt("What do you want to do?")
        .items(&["Analyze and add description to file", "View saved metadata"])
        .default(0)
        .interact()
        .context("Failed to read menu choice")?;

    let file = match args.file {
        Some(f) => f,
        None => {
            let input: String = Input::new()
                .with_prompt("Enter path to .txt file")
                .interact_text()
                .context("Failed to read file path")?;
            PathBuf::from(input.trim())
        }
    };

    metadata::ensure_text_file(&file)?;

    match choice {
        0 => {
            let method = choose_method()?;
            analyze_and_save(&config, &file, method).await?;
            println!("\nProcess complete!");
        }
        _ => view_saved(&config, &file)?,
    }

    Ok(())
}

fn choose_method() -> Result<StorageMethod> {
    let methods = [StorageMethod::Stream, StorageMethod::Sidecar, StorageMethod::Both];
    let index = Select::new()
        .with_prompt("Metadata storage method")
        .items(&[
            "Alternate data stream (Windows, hidden)",
            "Sidecar JSON file (visible .meta.json file)",
            "Both",
        ])
        .default(2)
        .interact()
        .context("Failed to read storage method")?;
    Ok(methods[index])
}

async fn analyze_and_save(config: &AppConfig, file: &Path, method: StorageMethod) -> Result<()> {
    println!("\nExtracting file information...\n");
    let facts = metadata::collect_facts(file, config.tagging.preview_chars)?;

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

    println!("\nGenerating description...\n");
    let invoker = ProcessInvoker::from_config(&config.engine);
    let description = metadata::describe(&invoker, &facts)
        .await
        .context("Model did not produce a description")?;

    println!("{}", RULE);
    println!("GENERATED DESCRIPTION:");
    println!("{}", RULE);
    println!("{}", description);
    println!("{}", RULE);

    println!("\nSaving metadata...\n");
    for result in metadata::save_description(file, &description, &facts, method, &config.tagging) {
        match result {
            StoreResult::Stream(Ok(p)) => println!("Metadata written to stream: {}", p.display()),
            StoreResult::Stream(Err(e)) => println!("Could not write to stream: {}", e),
            StoreResult::Sidecar(Ok(p)) => println!("Metadata saved to: {}", p.display()),
            StoreResult::Sidecar(Err(e)) => println!("Could not write sidecar file: {}", e),
        }
    }

    Ok(())
}

fn view_saved(config: &AppConfig, file: &Path) -> Result<()> {
    println!("\nChecking for saved metadata...\n");
    let saved = metadata::load_saved(file, &config.tagging);

    if let Some(description) = &saved.stream {
        println!("{}", RULE);
        println!("METADATA FROM STREAM:");
        println!("{}", RULE);
        println!("{}", description);
        println!("{}", RULE);
    }

    if let Some(record) = &saved.sidecar {
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
