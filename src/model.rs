// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Local model runtime invocation
//!
//! Each query spawns the configured command (by default `ollama run llama3`),
//! writes the whole prompt to its stdin and waits for it to exit. There is no
//! timeout and no retry: a hung model process hangs the caller.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::EngineConfig;
use crate::{FolioError, Result};

/// Anything that can answer a prompt with text
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send one prompt and return the trimmed response
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Human-readable description of the backend
    fn describe(&self) -> String;
}

/// Invoker backed by a local subprocess
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    program: String,
    args: Vec<String>,
}

impl ProcessInvoker {
    /// Create an invoker for an explicit program and arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create an invoker from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Check that the program can be started at all
    pub async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ModelInvoker for ProcessInvoker {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        debug!("Spawning model process: {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FolioError::Invocation(format!("Cannot start '{}': {}", self.program, e)))?;

        // Feed stdin while draining stdout so neither pipe can fill up and stall
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    // A process that exits without reading everything is judged by its status
                    debug!("Model process closed stdin early: {}", e);
                }
                // stdin dropped here, the model sees end of input
            }
        };

        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output = output
            .map_err(|e| FolioError::Invocation(format!("Failed waiting for '{}': {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FolioError::Invocation(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Model responded with {} bytes", response.len());
        Ok(response)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ProcessInvoker {
        ProcessInvoker::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_prompt_goes_through_stdin_and_output_is_trimmed() {
        let invoker = ProcessInvoker::new("cat", vec![]);
        let response = invoker.invoke("\n  {\"document_type\": \"memo\"}  \n").await.unwrap();
        assert_eq!(response, "{\"document_type\": \"memo\"}");
    }

    #[tokio::test]
    async fn test_large_prompt_round_trips() {
        let invoker = ProcessInvoker::new("cat", vec![]);
        let prompt = "word ".repeat(100_000);
        let response = invoker.invoke(&prompt).await.unwrap();
        assert_eq!(response, prompt.trim());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_invocation_failure() {
        let invoker = sh("echo model missing >&2; exit 3");
        match invoker.invoke("hello").await {
            Err(FolioError::Invocation(msg)) => assert!(msg.contains("model missing")),
            other => panic!("Expected invocation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_invocation_failure() {
        let invoker = ProcessInvoker::new("folio-no-such-model-binary", vec![]);
        assert!(matches!(invoker.invoke("hello").await, Err(FolioError::Invocation(_))));
        assert!(!invoker.is_available().await);
    }

    #[tokio::test]
    async fn test_process_ignoring_stdin_still_succeeds() {
        let invoker = sh("echo '{}'");
        let big_prompt = "x".repeat(1 << 20);
        assert_eq!(invoker.invoke(&big_prompt).await.unwrap(), "{}");
    }

    #[test]
    fn test_describe_and_from_config() {
        let invoker = ProcessInvoker::from_config(&EngineConfig::default());
        assert_eq!(invoker.describe(), "ollama run llama3");
        assert_eq!(ProcessInvoker::new("llm", vec![]).describe(), "llm");
    }
}
