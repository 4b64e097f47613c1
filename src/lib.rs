// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Folio: Local AI Document Renamer & Tagger
//!
//! Two small utilities around a local language model runtime: an agent that
//! renames the documents of a folder after the model's classification, and a
//! tagger that stores a model-written description beside a text file.

pub mod agent;
pub mod analysis;
pub mod config;
pub mod error;
pub mod extractors;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod prompt;

pub use config::AppConfig;
pub use error::{FolioError, Result};
