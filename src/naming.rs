// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Deterministic filename generation from a document type and keywords

use crate::config::NamingConfig;

/// Stem used when neither the document type nor any keyword survives cleaning
pub const UNTITLED: &str = "Untitled";

/// Build a filename from the model's document type and keywords.
///
/// The stem is made of ASCII alphanumerics joined by underscores, holds at
/// most `max_tokens` tokens and at most `max_name_length` characters. The
/// extension (leading dot included) is appended as given.
pub fn generate_name(
    document_type: &str,
    keywords: &[String],
    extension: &str,
    config: &NamingConfig,
) -> String {
    let mut words = clean_keywords(keywords, config);

    // Document type leads and is never stoplisted
    let doc_type = strip_to_alphanumeric(document_type);
    if !doc_type.is_empty() {
        words.insert(0, capitalize(&doc_type));
    }

    if words.is_empty() {
        words.push(UNTITLED.to_string());
    }

    let mut name = words
        .iter()
        .take(config.max_tokens)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("_");

    // ASCII only at this point, so byte length equals char count
    name.truncate(config.max_name_length);

    format!("{}{}", name, extension)
}

/// Strip, drop empties and stoplisted words, capitalize what is left
pub fn clean_keywords(keywords: &[String], config: &NamingConfig) -> Vec<String> {
    keywords
        .iter()
        .map(|w| strip_to_alphanumeric(w))
        .filter(|w| !w.is_empty())
        .filter(|w| !config.is_generic(w))
        .map(|w| capitalize(&w))
        .collect()
}

fn strip_to_alphanumeric(word: &str) -> String {
    word.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Uppercase the first character, leave the rest as is
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
