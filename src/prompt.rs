// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Prompt templates sent to the local model

/// Render the classification prompt for the renaming agent.
///
/// Only the first `max_chars` characters of `content` are embedded.
pub fn build_analysis_prompt(filename: &str, content: &str, max_chars: usize) -> String {
    let excerpt = truncate_chars(content, max_chars);

    format!(
        r#"
You are a strict document analyst AI.

Return ONLY valid JSON.
No markdown. No explanation.

Return format:
{{
  "document_type": "",
  "summary": "",
  "keywords": []
}}

Filename: {filename}

Content:
"""
{excerpt}
"""
"#
    )
}

/// Render the description prompt for the metadata tagger
pub fn build_description_prompt(filename: &str, preview: &str) -> String {
    format!(
        r#"
Analyze this text file and provide a concise description (2-3 sentences max):

Filename: {filename}
Content Preview:
"""
{preview}
"""

Provide ONLY a brief description of what this file contains. No analysis, no recommendations - just describe the content.
"#
    )
}

/// First `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
