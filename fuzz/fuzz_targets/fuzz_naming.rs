// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use folio::config::NamingConfig;
use folio::naming::generate_name;

#[derive(Arbitrary, Debug)]
struct Input {
    document_type: String,
    keywords: Vec<String>,
}

fuzz_target!(|input: Input| {
    let config = NamingConfig::default();
    let name = generate_name(&input.document_type, &input.keywords, ".txt", &config);

    let stem = name.strip_suffix(".txt").expect("extension appended");
    assert!(!stem.is_empty());
    assert!(stem.chars().count() <= config.max_name_length);
    assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
});
