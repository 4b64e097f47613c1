// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Parsing of the model's classification response

use serde_json::Value;
use thiserror::Error;

use crate::model::ModelInvoker;

/// What the model said about one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub document_type: String,
    pub summary: String,
    pub keywords: Vec<String>,
}

/// Why a response could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("field '{0}' is not a string")]
    NotAString(&'static str),

    #[error("keyword at position {0} is not a string")]
    BadKeyword(usize),
}

/// Result of one analysis round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success(Analysis),
    /// The model process could not be run or exited with an error
    InvocationFailed(String),
    /// The model answered but the text is unusable; carries the raw text
    ParseFailed(String),
}

/// Interpret raw model output.
///
/// `document_type` and `summary` default to empty strings when absent.
/// A `keywords` field that is missing or not a list becomes an empty list;
/// a list holding anything other than strings rejects the whole response.
pub fn parse_response(raw: &str) -> std::result::Result<Analysis, ParseError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ParseError::NotJson(e.to_string()))?;

    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;

    let document_type = string_field(obj, "document_type")?;
    let summary = string_field(obj, "summary")?;

    let keywords = match obj.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| item.as_str().map(String::from).ok_or(ParseError::BadKeyword(i)))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(Analysis {
        document_type,
        summary,
        keywords,
    })
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
) -> std::result::Result<String, ParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::NotAString(field)),
    }
}

/// Query the model once and classify the result
pub async fn analyze(invoker: &dyn ModelInvoker, prompt: &str) -> AnalysisOutcome {
    let raw = match invoker.invoke(prompt).await {
        Ok(raw) => raw,
        Err(e) => return AnalysisOutcome::InvocationFailed(e.to_string()),
    };

    match parse_response(&raw) {
        Ok(analysis) => AnalysisOutcome::Success(analysis),
        Err(e) => {
            tracing::debug!("Unusable model response: {}", e);
            AnalysisOutcome::ParseFailed(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FolioError, Result};
    use async_trait::async_trait;

    struct Canned(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl ModelInvoker for Canned {
        async fn invoke(&self, _prompt: &str) -> Result<String> {
            self.0
                .map(String::from)
                .map_err(|e| FolioError::Invocation(e.to_string()))
        }

        fn describe(&self) -> String {
            "canned".to_string()
        }
    }

    #[test]
    fn test_full_response() {
        let raw = r#"{"document_type": "Invoice", "summary": "Acme bill", "keywords": ["Acme", "2024"]}"#;
        let analysis = parse_response(raw).unwrap();
        assert_eq!(analysis.document_type, "Invoice");
        assert_eq!(analysis.summary, "Acme bill");
        assert_eq!(analysis.keywords, vec!["Acme", "2024"]);
    }

    #[test]
    fn test_missing_keywords_is_empty_list() {
        let analysis = parse_response(r#"{"document_type": "memo", "summary": "x"}"#).unwrap();
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_keywords_as_string_is_empty_list() {
        let analysis = parse_response(r#"{"document_type": "memo", "keywords": "a, b"}"#).unwrap();
        assert_eq!(analysis.document_type, "memo");
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let analysis = parse_response("{}").unwrap();
        assert_eq!(analysis.document_type, "");
        assert_eq!(analysis.summary, "");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(parse_response("\n  {\"document_type\": \"memo\"}\n").is_ok());
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(parse_response("Sure! Here is the JSON"), Err(ParseError::NotJson(_))));
        assert!(matches!(parse_response("```json\n{}\n```"), Err(ParseError::NotJson(_))));
        assert_eq!(parse_response("[1, 2]"), Err(ParseError::NotAnObject));
        assert_eq!(parse_response(r#"{"document_type": 3}"#), Err(ParseError::NotAString("document_type")));
        assert_eq!(parse_response(r#"{"summary": ["a"]}"#), Err(ParseError::NotAString("summary")));
        assert_eq!(parse_response(r#"{"keywords": ["a", 2]}"#), Err(ParseError::BadKeyword(1)));
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let invoker = Canned(Ok(r#"{"document_type": "memo", "summary": "", "keywords": []}"#));
        match analyze(&invoker, "prompt").await {
            AnalysisOutcome::Success(a) => assert_eq!(a.document_type, "memo"),
            other => panic!("Expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_keeps_raw_text_on_parse_failure() {
        let invoker = Canned(Ok("I think this is a memo."));
        assert_eq!(
            analyze(&invoker, "prompt").await,
            AnalysisOutcome::ParseFailed("I think this is a memo.".to_string())
        );
    }

    #[tokio::test]
    async fn test_analyze_invocation_failure() {
        let invoker = Canned(Err("ollama not found"));
        match analyze(&invoker, "prompt").await {
            AnalysisOutcome::InvocationFailed(reason) => assert!(reason.contains("ollama not found")),
            other => panic!("Expected invocation failure, got {:?}", other),
        }
    }
}
