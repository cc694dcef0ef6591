use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body produced by the backend framework: `{"detail": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
    Other(Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ValidationIssue {
    fn location(&self) -> String {
        self.loc
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl BackendErrorBody {
    pub fn summary(&self) -> String {
        match &self.detail {
            ErrorDetail::Message(message) => message.clone(),
            ErrorDetail::Validation(issues) => issues
                .iter()
                .map(|issue| {
                    let location = issue.location();
                    if location.is_empty() {
                        issue.msg.clone()
                    } else {
                        format!("{location}: {}", issue.msg)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Other(value) => value.to_string(),
        }
    }
}

const MAX_RAW_DETAIL_LEN: usize = 200;

/// Best-effort description of an error response body for diagnostics.
pub fn describe_error_body(raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<BackendErrorBody>(raw) {
        return body.summary();
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() > MAX_RAW_DETAIL_LEN {
        let cut: String = trimmed.chars().take(MAX_RAW_DETAIL_LEN).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
