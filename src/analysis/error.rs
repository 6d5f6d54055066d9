use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest slice of a provider body kept in an error message.
const BODY_PREVIEW_CHARS: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisErrorKind {
    NoCredential,
    Encoding,
    Transport,
    Remote,
    EmptyResponse,
    MalformedOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
    pub body: Option<String>,
}

impl AnalysisError {
    pub fn new(kind: AnalysisErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            body: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (status={})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AnalysisError {}

pub fn no_credential(message: impl Into<String>) -> AnalysisError {
    AnalysisError::new(AnalysisErrorKind::NoCredential, message)
}

pub fn encoding_error(message: impl Into<String>) -> AnalysisError {
    AnalysisError::new(AnalysisErrorKind::Encoding, message)
}

pub fn transport_error(message: impl Into<String>) -> AnalysisError {
    AnalysisError::new(AnalysisErrorKind::Transport, message)
}

pub fn empty_response() -> AnalysisError {
    AnalysisError::new(
        AnalysisErrorKind::EmptyResponse,
        "provider returned no alternatives",
    )
}

pub fn malformed_output(message: impl Into<String>) -> AnalysisError {
    AnalysisError::new(AnalysisErrorKind::MalformedOutput, message)
}

pub fn remote_error(status: u16, body: &str) -> AnalysisError {
    let preview = body.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
    let mut message = format!("provider returned status {}", status);
    if !preview.is_empty() {
        message = format!("{}: {}", message, preview);
    }

    AnalysisError::new(AnalysisErrorKind::Remote, message)
        .with_http_status(status)
        .with_body(body)
}
