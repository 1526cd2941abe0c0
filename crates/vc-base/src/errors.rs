//! Error types and the view-scoped error reporter.

use chrono::{DateTime, Local};
use serde_json::Value;
use thiserror::Error;

use crate::config::constants::MAX_ERROR_REPORTS;
use crate::types::ErrorPayload;

/// Failure talking to the branch/file data service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("max retries exceeded")]
    RetriesExhausted,
}

/// One call to [`ErrorReporter::show_error`].
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub uuid: &'static str,
    pub errors: ErrorPayload,
    pub response: Value,
    pub at: DateTime<Local>,
}

impl ErrorReport {
    pub fn summary(&self) -> String {
        match self.errors.message() {
            Some(m) => m.to_string(),
            None => self.errors.0.to_string(),
        }
    }
}

/// Collects reports for one view. Reporting never alters fetch or selection state.
#[derive(Debug)]
pub struct ErrorReporter {
    uuid: &'static str,
    reports: Vec<ErrorReport>,
    dismissed: bool,
}

impl ErrorReporter {
    pub fn new(uuid: &'static str) -> Self {
        Self { uuid, reports: Vec::new(), dismissed: false }
    }

    /// Record an application error together with the full response it came in.
    pub fn show_error(&mut self, errors: ErrorPayload, response: Value) {
        tracing::warn!(view = self.uuid, errors = %errors.0, "error reported");
        if self.reports.len() >= MAX_ERROR_REPORTS {
            self.reports.remove(0);
        }
        self.reports.push(ErrorReport { uuid: self.uuid, errors, response, at: Local::now() });
        self.dismissed = false;
    }

    /// Report a failed request. There is no response body, so `response` is null.
    pub fn report_failure(&mut self, context: &str, err: &ApiError) {
        let payload = ErrorPayload(serde_json::json!({
            "message": format!("{}: {}", context, err),
        }));
        self.show_error(payload, Value::Null);
    }

    /// Latest report unless the user dismissed it.
    pub fn visible(&self) -> Option<&ErrorReport> {
        if self.dismissed { None } else { self.reports.last() }
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn reports(&self) -> &[ErrorReport] {
        &self.reports
    }
}
