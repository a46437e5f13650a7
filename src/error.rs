use thiserror::Error;

/// User-friendly error presentation for the terminal.
#[derive(Debug, Clone)]
pub struct ErrorPresentation {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Network ───────────────────────────────────────────────────────────────
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    // ── Upstream ──────────────────────────────────────────────────────────────
    #[error("HTTP {status} - {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Malformed response body: {0}")]
    ParseFailed(String),

    // ── File / CSV ────────────────────────────────────────────────────────────
    #[error("CSV write error: {0}")]
    CsvWrite(String),

    // ── Configuration ─────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of the request itself (connection, timeout, status),
    /// as opposed to failures decoding a response that did arrive.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::ConnectionFailed(_) | AppError::Timeout { .. } | AppError::HttpStatus { .. }
        )
    }

    /// Converts the error into a presentation suitable for printing on exit.
    pub fn to_presentation(&self) -> ErrorPresentation {
        match self {
            // ── Network ───────────────────────────────────────────────────────
            AppError::ConnectionFailed(_) => ErrorPresentation {
                title: "Connection Failed".into(),
                message: "Could not reach the ratings API. Please check your internet connection.".into(),
                action: Some("Check network and retry".into()),
            },

            AppError::Timeout { secs } => ErrorPresentation {
                title: "Request Timed Out".into(),
                message: format!("The ratings API did not answer within {} seconds.", secs),
                action: Some("Retry later or raise --timeout-secs".into()),
            },

            // ── Upstream ──────────────────────────────────────────────────────
            AppError::HttpStatus { status, reason } => ErrorPresentation {
                title: "Upstream Error".into(),
                message: format!("The ratings API answered with HTTP {} ({}).", status, reason),
                action: if *status == 429 || *status >= 500 {
                    Some("Wait and retry".into())
                } else {
                    None
                },
            },

            AppError::ParseFailed(msg) => ErrorPresentation {
                title: "Unexpected Response".into(),
                message: format!("The ratings API returned data that could not be read: {}", msg),
                action: None,
            },

            // ── File / CSV ────────────────────────────────────────────────────
            AppError::CsvWrite(msg) => ErrorPresentation {
                title: "Could Not Write CSV".into(),
                message: format!("Writing the output file failed: {}", msg),
                action: Some("Check the output path and free disk space".into()),
            },

            // ── Configuration ─────────────────────────────────────────────────
            AppError::InvalidConfig(msg) => ErrorPresentation {
                title: "Invalid Configuration".into(),
                message: msg.clone(),
                action: Some("Run with --help to see valid options".into()),
            },

            // ── Generic ───────────────────────────────────────────────────────
            AppError::Internal(_) => ErrorPresentation {
                title: "Unexpected Error".into(),
                message: "Something went wrong. Please try again.".into(),
                action: Some("Try again".into()),
            },
        }
    }
}

impl std::fmt::Display for ErrorPresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " ({})", action)?;
        }
        Ok(())
    }
}
