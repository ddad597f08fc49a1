use thiserror::Error;

use crate::validate::Violation;

/// Every way a generation request can fail.
///
/// All variants are terminal for the request: nothing is retried and no
/// partial archive is ever returned.
#[derive(Debug, Error)]
pub enum GeneratorError {
    // ── Input ───────────────────────────────────────────────────────
    /// The payload is not valid JSON or does not match either request shape.
    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The blueprint parsed but breaks one or more structural invariants.
    #[error("Malformed blueprint: {}", format_violations(.violations))]
    MalformedBlueprint { violations: Vec<Violation> },

    // ── Templates ───────────────────────────────────────────────────
    /// No candidate location holds the template.
    #[error("Template not found in any of: {}", .attempted.join(", "))]
    TemplateNotFound {
        template: String,
        attempted: Vec<String>,
    },

    /// The engine could not render the template against its view.
    #[error("Template render failed for \"{template}\". Error: {message}. View keys: [{}]", .view_keys.join(", "))]
    RenderFailure {
        template: String,
        message: String,
        view_keys: Vec<String>,
    },

    // ── Infrastructure ──────────────────────────────────────────────
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl GeneratorError {
    /// Caller mistakes map to 400; everything else is a server-side failure.
    pub fn status_code(&self) -> u16 {
        match self {
            GeneratorError::InvalidPayload(_) | GeneratorError::MalformedBlueprint { .. } => 400,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("[{}] {}", v.code, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
