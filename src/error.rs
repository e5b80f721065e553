//! Configuration and engine error types.

use thiserror::Error;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"utility.residential_customers"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the validated projection entry points.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
}

impl EngineError {
    /// Individual field violations behind this error.
    pub fn problems(&self) -> &[ConfigError] {
        match self {
            Self::InvalidConfig(errors) => errors,
        }
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("utility.system_peak_mw", "must be > 0");
        assert_eq!(
            e.to_string(),
            "config error: utility.system_peak_mw: must be > 0"
        );
    }

    #[test]
    fn invalid_config_lists_every_problem() {
        let err = EngineError::InvalidConfig(vec![
            ConfigError::new("a", "bad"),
            ConfigError::new("b", "worse"),
        ]);
        let s = err.to_string();
        assert!(s.contains("a: bad"));
        assert!(s.contains("b: worse"));
        assert_eq!(err.problems().len(), 2);
    }
}
