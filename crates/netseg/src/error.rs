//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use netseg_config::ConfigError;
use netseg_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const DATA: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netseg::not_found),
        help("Run: netseg {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Snapshot data ────────────────────────────────────────────────
    #[error("No snapshot file configured")]
    #[diagnostic(
        code(netseg::no_snapshot),
        help(
            "Pass --snapshot <FILE>, set NETSEG_SNAPSHOT, or create a profile with:\n\
             netseg config init --snapshot-path <FILE>\n\
             Profile '{profile}' was looked up in: {path}"
        )
    )]
    NoSnapshot { profile: String, path: String },

    #[error("Could not load snapshot {path}: {reason}")]
    #[diagnostic(
        code(netseg::snapshot),
        help("Snapshot files hold `segments` and `rules` lists as JSON, YAML or TOML.")
    )]
    Snapshot { path: String, reason: String },

    #[error("Rule {rule_id} has malformed port range token '{token}': {reason}")]
    #[diagnostic(
        code(netseg::invalid_port_range),
        help("Fix the port_range of rule {rule_id}. Use single ports and low-high ranges separated by commas, e.g. \"80,443,8000-9000\".")
    )]
    InvalidPortRange {
        rule_id: i64,
        token: String,
        reason: String,
    },

    // ── Search budget ────────────────────────────────────────────────
    #[error("Search stopped after visiting {limit} segments")]
    #[diagnostic(
        code(netseg::search_truncated),
        help("Raise the cap with --max-visits or the max_visits profile setting.")
    )]
    SearchTruncated { limit: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netseg::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netseg::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netseg config init --name {name} --snapshot-path <FILE>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(netseg::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(netseg::config_write))]
    ConfigWrite(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(netseg::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(netseg::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    #[diagnostic(code(netseg::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoSnapshot { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            Self::Snapshot { .. } | Self::InvalidPortRange { .. } => exit_code::DATA,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SegmentNotFound { id } => CliError::NotFound {
                resource_type: "segment".into(),
                identifier: id.to_string(),
                list_command: "segments list".into(),
            },

            CoreError::RuleNotFound { id } => CliError::NotFound {
                resource_type: "rule".into(),
                identifier: id.to_string(),
                list_command: "rules list".into(),
            },

            CoreError::InvalidPortRange {
                rule_id,
                token,
                reason,
            } => CliError::InvalidPortRange {
                rule_id: rule_id.get(),
                token,
                reason,
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::SearchTruncated { limit } => CliError::SearchTruncated { limit },

            CoreError::Snapshot { message } => CliError::Snapshot {
                path: "(source)".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(see: netseg config profiles)".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoSnapshot { profile } => CliError::Validation {
                field: format!("profiles.{profile}.snapshot"),
                reason: "snapshot path must not be empty".into(),
            },
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use netseg_core::{RuleId, SegmentId};

    use super::*;

    #[test]
    fn not_found_errors_exit_with_four() {
        let seg: CliError = CoreError::SegmentNotFound { id: SegmentId(7) }.into();
        let rule: CliError = CoreError::RuleNotFound { id: RuleId(9) }.into();
        assert_eq!(seg.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(rule.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(rule.to_string(), "rule '9' not found");
    }

    #[test]
    fn malformed_ports_are_data_errors() {
        let err: CliError = CoreError::InvalidPortRange {
            rule_id: RuleId(3),
            token: "80-".into(),
            reason: "missing range end".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::DATA);
        assert!(err.to_string().contains("'80-'"));
    }

    #[test]
    fn validation_is_a_usage_error() {
        let err: CliError = CoreError::Validation {
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(
            CliError::SearchTruncated { limit: 5 }.exit_code(),
            exit_code::GENERAL
        );
    }
}
