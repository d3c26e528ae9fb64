//! CLI configuration: thin wrapper around `netseg_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--snapshot, --max-visits, etc.).

use std::path::PathBuf;

use clap::ValueEnum;

use netseg_core::SearchLimits;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use netseg_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Fill `--output` / `--color` from `[defaults]` when not given on the
/// command line.
pub fn apply_defaults(global: &mut GlobalOpts, config: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_enum::<OutputFormat>("defaults.output", &config.defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_enum::<ColorMode>("defaults.color", &config.defaults.color)?);
    }
    Ok(())
}

fn parse_enum<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Settings needed to open a snapshot: where it lives and how far
/// searches may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSettings {
    pub path: PathBuf,
    pub limits: SearchLimits,
}

/// Translate config + global flags into `SnapshotSettings`.
///
/// CLI flag overrides take priority over profile values. An explicitly
/// requested profile must exist; the implicit default may be absent when
/// `--snapshot` is given.
pub fn resolve_snapshot(global: &GlobalOpts, config: &Config) -> Result<SnapshotSettings, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => Some(profile),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        None => None,
    };

    // 1. Snapshot path (flag > env > profile)
    let path = global
        .snapshot
        .clone()
        .or_else(|| profile.map(|p| p.snapshot.clone()))
        .ok_or_else(|| CliError::NoSnapshot {
            profile: profile_name.clone(),
            path: config_path().display().to_string(),
        })?;

    // 2. Search limits (flag > profile > defaults)
    let limits = match global.max_visits {
        Some(0) => {
            return Err(CliError::Validation {
                field: "max-visits".into(),
                reason: "must be at least 1".into(),
            });
        }
        Some(n) => SearchLimits::with_max_visits(n),
        None => config.search_limits(profile),
    };

    tracing::debug!(profile = %profile_name, path = %path.display(), ?limits, "snapshot settings resolved");
    Ok(SnapshotSettings { path, limits })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["netseg"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["segments", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        cfg.defaults.max_visits = Some(100);
        cfg.upsert_profile(
            "lab",
            Profile {
                snapshot: PathBuf::from("/data/lab.json"),
                max_visits: None,
            },
        )
        .unwrap();
        cfg.set_default_profile("lab").unwrap();
        cfg
    }

    #[test]
    fn default_profile_supplies_snapshot_and_limits() {
        let settings = resolve_snapshot(&global(&[]), &config_with_lab()).unwrap();
        assert_eq!(settings.path, PathBuf::from("/data/lab.json"));
        assert_eq!(settings.limits.max_visits, Some(100));
    }

    #[test]
    fn flags_override_profile() {
        let settings = resolve_snapshot(
            &global(&["--snapshot", "/tmp/other.yaml", "--max-visits", "7"]),
            &config_with_lab(),
        )
        .unwrap();
        assert_eq!(settings.path, PathBuf::from("/tmp/other.yaml"));
        assert_eq!(settings.limits, SearchLimits::with_max_visits(7));
    }

    #[test]
    fn explicit_missing_profile_is_an_error() {
        let err = resolve_snapshot(&global(&["--profile", "prod"]), &config_with_lab()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "lab"));
    }

    #[test]
    fn no_profile_and_no_flag_needs_a_snapshot() {
        let err = resolve_snapshot(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoSnapshot { .. }));
    }

    #[test]
    fn zero_visit_cap_is_rejected() {
        let err = resolve_snapshot(
            &global(&["--snapshot", "x.json", "--max-visits", "0"]),
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn defaults_fill_unset_output() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();
        let mut opts = global(&[]);
        apply_defaults(&mut opts, &cfg).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::JsonCompact);

        let mut opts = global(&["-o", "yaml"]);
        apply_defaults(&mut opts, &cfg).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::Yaml);
    }

    #[test]
    fn bad_default_output_is_a_validation_error() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let err = apply_defaults(&mut global(&[]), &cfg).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }
}
