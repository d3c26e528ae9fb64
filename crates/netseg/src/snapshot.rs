//! Snapshot file loading.
//!
//! A snapshot file holds the `segments` and `rules` lists the analyzer
//! runs against. The format is chosen by file extension.

use std::path::Path;

use netseg_core::{Analyzer, MemoryStore, SegmentId, Snapshot};

use crate::config::SnapshotSettings;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
    Toml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(CliError::Snapshot {
                path: path.display().to_string(),
                reason: "unrecognized extension (expected .json, .yaml, .yml or .toml)".into(),
            }),
        }
    }
}

/// Parse snapshot text in the given format.
pub fn parse(text: &str, format: SnapshotFormat) -> Result<Snapshot, String> {
    match format {
        SnapshotFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        SnapshotFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        SnapshotFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Read and parse the snapshot file at `path`.
pub async fn load(path: &Path) -> Result<Snapshot, CliError> {
    let format = SnapshotFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::Snapshot {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    let snapshot = parse(&text, format).map_err(|reason| CliError::Snapshot {
        path: path.display().to_string(),
        reason,
    })?;
    report_integrity(&snapshot);
    tracing::info!(
        path = %path.display(),
        segments = snapshot.segments().len(),
        rules = snapshot.rules().len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Open the configured snapshot behind an `Analyzer`.
pub async fn open(settings: &SnapshotSettings) -> Result<Analyzer<MemoryStore>, CliError> {
    let snapshot = load(&settings.path).await?;
    Ok(Analyzer::new(MemoryStore::new(snapshot)).with_limits(settings.limits))
}

/// Log rules whose endpoints are missing from the snapshot.
fn report_integrity(snapshot: &Snapshot) {
    let known = |id: SegmentId| snapshot.segment(id).is_some();
    for rule in snapshot.rules() {
        for id in [rule.source_segment_id, rule.destination_segment_id] {
            if !known(id) {
                tracing::warn!(
                    rule_id = %rule.id,
                    segment_id = %id,
                    "rule references a segment that is not in the snapshot"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use netseg_core::{Protocol, RuleId};

    use super::*;

    const YAML: &str = r"
segments:
  - id: 1
    name: Internet
    ip_range: 0.0.0.0/0
    zone_type: External
    color: '#FF6B6B'
  - id: 2
    name: DMZ
    ip_range: 10.1.0.0/24
    zone_type: DMZ
    color: '#4ECDC4'
rules:
  - id: 10
    firewall_id: 1
    rule_name: web-in
    source_segment_id: 1
    destination_segment_id: 2
    protocol: tcp
    port_range: '443'
    action: ALLOW
";

    const TOML: &str = r##"
[[segments]]
id = 1
name = "Internet"
ip_range = "0.0.0.0/0"
zone_type = "External"
color = "#FF6B6B"

[[rules]]
id = 4
firewall_id = 1
rule_name = "ping"
source_segment_id = 1
destination_segment_id = 1
protocol = "ICMP"
action = "DENY"
"##;

    #[test]
    fn format_follows_extension() {
        let fmt = |p: &str| SnapshotFormat::from_path(&PathBuf::from(p));
        assert_eq!(fmt("a/policy.json").unwrap(), SnapshotFormat::Json);
        assert_eq!(fmt("policy.YML").unwrap(), SnapshotFormat::Yaml);
        assert_eq!(fmt("policy.toml").unwrap(), SnapshotFormat::Toml);
        assert!(fmt("policy.csv").is_err());
        assert!(fmt("policy").is_err());
    }

    #[test]
    fn yaml_snapshot_parses() {
        let snap = parse(YAML, SnapshotFormat::Yaml).unwrap();
        assert_eq!(snap.segments().len(), 2);
        let rule = snap.rule(RuleId(10)).unwrap();
        assert_eq!(rule.protocol, Protocol::Tcp);
        assert_eq!(rule.port_range.as_deref(), Some("443"));
        assert!(snap.segments()[0].description.is_none());
    }

    #[test]
    fn toml_snapshot_parses() {
        let snap = parse(TOML, SnapshotFormat::Toml).unwrap();
        assert_eq!(snap.rules().len(), 1);
        assert!(snap.rules()[0].port_range.is_none());
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let bad = YAML.replace("protocol: tcp", "protocol: sctp");
        let err = parse(&bad, SnapshotFormat::Yaml).unwrap_err();
        assert!(err.contains("sctp"), "{err}");
    }

    #[tokio::test]
    async fn missing_file_is_a_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("gone.json")).await.unwrap_err();
        assert!(matches!(err, CliError::Snapshot { .. }));
    }
}
