//! Clap derive structures for the `netseg` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netseg -- reachability analysis for network segmentation policy
#[derive(Debug, Parser)]
#[command(
    name = "netseg",
    version,
    about = "Analyze network segmentation policy from the command line",
    long_about = "Answers reachability questions over a network segmentation snapshot:\n\
        the segments, the firewall rules between them, whether traffic can flow\n\
        from one segment to another, and what breaks if a rule goes away.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "NETSEG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Snapshot file with segments and rules (overrides profile)
    #[arg(long, short = 's', env = "NETSEG_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Maximum segments expanded per search (overrides profile)
    #[arg(long, env = "NETSEG_MAX_VISITS", global = true)]
    pub max_visits: Option<usize>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "NETSEG_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Policy Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    #[value(alias = "TCP")]
    Tcp,
    #[value(alias = "UDP")]
    Udp,
    #[value(alias = "ICMP")]
    Icmp,
    #[value(alias = "ANY")]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    #[value(alias = "ALLOW")]
    Allow,
    #[value(alias = "DENY")]
    Deny,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the segment graph with merged rule edges
    #[command(alias = "topology", alias = "g")]
    Graph(GraphArgs),

    /// Check whether traffic can flow between two segments
    #[command(alias = "reach")]
    Path(PathArgs),

    /// Report what loses connectivity if a rule is removed
    Impact(ImpactArgs),

    /// Inspect network segments
    #[command(alias = "seg")]
    Segments(SegmentsArgs),

    /// Inspect firewall rules
    #[command(alias = "r")]
    Rules(RulesArgs),

    /// Find segments and rules by name
    Search(SearchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GRAPH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Only include segments of these zone types (exact match)
    #[arg(long, short = 'z', value_delimiter = ',')]
    pub zone: Vec<String>,

    /// Only include rules with these protocols (ANY rules always pass)
    #[arg(long, short = 'P', value_delimiter = ',')]
    pub protocol: Vec<ProtocolArg>,

    /// Only include rules with this action
    #[arg(long, short = 'a')]
    pub action: Option<ActionArg>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PATH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PathArgs {
    /// Source segment ID
    #[arg(value_name = "SOURCE_ID")]
    pub source: i64,

    /// Destination segment ID
    #[arg(value_name = "DEST_ID")]
    pub destination: i64,

    /// Protocol the traffic uses
    #[arg(long, short = 'P')]
    pub protocol: Option<ProtocolArg>,

    /// Destination port of the traffic
    #[arg(long)]
    pub port: Option<u16>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IMPACT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ImpactArgs {
    /// Rule ID to evaluate for removal
    #[arg(value_name = "RULE_ID")]
    pub rule_id: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEGMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SegmentsArgs {
    #[command(subcommand)]
    pub command: SegmentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SegmentsCommand {
    /// List segments
    #[command(alias = "ls")]
    List {
        /// Only include these zone types (exact match)
        #[arg(long, short = 'z', value_delimiter = ',')]
        zone: Vec<String>,
    },

    /// Get segment details
    Get {
        /// Segment ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List rules
    #[command(alias = "ls")]
    List {
        /// Only include rules with these protocols (ANY rules always pass)
        #[arg(long, short = 'P', value_delimiter = ',')]
        protocol: Vec<ProtocolArg>,

        /// Only include rules with this action
        #[arg(long, short = 'a')]
        action: Option<ActionArg>,

        /// Only include rules owned by this firewall
        #[arg(long, short = 'f', value_name = "FIREWALL_ID")]
        firewall: Option<i64>,
    },

    /// Get rule details
    Get {
        /// Rule ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,

    /// Restrict results to one kind of entity
    #[arg(long, short = 'k')]
    pub kind: Option<SearchKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    /// Match segment name or IP range
    Segment,
    /// Match rule name or description
    Rule,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with a snapshot profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Snapshot file the profile points at
        #[arg(long = "snapshot-path", value_name = "PATH")]
        snapshot_path: PathBuf,

        /// Per-profile search visit cap
        #[arg(long = "profile-max-visits", value_name = "N")]
        profile_max_visits: Option<usize>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
