//! Clap derive structures for the `nifictl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nifictl_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nifictl -- inspect and control Apache NiFi flows from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "nifictl",
    version,
    about = "Inspect and control Apache NiFi flows from the command line",
    long_about = "Resolve NiFi resources by id or name, start and stop process groups,\n\
        watch live status, and summarize backlog and transfer volumes.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "NIFICTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// NiFi server URL, without the API prefix (overrides profile)
    #[arg(long, env = "NIFICTL_URL", global = true)]
    pub url: Option<String>,

    /// Username for token authentication (overrides profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NIFICTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Emit log lines on stderr as JSON objects
    #[arg(long, env = "NIFICTL_LOG_JSON", global = true)]
    pub log_json: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification (https only)
    #[arg(long, short = 'k', env = "NIFICTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NIFICTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query the resource catalog
    #[command(alias = "res", alias = "r")]
    Resources(ResourcesArgs),

    /// Inspect, start, stop and watch process groups
    #[command(alias = "pg", alias = "g")]
    Groups(GroupsArgs),

    /// Inspect processors
    #[command(alias = "proc")]
    Processors(ProcessorsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resources ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List every resource, optionally restricted to one kind
    #[command(alias = "ls")]
    List {
        /// process-group, processor or other
        #[arg(long, short = 'K', value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },

    /// Resolve a resource by its component id
    Get { id: String },

    /// Resolve a resource by name (first match in listing order)
    Find {
        name: String,

        /// Restrict the match to one kind
        #[arg(long, short = 'K', value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },

    /// Resources nested under a process group
    Children { group_id: String },

    /// List process groups, tolerating an unavailable server
    Discover,
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    s.parse()
        .map_err(|_| format!("unknown kind '{s}' (expected process-group, processor or other)"))
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// Show a process group entity
    Get { id: String },

    /// Schedule every component in the group to run
    Start { id: String },

    /// Stop every component in the group
    Stop { id: String },

    /// Show one status snapshot
    Status { id: String },

    /// Stream status snapshots until interrupted
    Watch {
        id: String,

        /// Seconds between polls (1-60)
        #[arg(
            long,
            short = 'i',
            default_value_t = 5,
            value_parser = clap::value_parser!(u64).range(1..=60)
        )]
        interval: u64,

        /// Keep polling after a failed fetch instead of exiting
        #[arg(long)]
        skip_failed: bool,

        /// Stop after this many snapshots
        #[arg(long, short = 'n')]
        count: Option<usize>,
    },

    /// Summarize backlog, stalled processors and transfer volumes
    Analyze {
        /// Process group id (fetched live)
        #[arg(required_unless_present = "from_file", conflicts_with = "from_file")]
        id: Option<String>,

        /// Analyze a saved status response instead of fetching one
        #[arg(long, short = 'f')]
        from_file: Option<PathBuf>,

        /// Fail on response fields the client does not model
        #[arg(long)]
        strict: bool,
    },
}

// ── Processors ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProcessorsArgs {
    #[command(subcommand)]
    pub command: ProcessorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProcessorsCommand {
    /// Show a processor entity
    Get { id: String },

    /// Show a processor's status entry within its group's snapshot
    Status {
        group_id: String,
        processor_id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Add or replace a profile
    SetProfile {
        name: String,

        /// Server URL without the API prefix
        #[arg(long)]
        url: String,

        #[arg(long)]
        username: Option<String>,

        /// Path to a PEM CA certificate
        #[arg(long)]
        ca_cert: Option<PathBuf>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
