//! Clap derive structures for the `visonic` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Only
//! depends on `clap`, `clap_complete` and `humantime` so `build.rs` can
//! include it for man page generation.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// visonic -- monitor and arm Visonic alarm panels
#[derive(Debug, Parser)]
#[command(
    name = "visonic",
    version,
    about = "Monitor and control Visonic alarm panels from the command line",
    long_about = "Talks to the Visonic cloud REST API (version 4.0) used by the\n\
        Visonic GO app: panel state, zone devices, event log, arm and disarm.",
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
    /// Panel profile to use
    #[arg(long, short = 'p', env = "VISONIC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server hostname or URL (overrides profile)
    #[arg(long, env = "VISONIC_HOST", global = true)]
    pub host: Option<String>,

    /// Installation UUID sent at login (overrides profile)
    #[arg(long, env = "VISONIC_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Panel id (overrides profile)
    #[arg(long, env = "VISONIC_PANEL_ID", global = true)]
    pub panel_id: Option<String>,

    /// Partition selector for commands (overrides profile)
    #[arg(long, env = "VISONIC_PARTITION", global = true)]
    pub partition: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VISONIC_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "VISONIC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VISONIC_TIMEOUT", global = true)]
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
    /// Show panel identity and alarm state
    #[command(alias = "st")]
    Status,

    /// List zone devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List contact and motion sensors with their derived state
    Sensors,

    /// Show the panel event log
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Arm the panel
    Arm(ArmArgs),

    /// Disarm the panel
    Disarm(DisarmArgs),

    /// Raw panel endpoints (alarms, alerts, troubles, ...)
    Panel(PanelArgs),

    /// Set the panel clock to local time (master users only)
    SetTime,

    /// Poll the panel and print state changes until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Include bypass, soak and alarm counters
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Only the most recent event, decoded
    #[arg(long)]
    pub last: bool,

    /// Hours added to event timestamps (overrides profile)
    #[arg(long, allow_hyphen_values = true)]
    pub hour_offset: Option<i32>,
}

// ── Arm / Disarm ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ArmArgs {
    #[arg(value_enum)]
    pub mode: ArmTarget,

    /// Use the instant (no entry delay) variant
    #[arg(long, short = 'i')]
    pub instant: bool,

    /// Panel user code (prompted for when omitted)
    #[arg(long, short = 'c', env = "VISONIC_CODE", hide_env_values = true)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArmTarget {
    /// Arm home (perimeter only)
    Home,
    /// Arm away (all zones)
    Away,
}

#[derive(Debug, Args)]
pub struct DisarmArgs {
    /// Panel user code (prompted for when omitted)
    #[arg(long, short = 'c', env = "VISONIC_CODE", hide_env_values = true)]
    pub code: Option<String>,
}

// ── Panel ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PanelArgs {
    #[command(subcommand)]
    pub command: PanelCommand,
}

#[derive(Debug, Subcommand)]
pub enum PanelCommand {
    /// Active alarms
    Alarms,
    /// Active alerts
    Alerts,
    /// Active troubles
    Troubles,
    /// Configured locations
    Locations,
    /// Users currently active on the panel
    Users,
    /// Wake-up SMS settings
    WakeupSms,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval, e.g. "10s" or "1m" (defaults to the refresh interval)
    #[arg(long, short = 'n', value_parser = parse_duration)]
    pub interval: Option<Duration>,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the user code for a profile in the system keyring
    SetCode,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
