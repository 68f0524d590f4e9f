//! Clap derive structures for the `wt` CLI.
//!
//! Defines the complete command tree, global flags, and shared enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wt -- Whooktown CLI
#[derive(Debug, Parser)]
#[command(
    name = "wt",
    version,
    about = "Whooktown CLI - Control your 3D IT city",
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
    /// Increase log verbosity (-v, -vv, -vvv); must precede the subcommand
    // Root-level rather than global: `layout list` has its own -v.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ── Shared enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns with colorized badges
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetailFormat {
    /// Labelled key/value sections
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SensorStatus {
    Online,
    Offline,
    Warning,
    Critical,
}

impl SensorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaceValue {
    Slow,
    Normal,
    Fast,
}

impl PaceValue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Login with a sensor token
    Login(LoginArgs),

    /// Clear the saved token
    Logout,

    /// Manage sensors
    Sensor(SensorArgs),

    /// Control traffic
    Traffic(TrafficArgs),

    /// Manage layouts (read-only)
    Layout(LayoutArgs),

    /// Manage popups and building metadata
    Popup(PopupArgs),

    /// Launch the interactive TUI dashboard
    Tui(TuiArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Sensor token to authenticate with
    pub token: String,

    /// Skip token validation
    #[arg(long)]
    pub no_validate: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SENSOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SensorArgs {
    #[command(subcommand)]
    pub command: SensorCommand,
}

#[derive(Debug, Subcommand)]
pub enum SensorCommand {
    /// Send sensor data
    Send {
        /// Sensor ID (UUID)
        id: String,

        /// Sensor name (for display)
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Status: online, offline, warning, critical
        #[arg(long, short = 's', value_enum, ignore_case = true)]
        status: Option<SensorStatus>,

        /// Activity: slow, normal, fast
        #[arg(long, short = 'a', value_enum, ignore_case = true)]
        activity: Option<PaceValue>,

        /// Additional JSON fields (e.g., '{"cpuUsage": 75}')
        #[arg(long, short = 'j')]
        json: Option<String>,

        /// Suppress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List sensor states
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TRAFFIC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TrafficArgs {
    #[command(subcommand)]
    pub command: TrafficCommand,
}

#[derive(Debug, Subcommand)]
pub enum TrafficCommand {
    /// Set traffic state for a layout
    Set {
        /// Layout ID
        layout_id: String,

        /// Traffic density (0-100)
        #[arg(long, short = 'd', value_parser = clap::value_parser!(u8).range(0..=100))]
        density: Option<u8>,

        /// Traffic speed: slow, normal, fast
        #[arg(long, short = 's', value_enum, ignore_case = true)]
        speed: Option<PaceValue>,

        /// Enable traffic
        #[arg(long, conflicts_with = "disabled")]
        enabled: bool,

        /// Disable traffic
        #[arg(long)]
        disabled: bool,
    },

    /// List traffic states
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LAYOUT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[command(subcommand)]
    pub command: LayoutCommand,
}

#[derive(Debug, Subcommand)]
pub enum LayoutCommand {
    /// List layouts
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: OutputFormat,

        /// Show building details
        #[arg(long, short = 'v')]
        verbose: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POPUP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PopupArgs {
    #[command(subcommand)]
    pub command: PopupCommand,
}

#[derive(Debug, Subcommand)]
pub enum PopupCommand {
    /// Toggle building labels on/off
    Labels {
        /// Layout ID
        layout_id: String,

        /// Enable labels
        #[arg(long, conflicts_with = "off")]
        on: bool,

        /// Disable labels
        #[arg(long)]
        off: bool,
    },

    /// Set building description/tags/notes
    Set {
        /// Building ID (UUID)
        building_id: String,

        /// Set description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Set comma-separated tags
        #[arg(long, short = 't')]
        tags: Option<String>,

        /// Set notes
        #[arg(long, short = 'n')]
        notes: Option<String>,

        /// Clear description
        #[arg(long)]
        clear_description: bool,

        /// Clear tags
        #[arg(long)]
        clear_tags: bool,

        /// Clear notes
        #[arg(long)]
        clear_notes: bool,
    },

    /// Get building metadata
    Get {
        /// Building ID (UUID)
        building_id: String,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "text")]
        format: DetailFormat,
    },

    /// List buildings with metadata
    #[command(alias = "ls")]
    List {
        /// Layout ID
        layout_id: String,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value = "table")]
        format: OutputFormat,

        /// Filter by tags (comma-separated, any match)
        #[arg(long)]
        tags: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TUI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// Auto-refresh interval in milliseconds (minimum 1000)
    #[arg(long, short = 'r', default_value = "5000")]
    pub refresh: u64,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn sensor_status_is_case_insensitive() {
        let cli = Cli::parse_from(["wt", "sensor", "send", "s1", "--status", "ONLINE"]);
        let Command::Sensor(args) = cli.command else {
            panic!("expected sensor command");
        };
        let SensorCommand::Send { status, .. } = args.command else {
            panic!("expected send subcommand");
        };
        assert_eq!(status.map(SensorStatus::as_str), Some("online"));
    }

    #[test]
    fn bogus_sensor_status_is_rejected() {
        let result = Cli::try_parse_from(["wt", "sensor", "send", "s1", "--status", "bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn traffic_density_is_bounds_checked() {
        assert!(Cli::try_parse_from(["wt", "traffic", "set", "l1", "-d", "101"]).is_err());
        assert!(Cli::try_parse_from(["wt", "traffic", "set", "l1", "-d", "100"]).is_ok());
    }

    #[test]
    fn popup_labels_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["wt", "popup", "labels", "l1", "--on", "--off"]).is_err());
    }
}
