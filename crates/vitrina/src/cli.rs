//! Clap derive structures for the `vitrina` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vitrina -- browse and manage live-commerce shops and streams
#[derive(Debug, Parser)]
#[command(
    name = "vitrina",
    version,
    about = "Browse live-commerce shops, streams and reels from the command line",
    long_about = "A CLI for the Vitrina live-commerce marketplace.\n\n\
        Browse shops and live streams anonymously, manage favorites and\n\
        reminders as a client, schedule streams as a shop, and moderate\n\
        the catalog as an administrator.",
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
    #[arg(long, short = 'p', env = "VITRINA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Marketplace API URL (overrides profile)
    #[arg(long, env = "VITRINA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VITRINA_OUTPUT",
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

    /// Browse without signing in, even if the profile has credentials
    #[arg(long, global = true)]
    pub anonymous: bool,

    /// Disable placeholder streams and reels
    #[arg(long, global = true)]
    pub no_mock: bool,

    /// Request timeout in seconds
    #[arg(long, env = "VITRINA_TIMEOUT", global = true)]
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
    /// Browse shops
    #[command(alias = "tiendas")]
    Shops(ShopsArgs),

    /// Browse live streams
    #[command(alias = "vivos")]
    Streams(StreamsArgs),

    /// Browse reels from the last 24 hours
    Reels(ReelsArgs),

    /// Toggle a favorite shop
    Favorites(ToggleArgs),

    /// Toggle a stream reminder
    Reminders(ToggleArgs),

    /// Toggle a stream like
    Likes(ToggleArgs),

    /// Report a stream for moderation
    Report {
        /// Stream ID
        stream: String,

        /// Reason for the report
        #[arg(long, short = 'r')]
        reason: String,
    },

    /// Read and acknowledge notifications
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// Shop owner operations
    #[command(alias = "tienda")]
    Merchant(MerchantArgs),

    /// Administrator operations
    Admin(AdminArgs),

    /// Sign-in, registration and password reset
    Auth(AuthArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shops ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShopsArgs {
    #[command(subcommand)]
    pub command: ShopsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShopsCommand {
    /// List public shops, best placed first
    #[command(alias = "ls")]
    List {
        /// Include non-public shops (admin view)
        #[arg(long)]
        all: bool,

        /// Filter by name, legal name or address
        #[arg(long, short = 'Q')]
        query: Option<String>,
    },

    /// Show one shop and its streams
    Get {
        /// Shop ID
        shop: String,
    },
}

// ── Streams ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StreamsArgs {
    #[command(subcommand)]
    pub command: StreamsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StreamFilterArg {
    Todos,
    EnVivo,
    Proximos,
    Finalizados,
}

#[derive(Debug, Subcommand)]
pub enum StreamsCommand {
    /// List streams for a filter
    #[command(alias = "ls")]
    List {
        #[arg(long, short = 'f', default_value = "todos")]
        filter: StreamFilterArg,

        /// Only streams of this shop
        #[arg(long)]
        shop: Option<String>,
    },

    /// Show one stream
    Get {
        /// Stream ID
        stream: String,
    },

    /// Export a calendar invite (.ics)
    Ics {
        /// Stream ID
        stream: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ── Reels ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReelsArgs {
    #[command(subcommand)]
    pub command: ReelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReelsCommand {
    /// List active reels, newest first
    #[command(alias = "ls")]
    List,

    /// Mark a reel as viewed
    View {
        /// Reel ID
        reel: String,
    },
}

// ── Toggles ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ToggleArgs {
    #[command(subcommand)]
    pub command: ToggleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ToggleCommand {
    /// Add if absent, remove if present
    Toggle {
        /// Shop or stream ID
        id: String,
    },

    /// List the current selection
    #[command(alias = "ls")]
    List,
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications, newest first
    #[command(alias = "ls")]
    List,

    /// Mark one notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every notification as read
    ReadAll,
}

// ── Merchant ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MerchantArgs {
    /// Act on this shop (admins only; merchants always act on their own)
    #[arg(long, global = true)]
    pub shop: Option<String>,

    #[command(subcommand)]
    pub command: MerchantCommand,
}

#[derive(Debug, Args)]
pub struct StreamFields {
    /// Stream title
    #[arg(long)]
    pub title: String,

    /// Platform (Instagram, TikTok, YouTube...)
    #[arg(long)]
    pub platform: String,

    /// Stream URL
    #[arg(long)]
    pub url: String,

    /// Start time, RFC 3339 (e.g. 2026-10-20T18:00:00-03:00)
    #[arg(long)]
    pub at: String,
}

#[derive(Debug, Subcommand)]
pub enum MerchantCommand {
    /// Schedule a new stream
    CreateStream(StreamFields),

    /// Edit a scheduled stream
    UpdateStream {
        /// Stream ID
        stream: String,

        #[command(flatten)]
        fields: StreamFields,
    },

    /// Cancel a scheduled stream
    CancelStream {
        /// Stream ID
        stream: String,
    },

    /// Extend a live stream
    ExtendStream {
        /// Stream ID
        stream: String,
    },

    /// Buy extra stream quota
    BuyQuota {
        /// Number of extra streams
        amount: u32,
    },

    /// Publish a reel
    CreateReel {
        /// Reel URL
        url: String,
    },

    /// Edit shop profile fields
    UpdateShop {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        logo_url: Option<String>,
    },
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShopStatusArg {
    Active,
    Pending,
    Suspended,
    Hidden,
    Banned,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Change a shop's status
    ShopStatus {
        /// Shop ID
        shop: String,

        status: ShopStatusArg,
    },

    /// Ban a stream
    BanStream {
        /// Stream ID
        stream: String,
    },

    /// List stream reports
    Reports,

    /// Mark a report as resolved
    ResolveReport {
        /// Report ID
        report: String,
    },

    /// Set a new password for a shop account
    ResetShopPassword {
        /// Shop ID
        shop: String,
    },

    /// Link a shop to an owner account
    AssignOwner {
        /// Shop ID
        shop: String,

        /// Owner email
        email: String,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AudienceArg {
    Shop,
    Client,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and show the resulting session
    Login {
        #[arg(long, default_value = "client")]
        audience: AudienceArg,

        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Create a client account
    Register {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Email a password reset link
    ResetRequest {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Set a new password using the code from the reset email
    ResetConfirm {
        /// The `oobCode` from the reset link
        #[arg(long)]
        code: String,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
