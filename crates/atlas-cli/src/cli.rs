//! Command line definitions.

use atlas_core::SearchKind;
use clap::{Args, Parser, Subcommand};

/// Atlas - universal lookup aggregation
#[derive(Parser, Debug)]
#[command(
    name = "atlas",
    version,
    about = "Look up breach records and platform profiles from one query",
    after_help = "EXAMPLES:\n  \
        atlas lookup a@b.com\n  \
        atlas lookup 1610000000 --json\n  \
        atlas lookup neo --kind username --credits 3\n  \
        atlas classify 22"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how a query would be classified
    Classify(ClassifyArgs),

    /// Run one lookup
    Lookup(LookupArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Administrator operations
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Query text
    pub text: String,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Email, username or profile id
    pub query: String,

    /// Target kind (auto, email, username, roblox-id)
    #[arg(long, short = 'k', default_value = "auto")]
    pub kind: SearchKind,

    /// Start the session with this many credits
    #[arg(long, conflicts_with = "unlimited")]
    pub credits: Option<u32>,

    /// Run without a credit limit
    #[arg(long)]
    pub unlimited: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Grant credits to an account
    AddCredits(AddCreditsArgs),
}

#[derive(Args, Debug)]
pub struct AddCreditsArgs {
    /// Account to credit
    pub email: String,

    /// Credits to add
    pub amount: u32,

    /// Act as this account instead of the configured administrator
    #[arg(long = "as", value_name = "EMAIL")]
    pub caller: Option<String>,
}
