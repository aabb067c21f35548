use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use rentix_shared::storage::ThemePreference;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        short = 'c',
        long = "config-dir",
        default_value = "configuration",
        help = "Folder with base.toml and the per environment settings"
    )]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Switch the session to another company
    SelectCompany { company_id: String },
    /// Show who is logged in and in which company
    Status,
    /// List the screens available to the current role
    Menu,
    /// Ask to open a screen, eg. `/app/properties`
    Go { path: String },
    /// List the active records of a resource
    List { resource: ResourceKind },
    /// List the records that were moved to the trash
    Trash { resource: ResourceKind },
    /// Bring a record back from the trash
    Restore {
        resource: ResourceKind,
        id: String,
    },
    /// Register a new company and its owner
    CreateCompany(CreateCompanyArgs),
    /// Show or change the theme preference
    Theme { theme: Option<ThemePreference> },
    /// End the session and forget everything stored for it
    Logout,
}

impl Command {
    /// Commands that work on the session stored by a previous run
    pub fn needs_stored_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Logout | Command::Theme { .. }
        )
    }
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("owner")
        .required(true)
        .args(["owner_email", "new_owner_email"]),
))]
pub struct CreateCompanyArgs {
    /// Email of the existing user who will own the company
    #[arg(long)]
    pub owner_email: Option<String>,
    /// Creates the owner with this email
    #[arg(long, requires = "new_owner_password")]
    pub new_owner_email: Option<String>,
    #[arg(long, env = "RENTIX_NEW_OWNER_PASSWORD", hide_env_values = true)]
    pub new_owner_password: Option<String>,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal_code: String,
    #[arg(long, default_value = "ES")]
    pub country: String,
    #[arg(long)]
    pub corporate_name: String,
    #[arg(long)]
    pub tax_id: String,
    #[arg(long)]
    pub accept_terms: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Properties,
    Tenants,
    Taxes,
    Companies,
}
