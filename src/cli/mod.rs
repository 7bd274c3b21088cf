use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_BIND, DEFAULT_PORT};

pub mod init;
pub mod purge;
pub mod serve;

pub use init::run_init;
pub use purge::run_purge;
pub use serve::run_serve;

#[derive(Parser)]
#[command(name = "contact-admin")]
#[command(about = "Admin pages for people and their phone contacts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the admin web server
    Serve(ServeArgs),
    /// Create the database and install the schema
    Init(InitArgs),
    /// Permanently remove a person and their contacts
    PurgePerson(PurgeArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Address to bind
    #[arg(short, long, default_value = DEFAULT_BIND)]
    pub bind: String,
    /// Database file (default: config dir/contact-admin/contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            db: None,
        }
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Database file (default: config dir/contact-admin/contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args)]
pub struct PurgeArgs {
    /// Person ID
    #[arg(long)]
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
    /// Database file (default: config dir/contact-admin/contacts.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}
