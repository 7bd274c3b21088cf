use clap::Parser;
use contact_admin::cli::{run_init, run_purge, run_serve, Cli, Commands, ServeArgs};
use contact_admin::db::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contact_admin=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand provided - serve with defaults
            run_serve(ServeArgs::default())?;
        }
        Some(Commands::Serve(args)) => {
            run_serve(args)?;
        }
        Some(Commands::Init(args)) => {
            run_init(args.db)?;
        }
        Some(Commands::PurgePerson(args)) => {
            let db = match args.db {
                Some(path) => Database::open_at(path)?,
                None => Database::open()?,
            };
            run_purge(&db, args.id, args.force)?;
        }
    }

    Ok(())
}
