use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use super::ServeArgs;
use crate::config::ServerConfig;
use crate::web::AdminServer;

/// Execute the serve command
pub fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::from_env(&args.bind, args.port, args.db)?;
    let server = AdminServer::new(&config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    ctrlc_handler(shutdown.clone());

    info!(
        address = %config.address(),
        db = %config.db_path.display(),
        calling_codes = %config.calling_codes_url,
        "starting admin server, press Ctrl+C to stop"
    );

    server.start(shutdown)
}

fn ctrlc_handler(shutdown: Arc<AtomicBool>) {
    let _ = ctrlc::set_handler(move || {
        info!("received Ctrl+C, shutting down");
        shutdown.store(true, Ordering::SeqCst);
    });
}
