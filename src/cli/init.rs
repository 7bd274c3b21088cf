use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::db::Database;

/// Execute the init command
pub fn run_init(db_path: Option<PathBuf>) -> Result<()> {
    let path = match db_path {
        Some(path) => path,
        None => Database::default_path()?,
    };

    let db = Database::open_at(path.clone())?;
    info!(path = %path.display(), version = db.schema_version()?, "database ready");
    println!("Database ready at {}", path.display());
    Ok(())
}
