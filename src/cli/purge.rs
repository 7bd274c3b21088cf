use anyhow::Result;
use inquire::Confirm;
use tracing::info;

use crate::db::Database;
use crate::error::AdminError;
use crate::store::{ContactStore, PersonStore};

/// Execute the purge-person command
pub fn run_purge(db: &Database, id: i64, force: bool) -> Result<()> {
    let person = match db.get_person(id) {
        Ok(person) => person,
        Err(AdminError::NotFound { .. }) => {
            println!("No person found with ID: {}", id);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let contacts = db.contacts_for_person(person.id)?;
    println!(
        "{} <{}>{}",
        person.name,
        person.email,
        if person.deleted { " (deleted)" } else { "" }
    );
    for contact in &contacts {
        println!("  {}", contact.display_number());
    }

    if !force {
        let confirmed = Confirm::new(&format!("Permanently delete {}?", person.name))
            .with_default(false)
            .prompt()
            .unwrap_or(false);

        if !confirmed {
            return Ok(());
        }
    }

    db.purge_person(person.id)?;
    info!(person_id = person.id, contacts = contacts.len(), "person purged");
    println!("Deleted.");
    Ok(())
}
