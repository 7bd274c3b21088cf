use rusqlite::{params, Row};
use tracing::debug;

use super::{constraint_error, Database};
use crate::error::{AdminError, AdminResult};
use crate::models::Contact;
use crate::store::{ContactStore, PersonStore};
use crate::validation;

const PAIR_TAKEN: &str = "A contact with this country code and number already exists.";

impl Database {
    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get("id")?,
            person_id: row.get("person_id")?,
            country_code: row.get("country_code")?,
            number: row.get("number")?,
        })
    }

    /// Validate the editable contact fields and the owning person.
    fn checked_contact_fields(
        &self,
        person_id: i64,
        country_code: &str,
        number: &str,
    ) -> AdminResult<(String, String)> {
        let number = validation::validate_number(number)?;
        let country_code = validation::validate_country_code(country_code)?;

        match self.get_person(person_id) {
            Ok(_) => Ok((country_code, number)),
            Err(AdminError::NotFound { .. }) => Err(AdminError::Validation(format!(
                "Person {} does not exist.",
                person_id
            ))),
            Err(e) => Err(e),
        }
    }
}

impl ContactStore for Database {
    fn contacts_for_person(&self, person_id: i64) -> AdminResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, person_id, country_code, number FROM contacts WHERE person_id = ? ORDER BY id",
        )?;

        let contacts = stmt
            .query_map([person_id], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    fn get_contact(&self, id: i64) -> AdminResult<Contact> {
        let result = self.conn.query_row(
            "SELECT id, person_id, country_code, number FROM contacts WHERE id = ?",
            [id],
            Self::row_to_contact,
        );

        match result {
            Ok(contact) => Ok(contact),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(AdminError::not_found("Contact", id)),
            Err(e) => Err(e.into()),
        }
    }

    fn create_contact(
        &self,
        person_id: i64,
        country_code: &str,
        number: &str,
    ) -> AdminResult<Contact> {
        let (country_code, number) = self.checked_contact_fields(person_id, country_code, number)?;

        self.conn
            .execute(
                "INSERT INTO contacts (person_id, country_code, number) VALUES (?, ?, ?)",
                params![person_id, country_code, number],
            )
            .map_err(|e| constraint_error(e, PAIR_TAKEN))?;

        let id = self.conn.last_insert_rowid();
        debug!(contact_id = id, person_id, "contact created");
        Ok(Contact {
            id,
            person_id,
            country_code,
            number,
        })
    }

    fn update_contact(
        &self,
        id: i64,
        person_id: i64,
        country_code: &str,
        number: &str,
    ) -> AdminResult<Contact> {
        let (country_code, number) = self.checked_contact_fields(person_id, country_code, number)?;
        self.get_contact(id)?;

        self.conn
            .execute(
                "UPDATE contacts SET person_id = ?, country_code = ?, number = ? WHERE id = ?",
                params![person_id, country_code, number, id],
            )
            .map_err(|e| constraint_error(e, PAIR_TAKEN))?;

        debug!(contact_id = id, person_id, "contact updated");
        Ok(Contact {
            id,
            person_id,
            country_code,
            number,
        })
    }

    fn delete_contact(&self, id: i64) -> AdminResult<()> {
        let rows = self.conn.execute("DELETE FROM contacts WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(AdminError::not_found("Contact", id));
        }
        debug!(contact_id = id, "contact deleted");
        Ok(())
    }
}
