use rusqlite::{params, Row};
use tracing::debug;

use super::{constraint_error, Database};
use crate::error::{AdminError, AdminResult};
use crate::models::Person;
use crate::store::PersonStore;
use crate::validation;

const EMAIL_TAKEN: &str = "A person with this email already exists.";

impl Database {
    fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
        Ok(Person {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            deleted: row.get::<_, i32>("deleted")? != 0,
        })
    }

    fn query_people(&self, sql: &str) -> AdminResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(sql)?;
        let people = stmt
            .query_map([], Self::row_to_person)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(people)
    }
}

impl PersonStore for Database {
    fn list_people(&self) -> AdminResult<Vec<Person>> {
        self.query_people("SELECT id, name, email, deleted FROM people WHERE deleted = 0 ORDER BY id")
    }

    fn all_people(&self) -> AdminResult<Vec<Person>> {
        self.query_people("SELECT id, name, email, deleted FROM people ORDER BY id")
    }

    fn get_person(&self, id: i64) -> AdminResult<Person> {
        let result = self.conn.query_row(
            "SELECT id, name, email, deleted FROM people WHERE id = ?",
            [id],
            Self::row_to_person,
        );

        match result {
            Ok(person) => Ok(person),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(AdminError::not_found("Person", id)),
            Err(e) => Err(e.into()),
        }
    }

    fn create_person(&self, name: &str, email: &str) -> AdminResult<Person> {
        let name = validation::validate_name(name)?;
        let email = validation::validate_email(email)?;

        self.conn
            .execute(
                "INSERT INTO people (name, email) VALUES (?, ?)",
                params![name, email],
            )
            .map_err(|e| constraint_error(e, EMAIL_TAKEN))?;

        let id = self.conn.last_insert_rowid();
        debug!(person_id = id, "person created");
        Ok(Person {
            id,
            name,
            email,
            deleted: false,
        })
    }

    fn update_person(&self, id: i64, name: &str, email: &str) -> AdminResult<Person> {
        let name = validation::validate_name(name)?;
        let email = validation::validate_email(email)?;
        let existing = self.get_person(id)?;

        self.conn
            .execute(
                "UPDATE people SET name = ?, email = ? WHERE id = ?",
                params![name, email, id],
            )
            .map_err(|e| constraint_error(e, EMAIL_TAKEN))?;

        debug!(person_id = id, "person updated");
        Ok(Person {
            id,
            name,
            email,
            deleted: existing.deleted,
        })
    }

    fn soft_delete_person(&self, id: i64) -> AdminResult<()> {
        let rows = self
            .conn
            .execute("UPDATE people SET deleted = 1 WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(AdminError::not_found("Person", id));
        }
        debug!(person_id = id, "person soft-deleted");
        Ok(())
    }

    fn purge_person(&self, id: i64) -> AdminResult<()> {
        let rows = self.conn.execute("DELETE FROM people WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(AdminError::not_found("Person", id));
        }
        debug!(person_id = id, "person purged");
        Ok(())
    }
}
