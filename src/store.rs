//! Store interfaces the admin controller works against.
//!
//! `Database` implements both; tests and alternative backends can provide
//! their own.

use crate::error::AdminResult;
use crate::models::{Contact, Person};

pub trait PersonStore {
    /// People not soft-deleted, in insertion order.
    fn list_people(&self) -> AdminResult<Vec<Person>>;

    /// Every person row, soft-deleted ones included, in insertion order.
    fn all_people(&self) -> AdminResult<Vec<Person>>;

    fn get_person(&self, id: i64) -> AdminResult<Person>;

    fn create_person(&self, name: &str, email: &str) -> AdminResult<Person>;

    fn update_person(&self, id: i64, name: &str, email: &str) -> AdminResult<Person>;

    /// Mark a person deleted. Deleting an already deleted person succeeds.
    fn soft_delete_person(&self, id: i64) -> AdminResult<()>;

    /// Remove the row outright; the person's contacts go with it.
    fn purge_person(&self, id: i64) -> AdminResult<()>;
}

pub trait ContactStore {
    fn contacts_for_person(&self, person_id: i64) -> AdminResult<Vec<Contact>>;

    fn get_contact(&self, id: i64) -> AdminResult<Contact>;

    fn create_contact(&self, person_id: i64, country_code: &str, number: &str)
        -> AdminResult<Contact>;

    fn update_contact(
        &self,
        id: i64,
        person_id: i64,
        country_code: &str,
        number: &str,
    ) -> AdminResult<Contact>;

    fn delete_contact(&self, id: i64) -> AdminResult<()>;
}
