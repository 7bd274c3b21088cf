use serde::{Deserialize, Serialize};

/// A person managed from the admin pages.
///
/// `deleted` is the soft-delete marker: deleted people drop out of the
/// people list but keep their row (and their contacts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub deleted: bool,
}

impl Person {
    /// Label used in pickers; soft-deleted people are marked.
    pub fn picker_label(&self) -> String {
        if self.deleted {
            format!("{} (deleted)", self.name)
        } else {
            self.name.clone()
        }
    }
}
