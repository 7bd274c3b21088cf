use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub person_id: i64,
    pub country_code: String,
    pub number: String,
}

impl Contact {
    /// Dialable form, e.g. `+1 555123456`.
    pub fn display_number(&self) -> String {
        format!("{} {}", self.country_code, self.number)
    }
}
