pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA_V1: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
);

-- People; rows are soft-deleted through the deleted flag
CREATE TABLE IF NOT EXISTS people (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL COLLATE NOCASE,
    deleted INTEGER NOT NULL DEFAULT 0,
    UNIQUE (email)
);

-- Phone contacts owned by a person
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL,
    country_code TEXT NOT NULL,
    number TEXT NOT NULL,
    UNIQUE (country_code, number),
    FOREIGN KEY (person_id) REFERENCES people(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_people_deleted ON people(deleted);
CREATE INDEX IF NOT EXISTS idx_contacts_person ON contacts(person_id);
"#;
