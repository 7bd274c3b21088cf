mod calling_code;
mod contact;
mod person;

pub use calling_code::{normalize_calling_code, CallingCode};
pub use contact::Contact;
pub use person::Person;
