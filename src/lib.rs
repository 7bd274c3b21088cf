pub mod calling_codes;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;
pub mod web;

pub use db::Database;
pub use error::{AdminError, AdminResult};
