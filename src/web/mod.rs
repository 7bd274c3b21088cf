//! Admin web interface: request context, page controller, HTML rendering,
//! anti-forgery tokens and the HTTP listener that ties them together.

mod controller;
pub mod render;
mod request;
mod server;
mod tokens;

pub use controller::AdminController;
pub use request::{
    page_url, Method, RequestContext, Response, ADD_EDIT_CONTACT, ADD_EDIT_PERSON, DEFAULT_USER,
    EDIT_CONTACT, PEOPLE_LIST, PERSON_DETAILS,
};
pub use server::AdminServer;
pub use tokens::{
    generate_secret, TokenSigner, DELETE_CONTACT, DELETE_PERSON, SAVE_CONTACT, SAVE_PERSON,
};
