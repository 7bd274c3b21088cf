//! Admin page handlers.
//!
//! `AdminController::handle` classifies one request by page and method, runs
//! the store calls, builds a view model and renders it. Every error is turned
//! into a page here; nothing propagates to the server loop.

use tracing::{error, info, warn};

use super::render::{
    self, ContactFormView, ContactRow, EditContactView, Notice, PeopleListView, PersonDetailsView,
    PersonFormView, PersonRow, SelectOption,
};
use super::request::{
    page_url, Method, RequestContext, Response, ADD_EDIT_CONTACT, ADD_EDIT_PERSON, EDIT_CONTACT,
    PEOPLE_LIST, PERSON_DETAILS,
};
use super::tokens::{self, TokenSigner};
use crate::calling_codes::CallingCodeSource;
use crate::error::{AdminError, AdminResult};
use crate::models::{normalize_calling_code, Contact, Person};
use crate::store::{ContactStore, PersonStore};
use crate::validation::{sanitize_email, sanitize_text};

const TOKEN_FIELD: &str = "_token";
const NOTICE_PARAM: &str = "notice";

const PERSON_ADDED: &str = "person-added";
const PERSON_UPDATED: &str = "person-updated";
const CONTACT_SAVED: &str = "contact-saved";

pub struct AdminController<'a> {
    people: &'a dyn PersonStore,
    contacts: &'a dyn ContactStore,
    calling_codes: &'a dyn CallingCodeSource,
    tokens: &'a TokenSigner,
}

impl<'a> AdminController<'a> {
    pub fn new(
        people: &'a dyn PersonStore,
        contacts: &'a dyn ContactStore,
        calling_codes: &'a dyn CallingCodeSource,
        tokens: &'a TokenSigner,
    ) -> Self {
        Self {
            people,
            contacts,
            calling_codes,
            tokens,
        }
    }

    pub fn handle(&self, ctx: &RequestContext) -> Response {
        let result = match ctx.page.as_str() {
            "" => Ok(Response::redirect(page_url(PEOPLE_LIST, &[]))),
            PEOPLE_LIST => self.people_list(ctx),
            ADD_EDIT_PERSON => self.add_edit_person(ctx),
            PERSON_DETAILS => self.person_details(ctx),
            ADD_EDIT_CONTACT => self.add_edit_contact(ctx),
            EDIT_CONTACT => self.edit_contact(ctx),
            _ => Ok(Response::html(
                404,
                render::render_message("Not Found", "The requested page does not exist."),
            )),
        };

        result.unwrap_or_else(|e| self.error_page(ctx, e))
    }

    fn error_page(&self, ctx: &RequestContext, err: AdminError) -> Response {
        let title = match &err {
            AdminError::NotFound { .. } => "Not Found",
            AdminError::Forbidden(_) => "Forbidden",
            AdminError::Persistence(e) => {
                error!(page = %ctx.page, error = %e, "store failure");
                "Error"
            }
            _ => "Error",
        };
        if let AdminError::Forbidden(reason) = &err {
            warn!(page = %ctx.page, user = %ctx.user, %reason, "rejected request");
        }
        Response::html(err.status(), render::render_message(title, &err.user_message()))
    }

    // ==================== PEOPLE LIST ====================

    fn people_list(&self, ctx: &RequestContext) -> AdminResult<Response> {
        if ctx.method != Method::Get {
            return Ok(method_not_allowed());
        }

        let mut notices = Vec::new();
        match ctx.query_param(NOTICE_PARAM) {
            Some(PERSON_ADDED) => notices.push(Notice::success("Person added successfully.")),
            Some(PERSON_UPDATED) => notices.push(Notice::success("Person updated successfully.")),
            _ => {}
        }

        if ctx.query_param("action") == Some("delete") {
            self.tokens
                .verify(tokens::DELETE_PERSON, &ctx.user, ctx.query_param(TOKEN_FIELD))?;

            let outcome = ctx
                .query_id("id")
                .ok_or_else(|| AdminError::Validation("Missing person id.".to_string()))
                .and_then(|id| self.people.soft_delete_person(id).map(|_| id));

            match outcome {
                Ok(id) => {
                    info!(person_id = id, user = %ctx.user, "person soft-deleted");
                    notices.push(Notice::success("Person deleted successfully."));
                }
                Err(e) => {
                    if let AdminError::Persistence(ref inner) = e {
                        error!(error = %inner, "soft delete failed");
                    }
                    notices.push(Notice::error(format!(
                        "Error occurred while deleting the person. {}",
                        e.user_message()
                    )));
                }
            }
        }

        let delete_token = self.tokens.issue(tokens::DELETE_PERSON, &ctx.user);
        let people = self
            .people
            .list_people()?
            .into_iter()
            .map(|person| PersonRow {
                edit_url: page_url(ADD_EDIT_PERSON, &[("id", person.id.to_string())]),
                details_url: page_url(PERSON_DETAILS, &[("person_id", person.id.to_string())]),
                delete_url: page_url(
                    PEOPLE_LIST,
                    &[
                        ("action", "delete".to_string()),
                        ("id", person.id.to_string()),
                        (TOKEN_FIELD, delete_token.clone()),
                    ],
                ),
                id: person.id,
                name: person.name,
                email: person.email,
            })
            .collect();

        let view = PeopleListView {
            notices,
            people,
            add_url: page_url(ADD_EDIT_PERSON, &[]),
        };
        Ok(Response::html(200, render::render_people_list(&view)))
    }

    // ==================== ADD/EDIT PERSON ====================

    fn add_edit_person(&self, ctx: &RequestContext) -> AdminResult<Response> {
        let existing = ctx
            .query_id("id")
            .map(|id| self.people.get_person(id))
            .transpose()?;

        if ctx.method == Method::Get {
            let (name, email) = existing
                .as_ref()
                .map(|p| (p.name.clone(), p.email.clone()))
                .unwrap_or_default();
            return Ok(self.person_form(ctx, existing.is_some(), name, email, Vec::new(), 200));
        }

        self.tokens
            .verify(tokens::SAVE_PERSON, &ctx.user, ctx.form.get(TOKEN_FIELD).map(String::as_str))?;

        let name = ctx.form_value("name");
        let email = ctx.form_value("email");
        let result = match &existing {
            Some(person) => self
                .people
                .update_person(person.id, name, email)
                .map(|p| (p, PERSON_UPDATED)),
            None => self
                .people
                .create_person(name, email)
                .map(|p| (p, PERSON_ADDED)),
        };

        match result {
            Ok((person, notice)) => {
                info!(person_id = person.id, user = %ctx.user, notice, "person saved");
                Ok(Response::redirect(page_url(
                    PEOPLE_LIST,
                    &[(NOTICE_PARAM, notice.to_string())],
                )))
            }
            Err(e @ (AdminError::Validation(_) | AdminError::Conflict(_))) => Ok(self.person_form(
                ctx,
                existing.is_some(),
                sanitize_text(name),
                sanitize_email(email),
                vec![Notice::error(e.to_string())],
                e.status(),
            )),
            Err(e) => Err(e),
        }
    }

    fn person_form(
        &self,
        ctx: &RequestContext,
        editing: bool,
        name: String,
        email: String,
        notices: Vec<Notice>,
        status: u16,
    ) -> Response {
        let view = PersonFormView {
            editing,
            notices,
            name,
            email,
            token: self.tokens.issue(tokens::SAVE_PERSON, &ctx.user),
        };
        Response::html(status, render::render_person_form(&view))
    }

    // ==================== PERSON DETAILS ====================

    fn person_details(&self, ctx: &RequestContext) -> AdminResult<Response> {
        if ctx.method != Method::Get {
            return Ok(method_not_allowed());
        }

        let Some(person_id) = ctx.query_id("person_id") else {
            return Ok(missing_id("Person"));
        };
        let person = self.people.get_person(person_id)?;

        let mut notices = Vec::new();
        if person.deleted {
            notices.push(Notice::warning("This person has been deleted."));
        }
        if ctx.query_param(NOTICE_PARAM) == Some(CONTACT_SAVED) {
            notices.push(Notice::success("Contact saved successfully."));
        }

        if ctx.query_param("action") == Some("delete") {
            self.tokens
                .verify(tokens::DELETE_CONTACT, &ctx.user, ctx.query_param(TOKEN_FIELD))?;
            notices.push(self.delete_owned_contact(ctx, &person));
        }

        let delete_token = self.tokens.issue(tokens::DELETE_CONTACT, &ctx.user);
        let contacts = self
            .contacts
            .contacts_for_person(person.id)?
            .into_iter()
            .map(|contact| ContactRow {
                edit_url: page_url(EDIT_CONTACT, &[("id", contact.id.to_string())]),
                delete_url: page_url(
                    PERSON_DETAILS,
                    &[
                        ("person_id", person.id.to_string()),
                        ("action", "delete".to_string()),
                        ("id", contact.id.to_string()),
                        (TOKEN_FIELD, delete_token.clone()),
                    ],
                ),
                id: contact.id,
                country_code: contact.country_code,
                number: contact.number,
            })
            .collect();

        let view = PersonDetailsView {
            notices,
            add_contact_url: page_url(ADD_EDIT_CONTACT, &[("person_id", person.id.to_string())]),
            name: person.name,
            email: person.email,
            contacts,
        };
        Ok(Response::html(200, render::render_person_details(&view)))
    }

    /// Hard-delete the contact named by `id` if it belongs to `person`.
    fn delete_owned_contact(&self, ctx: &RequestContext, person: &Person) -> Notice {
        let outcome = ctx
            .query_id("id")
            .ok_or_else(|| AdminError::Validation("Missing contact id.".to_string()))
            .and_then(|id| self.contacts.get_contact(id))
            .and_then(|contact| {
                if contact.person_id != person.id {
                    return Err(AdminError::not_found("Contact", contact.id));
                }
                self.contacts.delete_contact(contact.id).map(|_| contact.id)
            });

        match outcome {
            Ok(id) => {
                info!(contact_id = id, person_id = person.id, user = %ctx.user, "contact deleted");
                Notice::success("Contact deleted successfully.")
            }
            Err(e) => {
                if let AdminError::Persistence(ref inner) = e {
                    error!(error = %inner, "contact delete failed");
                }
                Notice::error(format!(
                    "Error occurred while deleting the contact. {}",
                    e.user_message()
                ))
            }
        }
    }

    // ==================== ADD/EDIT CONTACT ====================

    fn add_edit_contact(&self, ctx: &RequestContext) -> AdminResult<Response> {
        let existing = ctx
            .query_id("id")
            .map(|id| self.contacts.get_contact(id))
            .transpose()?;

        if ctx.method == Method::Get {
            let person_id = existing
                .as_ref()
                .map(|c| c.person_id)
                .or_else(|| ctx.query_id("person_id"));
            let (country_code, number) = existing
                .as_ref()
                .map(|c| (c.country_code.clone(), c.number.clone()))
                .unwrap_or_default();
            return self.contact_form(
                ctx,
                existing.is_some(),
                person_id,
                &country_code,
                number,
                Vec::new(),
                200,
            );
        }

        self.tokens
            .verify(tokens::SAVE_CONTACT, &ctx.user, ctx.form.get(TOKEN_FIELD).map(String::as_str))?;

        let person_id = ctx.form_id("person_id");
        let country_code = ctx.form_value("country_code");
        let number = ctx.form_value("number");

        let result = person_id
            .ok_or_else(|| AdminError::Validation("Please select a person.".to_string()))
            .and_then(|person_id| match &existing {
                Some(contact) => {
                    self.contacts
                        .update_contact(contact.id, person_id, country_code, number)
                }
                None => self.contacts.create_contact(person_id, country_code, number),
            });

        match result {
            Ok(contact) => Ok(self.contact_saved(ctx, &contact)),
            Err(e @ (AdminError::Validation(_) | AdminError::Conflict(_))) => self.contact_form(
                ctx,
                existing.is_some(),
                person_id,
                &sanitize_text(country_code),
                sanitize_text(number),
                vec![Notice::error(e.to_string())],
                e.status(),
            ),
            Err(e) => Err(e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn contact_form(
        &self,
        ctx: &RequestContext,
        editing: bool,
        person_id: Option<i64>,
        country_code: &str,
        number: String,
        mut notices: Vec<Notice>,
        status: u16,
    ) -> AdminResult<Response> {
        // The picker lists every person row, soft-deleted ones marked
        let people = self
            .people
            .all_people()?
            .into_iter()
            .map(|person| SelectOption {
                value: person.id.to_string(),
                label: person.picker_label(),
                selected: Some(person.id) == person_id,
            })
            .collect();

        let codes = match self.calling_codes.fetch_all() {
            Ok(codes) => codes,
            Err(e) => {
                warn!(error = %e, "rendering contact form without calling codes");
                notices.push(Notice::warning("Failed to fetch calling codes from the API."));
                Vec::new()
            }
        };

        let current = normalize_calling_code(country_code);
        let mut calling_codes: Vec<SelectOption> = codes
            .into_iter()
            .map(|code| SelectOption {
                selected: code.calling_code == current,
                label: code.label(),
                value: code.calling_code,
            })
            .collect();

        // Keep a stored code selectable even if the directory no longer lists it
        if !current.is_empty() && !calling_codes.iter().any(|o| o.selected) {
            calling_codes.insert(
                0,
                SelectOption {
                    label: current.clone(),
                    value: current,
                    selected: true,
                },
            );
        }

        let view = ContactFormView {
            editing,
            notices,
            people,
            calling_codes,
            number,
            token: self.tokens.issue(tokens::SAVE_CONTACT, &ctx.user),
        };
        Ok(Response::html(status, render::render_contact_form(&view)))
    }

    fn contact_saved(&self, ctx: &RequestContext, contact: &Contact) -> Response {
        info!(contact_id = contact.id, person_id = contact.person_id, user = %ctx.user, "contact saved");
        Response::redirect(page_url(
            PERSON_DETAILS,
            &[
                ("person_id", contact.person_id.to_string()),
                (NOTICE_PARAM, CONTACT_SAVED.to_string()),
            ],
        ))
    }

    // ==================== EDIT CONTACT (standalone) ====================

    fn edit_contact(&self, ctx: &RequestContext) -> AdminResult<Response> {
        let Some(contact_id) = ctx.query_id("id") else {
            return Ok(missing_id("Contact"));
        };
        let contact = self.contacts.get_contact(contact_id)?;

        if ctx.method == Method::Get {
            return Ok(self.edit_contact_form(
                ctx,
                contact.country_code,
                contact.number,
                Vec::new(),
                200,
            ));
        }

        self.tokens
            .verify(tokens::SAVE_CONTACT, &ctx.user, ctx.form.get(TOKEN_FIELD).map(String::as_str))?;

        let country_code = ctx.form_value("country_code");
        let number = ctx.form_value("number");
        match self
            .contacts
            .update_contact(contact.id, contact.person_id, country_code, number)
        {
            Ok(updated) => Ok(self.contact_saved(ctx, &updated)),
            Err(e @ (AdminError::Validation(_) | AdminError::Conflict(_))) => {
                Ok(self.edit_contact_form(
                    ctx,
                    sanitize_text(country_code),
                    sanitize_text(number),
                    vec![Notice::error(e.to_string())],
                    e.status(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    fn edit_contact_form(
        &self,
        ctx: &RequestContext,
        country_code: String,
        number: String,
        notices: Vec<Notice>,
        status: u16,
    ) -> Response {
        let view = EditContactView {
            notices,
            country_code,
            number,
            token: self.tokens.issue(tokens::SAVE_CONTACT, &ctx.user),
        };
        Response::html(status, render::render_edit_contact(&view))
    }
}

/// Not-found page for a request that names no record at all.
fn missing_id(entity: &str) -> Response {
    Response::html(
        404,
        render::render_message("Not Found", &format!("{} not found", entity)),
    )
}

fn method_not_allowed() -> Response {
    Response::html(
        405,
        render::render_message("Method Not Allowed", "This page only accepts GET requests."),
    )
}
