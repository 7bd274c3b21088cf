use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use contact_admin::calling_codes::RestCountriesClient;
use contact_admin::store::{ContactStore, PersonStore};
use contact_admin::web::{
    AdminController, RequestContext, Response, TokenSigner, ADD_EDIT_CONTACT, ADD_EDIT_PERSON,
    EDIT_CONTACT, PEOPLE_LIST, PERSON_DETAILS, SAVE_CONTACT, SAVE_PERSON,
};
use contact_admin::{AdminError, Database};

/// Answer `count` requests with 200 and the given body.
fn directory_stub(body: &'static str, count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for _ in 0..count {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line.trim().is_empty() {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}/v2/all", addr)
}

fn redirect_target(response: &Response) -> String {
    match response {
        Response::Redirect { location } => location.clone(),
        other => panic!("expected a redirect, got status {}", other.status()),
    }
}

#[test]
fn person_and_contact_lifecycle() {
    let db = Database::open_memory().unwrap();
    let directory =
        RestCountriesClient::new(directory_stub("", 1), Duration::from_secs(5)).unwrap();
    let signer = TokenSigner::new("integration-secret");
    let controller = AdminController::new(&db, &db, &directory, &signer);

    // Create a person through the form
    let created = controller.handle(
        &RequestContext::post(ADD_EDIT_PERSON)
            .with_form("name", "Alice Smith")
            .with_form("email", "alice@example.com")
            .with_form("_token", signer.issue(SAVE_PERSON, "admin")),
    );
    assert_eq!(redirect_target(&created), "/people-list?notice=person-added");

    let people = db.list_people().unwrap();
    assert_eq!(people.len(), 1);
    let alice = &people[0];
    assert_eq!(alice.name, "Alice Smith");
    assert_eq!(alice.email, "alice@example.com");

    let list = controller.handle(&RequestContext::get(PEOPLE_LIST));
    assert!(list.body().contains("Alice Smith"));

    // The contact form still renders when the directory answers with nothing
    let form = controller
        .handle(&RequestContext::get(ADD_EDIT_CONTACT).with_query("person_id", alice.id));
    assert_eq!(form.status(), 200);
    assert!(form
        .body()
        .contains("<select name=\"country_code\" id=\"country_code\" required>\n</select>"));
    assert!(!form.body().contains("notice-error"));

    // Add a contact
    let saved = controller.handle(
        &RequestContext::post(ADD_EDIT_CONTACT)
            .with_form("person_id", alice.id)
            .with_form("country_code", "+1")
            .with_form("number", "555123456")
            .with_form("_token", signer.issue(SAVE_CONTACT, "admin")),
    );
    assert_eq!(
        redirect_target(&saved),
        format!("/person-details?person_id={}&notice=contact-saved", alice.id)
    );

    let details =
        controller.handle(&RequestContext::get(PERSON_DETAILS).with_query("person_id", alice.id));
    assert!(details.body().contains("555123456"));
    assert!(details.body().contains("Contact saved successfully."));

    // Edit the number; the old pair becomes free again
    let contact = db.contacts_for_person(alice.id).unwrap().remove(0);
    let edited = controller.handle(
        &RequestContext::post(EDIT_CONTACT)
            .with_query("id", contact.id)
            .with_form("country_code", "+1")
            .with_form("number", "555123457")
            .with_form("_token", signer.issue(SAVE_CONTACT, "admin")),
    );
    assert!(redirect_target(&edited).starts_with("/person-details"));
    assert_eq!(db.get_contact(contact.id).unwrap().number, "555123457");

    let reused = db.create_contact(alice.id, "+1", "555123456").unwrap();
    assert_ne!(reused.id, contact.id);
    assert_eq!(db.contacts_for_person(alice.id).unwrap().len(), 2);
}

#[test]
fn soft_delete_keeps_contacts_and_purge_removes_them() {
    let db = Database::open_memory().unwrap();
    let alice = db.create_person("Alice Smith", "alice@example.com").unwrap();
    let contact = db.create_contact(alice.id, "+1", "555123456").unwrap();

    db.soft_delete_person(alice.id).unwrap();
    db.soft_delete_person(alice.id).unwrap();

    assert!(db.list_people().unwrap().is_empty());
    assert!(db.get_person(alice.id).unwrap().deleted);
    assert!(db.get_contact(contact.id).is_ok());

    db.purge_person(alice.id).unwrap();
    assert!(matches!(
        db.get_contact(contact.id),
        Err(AdminError::NotFound { .. })
    ));
}

#[test]
fn invalid_numbers_write_nothing() {
    let db = Database::open_memory().unwrap();
    let alice = db.create_person("Alice Smith", "alice@example.com").unwrap();

    for number in ["", "12345678", "1234567890", "12345678a", "+15551234"] {
        assert!(
            matches!(
                db.create_contact(alice.id, "+1", number),
                Err(AdminError::Validation(_))
            ),
            "{:?} should be rejected",
            number
        );
    }
    assert!(db.contacts_for_person(alice.id).unwrap().is_empty());
}

#[test]
fn duplicate_pairs_and_emails_conflict() {
    let db = Database::open_memory().unwrap();
    let alice = db.create_person("Alice Smith", "alice@example.com").unwrap();
    let bob = db.create_person("Bob Jones", "bob@example.com").unwrap();

    assert!(matches!(
        db.create_person("Alice Clone", "alice@example.com"),
        Err(AdminError::Conflict(_))
    ));
    assert_eq!(db.get_person(alice.id).unwrap().name, "Alice Smith");

    db.create_contact(alice.id, "+1", "555123456").unwrap();
    assert!(matches!(
        db.create_contact(bob.id, "+1", "555123456"),
        Err(AdminError::Conflict(_))
    ));
}
