//! HTML rendering for the admin pages.
//!
//! Each `render_*` function is a pure function of its view model. All text
//! coming from users or the database goes through `escape_html`.

/// Kind of notice shown above a page's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Warning => "notice notice-warning",
            Self::Error => "notice notice-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct PersonRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub edit_url: String,
    pub details_url: String,
    pub delete_url: String,
}

pub struct PeopleListView {
    pub notices: Vec<Notice>,
    pub people: Vec<PersonRow>,
    pub add_url: String,
}

pub struct PersonFormView {
    pub editing: bool,
    pub notices: Vec<Notice>,
    pub name: String,
    pub email: String,
    pub token: String,
}

pub struct ContactRow {
    pub id: i64,
    pub country_code: String,
    pub number: String,
    pub edit_url: String,
    pub delete_url: String,
}

pub struct PersonDetailsView {
    pub notices: Vec<Notice>,
    pub name: String,
    pub email: String,
    pub contacts: Vec<ContactRow>,
    pub add_contact_url: String,
}

pub struct ContactFormView {
    pub editing: bool,
    pub notices: Vec<Notice>,
    pub people: Vec<SelectOption>,
    pub calling_codes: Vec<SelectOption>,
    pub number: String,
    pub token: String,
}

pub struct EditContactView {
    pub notices: Vec<Notice>,
    pub country_code: String,
    pub number: String,
    pub token: String,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notices: &[Notice], content: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{} &lsaquo; Contact Manager</title>\n", escape_html(title)));
    html.push_str("</head>\n<body>\n<nav class=\"admin-menu\">\n");
    html.push_str("<a href=\"/people-list\">People</a>\n");
    html.push_str("<a href=\"/add-edit-person\">Add/Edit Person</a>\n");
    html.push_str("<a href=\"/add-edit-contact\">Add/Edit Contact</a>\n");
    html.push_str("</nav>\n<div class=\"wrap\">\n");
    html.push_str(&format!(
        "<h1 class=\"wp-heading-inline\">{}</h1>\n",
        escape_html(title)
    ));
    for notice in notices {
        html.push_str(&format!(
            "<div class=\"{}\"><p>{}</p></div>\n",
            notice.kind.css_class(),
            escape_html(&notice.message)
        ));
    }
    html.push_str(content);
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn select(name: &str, options: &[SelectOption]) -> String {
    let mut html = format!("<select name=\"{0}\" id=\"{0}\" required>\n", name);
    for option in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(&option.value),
            if option.selected { " selected" } else { "" },
            escape_html(&option.label)
        ));
    }
    html.push_str("</select>");
    html
}

fn text_input(name: &str, input_type: &str, value: &str) -> String {
    format!(
        "<input type=\"{1}\" name=\"{0}\" id=\"{0}\" value=\"{2}\" required>",
        name,
        input_type,
        escape_html(value)
    )
}

fn form_row(label: &str, name: &str, control: &str) -> String {
    format!(
        "<tr>\n<th><label for=\"{}\">{}</label></th>\n<td>{}</td>\n</tr>\n",
        name, label, control
    )
}

fn form(rows: &str, token: &str, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"\">\n<table class=\"form-table\">\n{}</table>\n\
         <input type=\"hidden\" name=\"_token\" value=\"{}\">\n\
         <p class=\"submit\"><input type=\"submit\" name=\"submit\" class=\"button button-primary\" value=\"{}\"></p>\n\
         </form>\n",
        rows,
        escape_html(token),
        submit
    )
}

fn delete_link(url: &str, what: &str) -> String {
    format!(
        "<a href=\"{}\" class=\"delete\" onclick=\"return confirm('Are you sure you want to delete this {}?');\">Delete</a>",
        escape_html(url),
        what
    )
}

pub fn render_people_list(view: &PeopleListView) -> String {
    let mut content = format!(
        "<a href=\"{}\" class=\"page-title-action\">Add New Person</a>\n",
        escape_html(&view.add_url)
    );
    content.push_str(
        "<table class=\"wp-list-table widefat fixed striped\">\n<thead>\n\
         <tr><th>ID</th><th>Name</th><th>Email</th><th>Actions</th></tr>\n</thead>\n<tbody>\n",
    );
    for person in &view.people {
        content.push_str(&format!(
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n<td>\n<a href=\"{}\">Edit</a>\n<a href=\"{}\">Details</a>\n{}\n</td>\n</tr>\n",
            person.id,
            escape_html(&person.name),
            escape_html(&person.email),
            escape_html(&person.edit_url),
            escape_html(&person.details_url),
            delete_link(&person.delete_url, "person"),
        ));
    }
    content.push_str("</tbody>\n</table>\n");
    layout("People List", &view.notices, &content)
}

pub fn render_person_form(view: &PersonFormView) -> String {
    let rows = [
        form_row("Name", "name", &text_input("name", "text", &view.name)),
        form_row("Email", "email", &text_input("email", "email", &view.email)),
    ]
    .concat();

    let (title, submit) = if view.editing {
        ("Edit Person", "Update Person")
    } else {
        ("Add New Person", "Add Person")
    };
    layout(title, &view.notices, &form(&rows, &view.token, submit))
}

pub fn render_person_details(view: &PersonDetailsView) -> String {
    let mut content = format!(
        "<p class=\"person-email\">{}</p>\n<a href=\"{}\" class=\"page-title-action\">Add New Contact</a>\n",
        escape_html(&view.email),
        escape_html(&view.add_contact_url)
    );
    content.push_str(
        "<table class=\"wp-list-table widefat fixed striped\">\n<thead>\n\
         <tr><th>ID</th><th>Country Code</th><th>Number</th><th>Actions</th></tr>\n</thead>\n<tbody>\n",
    );
    for contact in &view.contacts {
        content.push_str(&format!(
            "<tr>\n<td>{}</td>\n<td>{}</td>\n<td>{}</td>\n<td>\n<a href=\"{}\">Edit</a>\n{}\n</td>\n</tr>\n",
            contact.id,
            escape_html(&contact.country_code),
            escape_html(&contact.number),
            escape_html(&contact.edit_url),
            delete_link(&contact.delete_url, "contact"),
        ));
    }
    content.push_str("</tbody>\n</table>\n");
    layout(
        &format!("Person Details - {}", view.name),
        &view.notices,
        &content,
    )
}

pub fn render_contact_form(view: &ContactFormView) -> String {
    let rows = [
        form_row("Person", "person_id", &select("person_id", &view.people)),
        form_row(
            "Country Code",
            "country_code",
            &select("country_code", &view.calling_codes),
        ),
        form_row("Number", "number", &text_input("number", "text", &view.number)),
    ]
    .concat();

    let (title, submit) = if view.editing {
        ("Edit Contact", "Update Contact")
    } else {
        ("Add New Contact", "Add Contact")
    };
    layout(title, &view.notices, &form(&rows, &view.token, submit))
}

pub fn render_edit_contact(view: &EditContactView) -> String {
    let rows = [
        form_row(
            "Country Code",
            "country_code",
            &text_input("country_code", "text", &view.country_code),
        ),
        form_row("Number", "number", &text_input("number", "text", &view.number)),
    ]
    .concat();

    layout(
        "Edit Contact",
        &view.notices,
        &form(&rows, &view.token, "Update Contact"),
    )
}

/// A page carrying only a message: not found, forbidden, errors.
pub fn render_message(title: &str, message: &str) -> String {
    layout(title, &[], &format!("<p>{}</p>\n", escape_html(message)))
}
