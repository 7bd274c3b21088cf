//! Per-request context handed to the controller, and the controller's reply.

use std::collections::HashMap;
use url::form_urlencoded;

pub const PEOPLE_LIST: &str = "people-list";
pub const ADD_EDIT_PERSON: &str = "add-edit-person";
pub const PERSON_DETAILS: &str = "person-details";
pub const ADD_EDIT_CONTACT: &str = "add-edit-contact";
pub const EDIT_CONTACT: &str = "edit-contact";

/// Identity used when the proxy in front of us does not name a user.
pub const DEFAULT_USER: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GET" | "HEAD" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }
}

/// Everything a page handler may read about the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub page: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub user: String,
}

impl RequestContext {
    pub fn new(method: Method, page: &str) -> Self {
        Self {
            method,
            page: page.to_string(),
            query: HashMap::new(),
            form: HashMap::new(),
            user: DEFAULT_USER.to_string(),
        }
    }

    pub fn get(page: &str) -> Self {
        Self::new(Method::Get, page)
    }

    pub fn post(page: &str) -> Self {
        Self::new(Method::Post, page)
    }

    /// Build a context from a request target such as `/person-details?person_id=3`
    /// and an urlencoded body.
    pub fn from_target(method: Method, target: &str, body: &[u8], user: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let mut ctx = Self::new(method, path.trim_matches('/'));
        ctx.query = parse_pairs(query.as_bytes());
        if method == Method::Post {
            ctx.form = parse_pairs(body);
        }
        ctx.user = user.to_string();
        ctx
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_form(mut self, key: &str, value: impl ToString) -> Self {
        self.form.insert(key.to_string(), value.to_string());
        self
    }

    pub fn as_user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Positive integer id from the query string; anything else is absent.
    pub fn query_id(&self, key: &str) -> Option<i64> {
        self.query_param(key).and_then(parse_id)
    }

    /// Submitted form field, empty when missing.
    pub fn form_value(&self, key: &str) -> &str {
        self.form.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn form_id(&self, key: &str) -> Option<i64> {
        self.form.get(key).and_then(|v| parse_id(v))
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    form_urlencoded::parse(input).into_owned().collect()
}

/// Link to an admin page with the given query parameters.
pub fn page_url(page: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return format!("/{}", page);
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("/{}?{}", page, query)
}

/// What the controller wants sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Html { status: u16, body: String },
    Redirect { location: String },
}

impl Response {
    pub fn html(status: u16, body: String) -> Self {
        Self::Html { status, body }
    }

    pub fn redirect(location: String) -> Self {
        Self::Redirect { location }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Html { status, .. } => *status,
            Self::Redirect { .. } => 303,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Html { body, .. } => body,
            Self::Redirect { .. } => "",
        }
    }
}
