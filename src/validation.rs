//! Input sanitizing and field validation for the admin forms.
//!
//! Everything a user types goes through a `sanitize_*` function first; the
//! `validate_*` functions then check the sanitized value and return it.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AdminError, AdminResult};
use crate::models::normalize_calling_code;

pub const MIN_NAME_LEN: usize = 5;
pub const NUMBER_LEN: usize = 9;
pub const MAX_COUNTRY_CODE_LEN: usize = 10;

const MIN_EMAIL_LEN: usize = 6;
const EMAIL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"))
}

fn octet_pattern() -> &'static Regex {
    static OCTETS: OnceLock<Regex> = OnceLock::new();
    OCTETS.get_or_init(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("static regex"))
}

/// Strip markup, percent-encoded octets and runs of whitespace from a
/// single-line text field.
pub fn sanitize_text(value: &str) -> String {
    let without_tags = tag_pattern().replace_all(value, "");
    let without_octets = octet_pattern().replace_all(&without_tags, "");
    without_octets.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop every character that cannot appear in an email address.
pub fn sanitize_email(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '@' || EMAIL_SPECIALS.contains(*c))
        .collect()
}

/// Validate email syntax: `local@domain.tld` with a restricted character set.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < MIN_EMAIL_LEN {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => (local, domain),
        _ => return false,
    };

    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || EMAIL_SPECIALS.contains(c));
    if !local_ok {
        return false;
    }

    if domain.contains("..") || domain.trim_matches('.') != domain {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        !label.is_empty()
            && label.trim_matches('-') == *label
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

pub fn validate_name(name: &str) -> AdminResult<String> {
    let name = sanitize_text(name);
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AdminError::Validation(format!(
            "Name must be at least {} characters.",
            MIN_NAME_LEN
        )));
    }
    Ok(name)
}

pub fn validate_email(email: &str) -> AdminResult<String> {
    let email = sanitize_email(email);
    if !is_valid_email(&email) {
        return Err(AdminError::Validation("Email must be valid.".to_string()));
    }
    Ok(email)
}

/// A contact number is exactly nine ASCII digits.
pub fn validate_number(number: &str) -> AdminResult<String> {
    let number = sanitize_text(number);
    if number.len() != NUMBER_LEN || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdminError::Validation(format!(
            "Number must be exactly {} digits.",
            NUMBER_LEN
        )));
    }
    Ok(number)
}

/// Country codes are stored in `+` form, so `1` and `+1` name the same code.
pub fn validate_country_code(code: &str) -> AdminResult<String> {
    let code = normalize_calling_code(&sanitize_text(code));
    if code.is_empty() {
        return Err(AdminError::Validation("Country code is required.".to_string()));
    }
    if code.chars().count() > MAX_COUNTRY_CODE_LEN {
        return Err(AdminError::Validation(format!(
            "Country code must be at most {} characters.",
            MAX_COUNTRY_CODE_LEN
        )));
    }
    Ok(code)
}
