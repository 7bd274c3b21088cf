//! Country calling-code directory client.
//!
//! Fetches the list of countries from a REST directory on every call; the
//! result feeds the calling-code dropdown of the contact form.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AdminError, AdminResult};
use crate::models::CallingCode;

pub const DEFAULT_DIRECTORY_URL: &str = "https://restcountries.com/v2/all?fields=name,callingCodes";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the calling-code dropdown entries.
pub trait CallingCodeSource {
    /// Fetch every known calling code. Failures come back as `AdminError::Fetch`.
    fn fetch_all(&self) -> AdminResult<Vec<CallingCode>>;
}

/// Client for the restcountries.com v2 API (or anything answering in its shape).
pub struct RestCountriesClient {
    client: Client,
    url: String,
}

impl RestCountriesClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AdminResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdminError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl CallingCodeSource for RestCountriesClient {
    fn fetch_all(&self) -> AdminResult<Vec<CallingCode>> {
        let response = self.client.get(&self.url).send().map_err(|e| {
            warn!(url = %self.url, error = %e, "calling code request failed");
            AdminError::Fetch(if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            })
        })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(url = %self.url, %status, "calling code directory returned an error");
            return Err(AdminError::Fetch(format!("directory returned {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| AdminError::Fetch(e.to_string()))?;
        let codes = parse_directory(&body)?;
        debug!(count = codes.len(), "calling codes fetched");
        Ok(codes)
    }
}

#[derive(Deserialize)]
struct CountryEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "callingCodes")]
    calling_codes: Option<Vec<String>>,
}

/// Map the directory's JSON into dropdown entries.
///
/// Only the first calling code of each country is used. Countries missing a
/// name or a code are skipped. An empty body is an empty directory.
pub fn parse_directory(body: &str) -> AdminResult<Vec<CallingCode>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let countries: Vec<CountryEntry> = serde_json::from_str(body)
        .map_err(|e| AdminError::Fetch(format!("invalid directory response: {}", e)))?;

    let codes = countries
        .into_iter()
        .filter_map(|country| {
            let name = country.name.filter(|n| !n.trim().is_empty())?;
            let code = country
                .calling_codes?
                .into_iter()
                .next()
                .filter(|c| !c.trim().is_empty())?;
            Some(CallingCode::new(name.trim(), code))
        })
        .collect();

    Ok(codes)
}
