use thiserror::Error;

/// Errors surfaced by the stores, the calling-code fetch and the controller.
///
/// Every variant is recoverable at the page level: the controller turns it
/// into a notice, a not-found page or a generic error page.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to fetch calling codes: {0}")]
    Fetch(String),

    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AdminError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// HTTP status the controller answers with when this error ends a request.
    ///
    /// The admin pages never end a request on `Fetch`: the contact form shows
    /// it as a warning and still answers 200. The 502 applies to callers that
    /// propagate a directory failure instead.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 422,
            Self::NotFound { .. } => 404,
            Self::Forbidden(_) => 403,
            Self::Fetch(_) => 502,
            Self::Persistence(_) => 500,
        }
    }

    /// Text safe to show in a page. Store failures never leak SQL details.
    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(_) => "An unexpected error occurred while saving. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AdminError::Validation("x".into()).status(), 422);
        assert_eq!(AdminError::Conflict("x".into()).status(), 422);
        assert_eq!(AdminError::not_found("Person", 3).status(), 404);
        assert_eq!(AdminError::Forbidden("x".into()).status(), 403);
        assert_eq!(AdminError::Fetch("x".into()).status(), 502);
        assert_eq!(
            AdminError::Persistence(rusqlite::Error::QueryReturnedNoRows).status(),
            500
        );
    }

    #[test]
    fn test_persistence_message_is_generic() {
        let err = AdminError::Persistence(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.user_message().contains("rows"));
        assert_eq!(
            AdminError::not_found("Contact", 9).user_message(),
            "Contact not found: 9"
        );
    }
}
