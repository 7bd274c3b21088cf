//! Anti-forgery tokens for mutating admin actions.
//!
//! A token is an HMAC-SHA256 over `tick.action.user`, where the tick is the
//! current half-day. Tokens issued in the current or the previous tick verify,
//! so a rendered page stays usable for 12 to 24 hours.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AdminError, AdminResult};

type HmacSha256 = Hmac<Sha256>;

/// Length of one token tick in seconds (12 hours).
const TICK_SECS: u64 = 12 * 60 * 60;

pub const DELETE_PERSON: &str = "delete_person";
pub const DELETE_CONTACT: &str = "delete_contact";
pub const SAVE_PERSON: &str = "save_person";
pub const SAVE_CONTACT: &str = "save_contact";

/// Issues and verifies per-action tokens with a server-side secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Token for `action` on behalf of `user`, valid from now.
    pub fn issue(&self, action: &str, user: &str) -> String {
        self.issue_at(current_tick(), action, user)
    }

    pub fn issue_at(&self, tick: u64, action: &str, user: &str) -> String {
        compute_token(&self.secret, tick, action, user)
    }

    /// Check a submitted token. Missing, stale or mismatched tokens are `Forbidden`.
    pub fn verify(&self, action: &str, user: &str, token: Option<&str>) -> AdminResult<()> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AdminError::Forbidden("missing security token".to_string()))?;

        let tick = current_tick();
        let valid = [tick, tick.saturating_sub(1)].iter().any(|t| {
            let expected = compute_token(&self.secret, *t, action, user);
            constant_time_eq(expected.as_bytes(), token.as_bytes())
        });

        if valid {
            Ok(())
        } else {
            Err(AdminError::Forbidden(
                "the link you followed has expired or is invalid".to_string(),
            ))
        }
    }
}

fn compute_token(secret: &str, tick: u64, action: &str, user: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(tick.to_string().as_bytes());
    mac.update(b".");
    mac.update(action.as_bytes());
    mac.update(b".");
    mac.update(user.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

fn current_tick() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        / TICK_SECS
}

/// Generate a random secret for signing tokens.
pub fn generate_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
