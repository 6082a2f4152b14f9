//! Local expiry check for bearer tokens
//!
//! Tokens are JWTs. Only the payload is read, to skip a network round
//! trip for tokens that have obviously expired; the signature is the
//! server's business and is not verified here.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Token could not be decoded
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Format,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is not a JSON claims object")]
    Claims,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim, if the token carries one
pub fn decode_expiry(token: &str) -> Result<Option<DateTime<Utc>>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Format);
    }

    // Some issuers pad their segments; the decoder does not accept padding
    let payload =
        URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).map_err(|_| TokenError::Encoding)?;
    let claims: ExpiryClaim = serde_json::from_slice(&payload).map_err(|_| TokenError::Claims)?;

    Ok(claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single()))
}

/// Whether the token should be treated as expired at `now`
///
/// Undecodable tokens count as expired. Tokens without an `exp` claim do
/// not, since only the server can tell.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Ok(Some(expires_at)) => expires_at <= now,
        Ok(None) => false,
        Err(e) => {
            log::debug!("Treating undecodable token as expired: {}", e);
            true
        }
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}
