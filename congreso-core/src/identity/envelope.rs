//! Extraction of a user record from the token validation response
//!
//! The backend has answered with several shapes over time. Each shape is
//! one strategy; they are tried in [`EXTRACTION_ORDER`] and the first that
//! yields a valid [`User`] wins. The canonical shape is
//! `{"usuario": {...}}`.

use crate::session::User;
use serde_json::Value;

/// One known response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{"data": user}`
    Data,
    /// `{"usuario": user}`
    Usuario,
    /// `{"perfil": user}`
    Perfil,
    /// The user object itself
    Bare,
}

pub const EXTRACTION_ORDER: [EnvelopeShape; 4] =
    [EnvelopeShape::Data, EnvelopeShape::Usuario, EnvelopeShape::Perfil, EnvelopeShape::Bare];

impl EnvelopeShape {
    /// Try this strategy alone
    pub fn extract(self, body: &Value) -> Option<User> {
        let candidate = match self {
            EnvelopeShape::Data => body.get("data")?,
            EnvelopeShape::Usuario => body.get("usuario")?,
            EnvelopeShape::Perfil => body.get("perfil")?,
            EnvelopeShape::Bare => body,
        };

        if !candidate.is_object() {
            return None;
        }
        serde_json::from_value(candidate.clone()).ok()
    }
}

/// Run every strategy in order
pub fn extract_user(body: &Value) -> Option<User> {
    EXTRACTION_ORDER.into_iter().find_map(|shape| {
        let user = shape.extract(body);
        if user.is_some() {
            log::debug!("User record found in {:?} envelope", shape);
        }
        user
    })
}
