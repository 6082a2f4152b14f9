//! Remote identity endpoint
//!
//! The backend owns users and credentials. This module describes the four
//! calls the client makes against it ([`IdentityApi`]), the payloads they
//! exchange, and a reqwest implementation ([`HttpIdentityApi`]).

mod envelope;
mod http;

pub use envelope::{extract_user, EnvelopeShape, EXTRACTION_ORDER};
pub use http::HttpIdentityApi;

use crate::error::AuthError;
use crate::rbac::{RoleId, RoleInfo};
use crate::session::{ParticipantKind, User};
use serde::{Deserialize, Serialize};

/// Login form
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Self-registration form
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "colegio", default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: ParticipantKind,
    #[serde(rename = "id_rol")]
    pub role_id: RoleId,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("kind", &self.kind)
            .field("role_id", &self.role_id)
            .finish_non_exhaustive()
    }
}

/// Body of a successful login or registration
///
/// Fields are optional on the wire; [`AuthResponse::into_session`] is
/// where their presence is enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub usuario: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Split into token and user, both required
    pub fn into_session(self) -> Result<(String, User), AuthError> {
        let token = self
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::MalformedResponse("response has no token".to_string()))?;

        let usuario = self
            .usuario
            .filter(|usuario| !usuario.is_null())
            .ok_or_else(|| AuthError::MalformedResponse("response has no user".to_string()))?;

        let user = serde_json::from_value(usuario)
            .map_err(|e| AuthError::MalformedResponse(format!("invalid user record: {}", e)))?;

        Ok((token, user))
    }
}

/// Calls made against the identity backend
///
/// Implementations map transport and HTTP failures onto [`AuthError`].
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange credentials for a token and user record
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError>;

    /// Create an account; answers like `login`
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, AuthError>;

    /// Check a token and return the raw body describing its owner
    async fn validate_token(&self, token: &str) -> Result<serde_json::Value, AuthError>;

    /// Role labels for display
    async fn roles(&self, token: Option<&str>) -> Result<Vec<RoleInfo>, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_session_requires_token() {
        let response: AuthResponse = serde_json::from_value(json!({
            "usuario": {"id_usuario": 1, "nombre": "x", "apellido": "y", "correo": "x@y", "id_rol": 4},
            "message": "ok"
        }))
        .unwrap();

        let err = response.into_session().unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
    }

    #[test]
    fn test_into_session_requires_user() {
        let response = AuthResponse { token: Some("tok".to_string()), ..Default::default() };
        assert!(matches!(response.into_session(), Err(AuthError::MalformedResponse(_))));

        let response = AuthResponse {
            token: Some("tok".to_string()),
            usuario: Some(json!({"nombre": "sin id"})),
            message: None,
        };
        assert!(matches!(response.into_session(), Err(AuthError::MalformedResponse(_))));
    }

    #[test]
    fn test_into_session_accepts_both_id_fields() {
        let response = AuthResponse {
            token: Some("tok".to_string()),
            usuario: Some(json!({
                "id": 9, "id_usuario": 9, "nombre": "x", "apellido": "y", "correo": "x@y", "id_rol": 3
            })),
            message: None,
        };

        let (token, user) = response.into_session().unwrap();
        assert_eq!(token, "tok");
        assert_eq!(user.id, 9);
        assert_eq!(user.role_id, RoleId::STAFF);
    }

    #[test]
    fn test_into_session_rejects_empty_token() {
        let response = AuthResponse {
            token: Some(String::new()),
            usuario: Some(json!({"id_usuario": 1, "nombre": "x", "apellido": "y", "correo": "x@y", "id_rol": 4})),
            message: None,
        };
        assert!(response.into_session().is_err());
    }

    #[test]
    fn test_registration_wire_format() {
        let registration = Registration {
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            email: "ana@example.com".to_string(),
            password: "secreto".to_string(),
            phone: None,
            institution: Some("CBTIS 12".to_string()),
            kind: ParticipantKind::Internal,
            role_id: RoleId::PARTICIPANT,
        };

        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["tipo"], "I");
        assert_eq!(json["id_rol"], 4);
        assert_eq!(json["colegio"], "CBTIS 12");
        assert!(json.get("telefono").is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("ana@example.com", "secreto");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secreto"));
        assert!(debug.contains("ana@example.com"));
    }
}
