//! Authentication error taxonomy

use crate::session::StorageError;

/// Shown when the server gave no usable explanation
pub const GENERIC_FAILURE_MESSAGE: &str = "No fue posible completar la solicitud";

/// Shown when the server could not be reached at all
pub const NETWORK_FAILURE_MESSAGE: &str = "No fue posible conectar con el servidor";

/// Failure of a remote identity exchange or of session bookkeeping
///
/// Authorization denials are not errors; those are `false` answers from
/// the [`Authorizer`](crate::rbac::Authorizer).
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// 2xx response missing required fields or carrying an unreadable body
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Credential rejected or expired (HTTP 401)
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("credentials rejected"))]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx answer
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The request never completed
    #[error("network error: {0}")]
    Network(String),

    /// Another login or registration is still in flight
    #[error("an authentication request is already in progress")]
    InProgress,

    /// Logout ran while the request was in flight; its outcome was dropped
    #[error("session closed before the request completed")]
    Cancelled,

    /// Operation requires an authenticated session
    #[error("no authenticated session")]
    NotAuthenticated,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text suitable for showing to the user
    ///
    /// Uses the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Unauthorized { message: Some(message) }
            | AuthError::Rejected { message: Some(message), .. } => message.clone(),
            AuthError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            AuthError::InProgress => "Ya hay una solicitud en curso".to_string(),
            AuthError::NotAuthenticated => "La sesión no está activa".to_string(),
            AuthError::Cancelled => "La sesión se cerró antes de completar la solicitud".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether the remote side judged the credential invalid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = AuthError::Rejected {
            status: 422,
            message: Some("El correo ya está registrado".to_string()),
        };
        assert_eq!(err.user_message(), "El correo ya está registrado");

        let err = AuthError::Unauthorized { message: Some("Credenciales inválidas".to_string()) };
        assert_eq!(err.user_message(), "Credenciales inválidas");
    }

    #[test]
    fn test_user_message_fallbacks() {
        assert_eq!(AuthError::Rejected { status: 500, message: None }.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(AuthError::Network("timeout".to_string()).user_message(), NETWORK_FAILURE_MESSAGE);
        assert_eq!(
            AuthError::MalformedResponse("missing token".to_string()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_display() {
        let err = AuthError::Unauthorized { message: None };
        assert_eq!(err.to_string(), "unauthorized: credentials rejected");
        assert!(err.is_unauthorized());
    }
}
