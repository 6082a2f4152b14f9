//! Test doubles and fixtures
//!
//! Compiled for unit tests and, for downstream suites, behind the
//! `test-support` feature.

use crate::error::AuthError;
use crate::identity::{AuthResponse, Credentials, IdentityApi, Registration};
use crate::rbac::{RoleId, RoleInfo};
use crate::session::User;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

/// Unsigned JWT carrying `claims` as its payload
pub fn token_with_claims(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn token_expiring_at(expires_at: DateTime<Utc>) -> String {
    token_with_claims(json!({"sub": "1", "exp": expires_at.timestamp()}))
}

pub fn sample_user(role_id: RoleId) -> User {
    User {
        id: 10 + u64::from(role_id.get()),
        first_name: "Ana".to_string(),
        last_name: "Pérez".to_string(),
        email: format!("rol{}@example.com", role_id),
        role_id,
        phone: None,
        institution: Some("CBTIS 12".to_string()),
        photo: None,
        kind: None,
        extra: serde_json::Map::new(),
    }
}

/// Successful login/register body
pub fn auth_body(token: &str, user: &User) -> Value {
    json!({"token": token, "usuario": user, "message": "ok"})
}

/// Scripted answer of the mock endpoint
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 2xx with this body
    Json(Value),
    /// Non-2xx with an optional server message
    Status(u16, Option<String>),
    /// Transport failure
    Network,
}

impl MockReply {
    fn resolve<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        match self {
            MockReply::Json(body) => serde_json::from_value(body.clone())
                .map_err(|e| AuthError::MalformedResponse(e.to_string())),
            MockReply::Status(401, message) => Err(AuthError::Unauthorized { message: message.clone() }),
            MockReply::Status(status, message) => {
                Err(AuthError::Rejected { status: *status, message: message.clone() })
            }
            MockReply::Network => Err(AuthError::Network("connection refused".to_string())),
        }
    }
}

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn wait_for(gate: &Mutex<Option<Arc<Notify>>>) {
    let gate = locked(gate).clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

/// In-process [`IdentityApi`] with scripted replies and call counters
///
/// Every endpoint answers [`MockReply::Network`] until scripted.
#[derive(Debug)]
pub struct MockIdentityApi {
    login: Mutex<MockReply>,
    register: Mutex<MockReply>,
    validate: Mutex<MockReply>,
    roles: Mutex<MockReply>,
    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    validate_calls: AtomicUsize,
    roles_calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
    login_gate: Mutex<Option<Arc<Notify>>>,
    validate_gate: Mutex<Option<Arc<Notify>>>,
}

impl Default for MockIdentityApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityApi {
    pub fn new() -> Self {
        Self {
            login: Mutex::new(MockReply::Network),
            register: Mutex::new(MockReply::Network),
            validate: Mutex::new(MockReply::Network),
            roles: Mutex::new(MockReply::Network),
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            roles_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            login_gate: Mutex::new(None),
            validate_gate: Mutex::new(None),
        }
    }

    pub fn with_login(self, reply: MockReply) -> Self {
        self.set_login(reply);
        self
    }

    pub fn with_register(self, reply: MockReply) -> Self {
        *locked(&self.register) = reply;
        self
    }

    pub fn with_validate(self, reply: MockReply) -> Self {
        self.set_validate(reply);
        self
    }

    pub fn with_roles(self, reply: MockReply) -> Self {
        *locked(&self.roles) = reply;
        self
    }

    pub fn set_login(&self, reply: MockReply) {
        *locked(&self.login) = reply;
    }

    pub fn set_validate(&self, reply: MockReply) {
        *locked(&self.validate) = reply;
    }

    /// Make logins wait until the returned handle is notified
    pub fn hold_logins(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *locked(&self.login_gate) = Some(gate.clone());
        gate
    }

    /// Make token validations wait until the returned handle is notified
    pub fn hold_validations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *locked(&self.validate_gate) = Some(gate.clone());
        gate
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn roles_calls(&self) -> usize {
        self.roles_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls() + self.register_calls() + self.validate_calls() + self.roles_calls()
    }

    /// Bearer token seen by the latest validate or roles call
    pub fn last_token(&self) -> Option<String> {
        locked(&self.last_token).clone()
    }
}

#[async_trait::async_trait]
impl IdentityApi for MockIdentityApi {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        wait_for(&self.login_gate).await;
        let reply = locked(&self.login).clone();
        reply.resolve()
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthResponse, AuthError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let reply = locked(&self.register).clone();
        reply.resolve()
    }

    async fn validate_token(&self, token: &str) -> Result<Value, AuthError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        *locked(&self.last_token) = Some(token.to_string());
        wait_for(&self.validate_gate).await;
        let reply = locked(&self.validate).clone();
        reply.resolve()
    }

    async fn roles(&self, token: Option<&str>) -> Result<Vec<RoleInfo>, AuthError> {
        self.roles_calls.fetch_add(1, Ordering::SeqCst);
        *locked(&self.last_token) = token.map(str::to_string);
        let reply = locked(&self.roles).clone();
        reply.resolve()
    }
}
