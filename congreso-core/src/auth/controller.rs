use crate::config::{AppConfig, StorageBackend};
use crate::error::AuthError;
use crate::identity::{extract_user, AuthResponse, Credentials, HttpIdentityApi, IdentityApi, Registration};
use crate::rbac::{AccessPolicy, Authorizer, RoleDirectory, RoleId};
use crate::session::{token, KeyValueStore, MemoryStore, PersistentStore, SessionStore, User};
use anyhow::Context;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where the controller stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

#[derive(Debug)]
struct AuthState {
    phase: AuthPhase,
    token: Option<String>,
    user: Option<User>,
}

impl AuthState {
    fn signed_out() -> Self {
        Self { phase: AuthPhase::Unauthenticated, token: None, user: None }
    }
}

/// Releases the in-flight flag however the request ends
///
/// A phase still at `Authenticating` on release means no session was
/// adopted, so it falls back to `Unauthenticated`. That also covers a
/// future dropped mid-request.
struct InFlight<'a> {
    controller: &'a AuthController,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.controller.write_state();
            if state.phase == AuthPhase::Authenticating {
                *state = AuthState::signed_out();
            }
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

/// Owner of the current identity
///
/// Only the controller mutates the session. Everything else reads it
/// through accessors or through an [`Authorizer`] bound to the current
/// role.
pub struct AuthController {
    api: Arc<dyn IdentityApi>,
    sessions: SessionStore,
    policy: Arc<AccessPolicy>,
    state: RwLock<AuthState>,
    in_flight: AtomicBool,
    restored: AtomicBool,
    ready: AtomicBool,
}

impl AuthController {
    pub fn new(api: Arc<dyn IdentityApi>, sessions: SessionStore, policy: Arc<AccessPolicy>) -> Self {
        Self {
            api,
            sessions,
            policy,
            state: RwLock::new(AuthState::signed_out()),
            in_flight: AtomicBool::new(false),
            restored: AtomicBool::new(false),
            ready: AtomicBool::new(false),
        }
    }

    /// Wire up the HTTP client, storage backend and access policy
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api = HttpIdentityApi::from_config(&config.api).context("Failed to build identity client")?;

        let backend: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::File => Arc::new(
                PersistentStore::open(&config.storage.dir, &config.storage.namespace).with_context(
                    || format!("Failed to open session storage in {}", config.storage.dir.display()),
                )?,
            ),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let sessions =
            SessionStore::with_keys(backend, &config.storage.token_key, &config.storage.user_key);
        let policy = AccessPolicy::standard_with(config.access.route_matching);

        log::info!(
            "Auth controller configured: api={}, storage={:?}, route_matching={:?}",
            config.api.base_url,
            config.storage.backend,
            config.access.route_matching
        );

        Ok(Self::new(Arc::new(api), sessions, Arc::new(policy)))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<InFlight<'_>, AuthError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(AuthError::InProgress);
        }
        self.write_state().phase = AuthPhase::Authenticating;
        Ok(InFlight { controller: self })
    }

    /// Forget the session in memory and in storage
    fn sign_out(&self) {
        *self.write_state() = AuthState::signed_out();
        if let Err(e) = self.sessions.clear() {
            log::warn!("Failed to clear stored session: {}", e);
        }
    }

    /// Persist and adopt a session, unless a logout ran since `begin`
    ///
    /// Storage is written under the state lock so a concurrent logout
    /// either precedes the check or clears both afterwards.
    fn adopt(&self, token: String, user: User) -> Result<User, AuthError> {
        let mut state = self.write_state();
        if state.phase != AuthPhase::Authenticating {
            return Err(AuthError::Cancelled);
        }
        self.sessions.save(&token, &user)?;
        *state = AuthState { phase: AuthPhase::Authenticated, token: Some(token), user: Some(user.clone()) };
        Ok(user)
    }

    /// Apply the outcome of a login or registration exchange
    fn conclude(
        &self,
        _guard: InFlight<'_>,
        outcome: Result<AuthResponse, AuthError>,
        operation: &str,
    ) -> Result<User, AuthError> {
        let result = outcome
            .and_then(AuthResponse::into_session)
            .and_then(|(token, user)| self.adopt(token, user));

        match result {
            Ok(user) => {
                log::info!("{} succeeded for user {} (role {})", operation, user.id, user.role_id);
                Ok(user)
            }
            Err(AuthError::Cancelled) => {
                log::info!("{} outcome dropped, session was closed meanwhile", operation);
                Err(AuthError::Cancelled)
            }
            Err(e) => {
                log::warn!("{} failed: {}", operation, e);
                self.sign_out();
                Err(e)
            }
        }
    }

    /// Exchange credentials for a session
    ///
    /// Fails with [`AuthError::InProgress`] while another login,
    /// registration or restore is pending, and with
    /// [`AuthError::Cancelled`] when [`logout`](Self::logout) runs before
    /// the endpoint answers.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let guard = self.begin()?;
        log::debug!("Logging in {}", credentials.email);
        let outcome = self.api.login(credentials).await;
        self.conclude(guard, outcome, "Login")
    }

    /// Create an account and sign straight into it
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let guard = self.begin()?;
        log::debug!("Registering {}", registration.email);
        let outcome = self.api.register(registration).await;
        self.conclude(guard, outcome, "Registration")
    }

    /// Drop the session locally; the server keeps no session to end
    pub fn logout(&self) {
        let user_id = self.read_state().user.as_ref().map(|user| user.id);
        self.sign_out();
        match user_id {
            Some(id) => log::info!("User {} logged out", id),
            None => log::debug!("Logout with no active session"),
        }
    }

    /// Replace the user record after a profile edit; the token is kept
    pub fn update_identity(&self, user: User) -> Result<(), AuthError> {
        let mut state = self.write_state();
        if state.phase != AuthPhase::Authenticated {
            return Err(AuthError::NotAuthenticated);
        }

        self.sessions.save_user(&user)?;
        log::debug!("Identity updated for user {}", user.id);
        state.user = Some(user);
        Ok(())
    }

    /// Rehydrate the stored session at startup
    ///
    /// Runs once; later calls only report the current state. Every failure
    /// ends signed out with storage cleared, and none is reported to the
    /// caller. Returns whether a session was restored.
    pub async fn restore(&self) -> bool {
        if self.restored.swap(true, Ordering::AcqRel) {
            return self.is_authenticated();
        }

        let restored = self.rehydrate().await;
        self.ready.store(true, Ordering::Release);
        restored
    }

    async fn rehydrate(&self) -> bool {
        let _guard = match self.begin() {
            Ok(guard) => guard,
            Err(_) => {
                log::debug!("Authentication in progress, skipping session restore");
                return self.is_authenticated();
            }
        };

        let stored = match self.sessions.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                // Leftovers of a half-written session go too
                if self.sessions.has_any().unwrap_or(true) {
                    self.sign_out();
                }
                log::debug!("No stored session");
                return false;
            }
            Err(e) => {
                log::warn!("Failed to read stored session: {}", e);
                self.sign_out();
                return false;
            }
        };

        if token::is_expired(&stored.token) {
            log::info!("Stored session for user {} has expired", stored.user.id);
            self.sign_out();
            return false;
        }

        let user = self
            .api
            .validate_token(&stored.token)
            .await
            .and_then(|body| {
                extract_user(&body).ok_or_else(|| {
                    AuthError::MalformedResponse("validation response has no user record".to_string())
                })
            });

        // The remote record may be fresher than the stored one
        match user.and_then(|user| self.adopt(stored.token, user)) {
            Ok(user) => {
                log::info!("Session restored for user {} (role {})", user.id, user.role_id);
                true
            }
            Err(AuthError::Cancelled) => {
                log::info!("Session closed during restore, validation result dropped");
                false
            }
            Err(e) => {
                log::info!("Stored session rejected: {}", e);
                self.sign_out();
                false
            }
        }
    }

    /// Display labels for roles, from the remote directory
    pub async fn role_directory(&self) -> Result<RoleDirectory, AuthError> {
        let token = self.token();
        let roles = self.api.roles(token.as_deref()).await?;
        Ok(RoleDirectory::new(roles))
    }

    pub fn phase(&self) -> AuthPhase {
        self.read_state().phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    /// True while a login, registration or startup restore is pending
    pub fn is_authenticating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// True once startup rehydration has finished
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn current_user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    pub fn role_id(&self) -> Option<RoleId> {
        let state = self.read_state();
        match state.phase {
            AuthPhase::Authenticated => state.user.as_ref().map(|user| user.role_id),
            _ => None,
        }
    }

    /// Permission queries bound to the current role
    ///
    /// The role is captured at call time; take a fresh authorizer after
    /// the session changes.
    pub fn authorizer(&self) -> Authorizer<'_> {
        self.policy.authorizer(self.role_id())
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("AuthController")
            .field("phase", &state.phase)
            .field("user_id", &state.user.as_ref().map(|user| user.id))
            .field("in_flight", &self.is_authenticating())
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
