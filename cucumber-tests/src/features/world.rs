use congreso_core::rbac::{AccessPolicy, Authorizer, RoleId, RouteMatching};
use congreso_core::session::{MemoryStore, SessionStore, User};
use congreso_core::testing::MockIdentityApi;
use congreso_core::{AuthController, AuthError};
use cucumber::World as CucumberWorld;
use std::sync::Arc;

/// State shared by the steps of one scenario
#[derive(Debug, Default, CucumberWorld)]
pub struct CongresoWorld {
    /// Route matching used by policies built in this scenario
    pub matching: RouteMatching,
    /// Role of the caller in access scenarios
    pub role: Option<RoleId>,
    pub answer: Option<bool>,

    pub api: Arc<MockIdentityApi>,
    pub backend: MemoryStore,
    pub controller: Option<AuthController>,
    /// User record the mock endpoint hands out
    pub expected_user: Option<User>,
    pub stored_token: Option<String>,
    pub login_result: Option<Result<User, AuthError>>,
}

impl CongresoWorld {
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::standard_with(self.matching)
    }

    /// Controller over this scenario's mock endpoint and storage
    pub fn controller(&mut self) -> &AuthController {
        let api = self.api.clone();
        let backend = self.backend.clone();
        let matching = self.matching;
        self.controller.get_or_insert_with(|| {
            AuthController::new(
                api,
                SessionStore::new(Arc::new(backend)),
                Arc::new(AccessPolicy::standard_with(matching)),
            )
        })
    }

    pub fn sessions(&self) -> SessionStore {
        SessionStore::new(Arc::new(self.backend.clone()))
    }

    pub fn with_authorizer<T>(&self, query: impl FnOnce(Authorizer<'_>) -> T) -> T {
        let policy = self.policy();
        query(policy.authorizer(self.role))
    }
}
