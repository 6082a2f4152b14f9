use crate::features::world::CongresoWorld;
use chrono::{Duration, Utc};
use congreso_core::identity::Credentials;
use congreso_core::rbac::RoleId;
use congreso_core::session::DEFAULT_TOKEN_KEY;
use congreso_core::session::KeyValueStore;
use congreso_core::testing::{auth_body, sample_user, token_expiring_at, MockIdentityApi, MockReply};
use congreso_core::{AuthError, AuthPhase};
use cucumber::{given, then, when};
use serde_json::json;
use std::sync::Arc;

// ==================== ENDPOINT ====================

#[given(expr = "a mock identity endpoint")]
async fn given_endpoint(world: &mut CongresoWorld) {
    world.api = Arc::new(MockIdentityApi::new());
    world.controller = None;
}

#[given(expr = "the endpoint accepts logins for role {int}")]
async fn given_accepts_logins(world: &mut CongresoWorld, role: u32) {
    let user = sample_user(RoleId(role));
    let token = token_expiring_at(Utc::now() + Duration::hours(2));
    world.api.set_login(MockReply::Json(auth_body(&token, &user)));
    world.expected_user = Some(user);
}

#[given(expr = "the endpoint answers logins without a token")]
async fn given_login_without_token(world: &mut CongresoWorld) {
    let user = sample_user(RoleId::PARTICIPANT);
    world.api.set_login(MockReply::Json(json!({"usuario": user, "message": "ok"})));
}

#[given(expr = "the endpoint rejects logins with {string}")]
async fn given_login_rejected(world: &mut CongresoWorld, message: String) {
    world.api.set_login(MockReply::Status(401, Some(message)));
}

#[given(expr = "the endpoint validates tokens with the name {string}")]
async fn given_validation_renames(world: &mut CongresoWorld, name: String) {
    let mut user = world.expected_user.clone().unwrap_or_else(|| sample_user(RoleId::PARTICIPANT));
    user.first_name = name;
    world.api.set_validate(MockReply::Json(json!({"usuario": user})));
}

#[given(expr = "the endpoint refuses token validation")]
async fn given_validation_refused(world: &mut CongresoWorld) {
    world.api.set_validate(MockReply::Status(401, Some("Token inválido".to_string())));
}

// ==================== STORED SESSION ====================

fn store_session(world: &mut CongresoWorld, role: u32, expires_in: Duration) {
    let user = sample_user(RoleId(role));
    let token = token_expiring_at(Utc::now() + expires_in);
    world.sessions().save(&token, &user).expect("seed stored session");
    world.stored_token = Some(token);
    world.expected_user = Some(user);
}

#[given(expr = "a stored session for role {int} whose token expired")]
async fn given_expired_session(world: &mut CongresoWorld, role: u32) {
    store_session(world, role, Duration::minutes(-10));
}

#[given(expr = "a stored session for role {int} whose token is valid")]
async fn given_valid_session(world: &mut CongresoWorld, role: u32) {
    store_session(world, role, Duration::hours(1));
}

// ==================== ACTIONS ====================

async fn log_in(world: &mut CongresoWorld, email: &str, password: &str) {
    let credentials = Credentials::new(email, password);
    let result = world.controller().login(&credentials).await;
    world.login_result = Some(result);
}

#[given(expr = "the user logs in as {string} with {string}")]
async fn given_logged_in(world: &mut CongresoWorld, email: String, password: String) {
    log_in(world, &email, &password).await;
    assert!(matches!(world.login_result, Some(Ok(_))), "setup login failed");
}

#[when(expr = "the user logs in as {string} with {string}")]
async fn when_log_in(world: &mut CongresoWorld, email: String, password: String) {
    log_in(world, &email, &password).await;
}

#[when(expr = "the user logs out")]
async fn when_log_out(world: &mut CongresoWorld) {
    world.controller().logout();
}

#[when(expr = "the application starts")]
async fn when_app_starts(world: &mut CongresoWorld) {
    world.controller().restore().await;
}

// ==================== OUTCOMES ====================

#[then(expr = "the login succeeds")]
async fn then_login_ok(world: &mut CongresoWorld) {
    assert!(matches!(world.login_result, Some(Ok(_))), "login result: {:?}", world.login_result);
}

#[then(expr = "the login fails with a malformed response")]
async fn then_login_malformed(world: &mut CongresoWorld) {
    assert!(
        matches!(world.login_result, Some(Err(AuthError::MalformedResponse(_)))),
        "login result: {:?}",
        world.login_result
    );
}

#[then(expr = "the login fails with message {string}")]
async fn then_login_message(world: &mut CongresoWorld, message: String) {
    match &world.login_result {
        Some(Err(err)) => assert_eq!(err.user_message(), message),
        other => panic!("expected a failed login, got {:?}", other),
    }
}

#[then(expr = "the current user is the one returned by the endpoint")]
async fn then_current_user_matches(world: &mut CongresoWorld) {
    let expected = world.expected_user.clone();
    assert_eq!(world.controller().current_user(), expected);
}

#[then(expr = "the current user is named {string}")]
async fn then_current_user_named(world: &mut CongresoWorld, name: String) {
    let user = world.controller().current_user().expect("no current user");
    assert_eq!(user.first_name, name);
}

#[then(expr = "there is no current user")]
async fn then_no_user(world: &mut CongresoWorld) {
    assert_eq!(world.controller().current_user(), None);
    assert_eq!(world.controller().token(), None);
}

#[then(expr = "durable storage holds the session")]
async fn then_storage_holds(world: &mut CongresoWorld) {
    let stored = world.sessions().load().expect("storage readable").expect("no stored session");
    assert_eq!(Some(stored.user), world.expected_user);
}

#[then(expr = "durable storage is empty")]
async fn then_storage_empty(world: &mut CongresoWorld) {
    assert!(world.backend.is_empty(), "storage still holds {:?}", world.backend);
}

#[then(expr = "the stored token is kept")]
async fn then_token_kept(world: &mut CongresoWorld) {
    let token = world.controller().token();
    assert_eq!(token, world.stored_token);
    assert_eq!(world.backend.get(DEFAULT_TOKEN_KEY).expect("storage readable"), world.stored_token);
}

#[then(expr = "no validation request was made")]
async fn then_no_validation(world: &mut CongresoWorld) {
    assert_eq!(world.api.validate_calls(), 0);
}

#[then(expr = "the controller is authenticated")]
async fn then_authenticated(world: &mut CongresoWorld) {
    assert_eq!(world.controller().phase(), AuthPhase::Authenticated);
    assert!(world.controller().is_ready());
}

#[then(expr = "the controller is unauthenticated")]
async fn then_unauthenticated(world: &mut CongresoWorld) {
    assert_eq!(world.controller().phase(), AuthPhase::Unauthenticated);
    assert!(world.controller().is_ready());
}

#[then(expr = "the session may {string} on {string}")]
async fn then_session_may(world: &mut CongresoWorld, action: String, module: String) {
    assert!(world.controller().authorizer().has_permission_named(&module, &action));
}

#[then(expr = "the session may not {string} on {string}")]
async fn then_session_may_not(world: &mut CongresoWorld, action: String, module: String) {
    assert!(!world.controller().authorizer().has_permission_named(&module, &action));
}
