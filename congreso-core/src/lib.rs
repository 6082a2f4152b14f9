//! Congreso Core
//!
//! Role-based access control and session lifecycle for the conference
//! management client (registrations, workshops, competitions, forums,
//! attendance, diplomas).
//!
//! # Overview
//!
//! Authorization is a static lookup: a numeric role id indexes a closed
//! permission matrix (module → action → bool) and a table of reachable
//! route prefixes. The identity behind the role comes from a remote
//! endpoint; this crate keeps it, persists it, and rehydrates it at
//! startup.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use congreso_core::auth::AuthController;
//! use congreso_core::config::AppConfig;
//! use congreso_core::identity::Credentials;
//! use congreso_core::rbac::{Action, Module};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     config.validate()?;
//!     congreso_core::logging::init_logging(&config.logging)?;
//!
//!     let auth = AuthController::from_config(&config)?;
//!     if !auth.restore().await {
//!         auth.login(&Credentials::new("ana@example.com", "secreto")).await?;
//!     }
//!
//!     let access = auth.authorizer();
//!     if access.has_permission(Module::Workshops, Action::Create) {
//!         println!("may create workshops");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`rbac`] - Roles, permission matrix, route table, [`Authorizer`](rbac::Authorizer)
//! - [`session`] - Durable key-value storage and the persisted session
//! - [`identity`] - Remote identity endpoint client
//! - [`auth`] - Session lifecycle controller
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logger for the `log` facade

pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod rbac;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use auth::{AuthController, AuthPhase};
pub use error::AuthError;
pub use rbac::{AccessPolicy, Action, Authorizer, Module, RoleId};
pub use session::User;
