//! Session lifecycle
//!
//! [`AuthController`] drives login, registration, logout, profile updates
//! and startup rehydration against an [`IdentityApi`](crate::identity::IdentityApi),
//! keeping the in-memory identity and the persisted [`SessionStore`](crate::session::SessionStore)
//! in step.
//!
//! ```text
//! Unauthenticated ──login/register/restore──> Authenticating ──ok──> Authenticated
//!        ^                                          │                      │
//!        └──────────────────── failure ─────────────┘                      │
//!        └──────────────────── logout ─────────────────────────────────────┘
//! ```

mod controller;

pub use controller::{AuthController, AuthPhase};
