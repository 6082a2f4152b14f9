//! Role-Based Access Control
//!
//! Authorization is a static lookup: a numeric role id indexes a
//! [`PermissionMatrix`] (module → action → bool) and a
//! [`RouteAccessTable`] (allowed path prefixes). Both are immutable once
//! built. The [`Authorizer`] answers questions for one caller.
//!
//! # Example
//! ```rust
//! use congreso_core::rbac::{AccessPolicy, Action, Module, RoleId};
//!
//! let policy = AccessPolicy::default();
//! let staff = policy.authorizer(Some(RoleId::STAFF));
//!
//! assert!(staff.has_permission(Module::Attendance, Action::Record));
//! assert!(!staff.can_access_route("/admin/usuarios"));
//! ```

#[macro_use]
mod matrix;
mod context;
mod permissions;
mod roles;
mod routes;

pub use context::{AccessPolicy, Authorizer};
pub use matrix::{ModulePermissions, PermissionMatrix, RolePermissions};
pub use permissions::{Action, Module, UnknownName};
pub use roles::{KnownRole, RoleDirectory, RoleId, RoleInfo};
pub use routes::{RouteAccessTable, RouteMatching, PUBLIC_PATHS};
