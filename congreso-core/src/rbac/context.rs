//! Authorization queries for the current caller

use super::matrix::{PermissionMatrix, RolePermissions};
use super::permissions::{Action, Module};
use super::roles::RoleId;
use super::routes::{RouteAccessTable, RouteMatching};

/// Matrix and route table consulted together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub matrix: PermissionMatrix,
    pub routes: RouteAccessTable,
}

impl AccessPolicy {
    pub fn new(matrix: PermissionMatrix, routes: RouteAccessTable) -> Self {
        Self { matrix, routes }
    }

    /// Standard matrix and routes with the given route matching mode
    pub fn standard_with(matching: RouteMatching) -> Self {
        Self::new(PermissionMatrix::standard().clone(), RouteAccessTable::standard_with(matching))
    }

    /// Answer queries on behalf of `role`
    pub fn authorizer(&self, role: Option<RoleId>) -> Authorizer<'_> {
        Authorizer { policy: self, role }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard_with(RouteMatching::default())
    }
}

/// Side-effect free permission checks for one caller
///
/// `role` is `None` for anonymous callers, who hold no permission and
/// reach only public paths. Denials are plain `false`, never errors.
#[derive(Debug, Clone, Copy)]
pub struct Authorizer<'a> {
    policy: &'a AccessPolicy,
    role: Option<RoleId>,
}

impl<'a> Authorizer<'a> {
    pub fn role(&self) -> Option<RoleId> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    pub fn has_permission(&self, module: Module, action: Action) -> bool {
        match self.role {
            Some(role) => self.policy.matrix.allows(role, module, action),
            None => false,
        }
    }

    /// String-keyed variant for callers holding wire names
    ///
    /// Names that do not parse are denied.
    pub fn has_permission_named(&self, module: &str, action: &str) -> bool {
        match (module.parse::<Module>(), action.parse::<Action>()) {
            (Ok(module), Ok(action)) => self.has_permission(module, action),
            _ => false,
        }
    }

    pub fn can_view(&self, module: Module) -> bool {
        self.has_permission(module, Action::View)
    }

    pub fn can_create(&self, module: Module) -> bool {
        self.has_permission(module, Action::Create)
    }

    pub fn can_edit(&self, module: Module) -> bool {
        self.has_permission(module, Action::Edit)
    }

    pub fn can_delete(&self, module: Module) -> bool {
        self.has_permission(module, Action::Delete)
    }

    pub fn can_access_route(&self, path: &str) -> bool {
        self.policy.routes.can_access(self.role, path)
    }

    /// The caller's full row, for driving conditional UI sections
    pub fn current_role_permissions(&self) -> Option<&'a RolePermissions> {
        self.role.and_then(|role| self.policy.matrix.row(role))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(RoleId::ADMIN)
    }

    pub fn is_organizer(&self) -> bool {
        self.role == Some(RoleId::ORGANIZER)
    }

    pub fn is_staff(&self) -> bool {
        self.role == Some(RoleId::STAFF)
    }

    pub fn is_participant(&self) -> bool {
        self.role == Some(RoleId::PARTICIPANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_view_by_role() {
        let policy = AccessPolicy::default();
        assert!(!policy.authorizer(Some(RoleId::PARTICIPANT)).has_permission(Module::Users, Action::View));
        assert!(policy.authorizer(Some(RoleId::ADMIN)).has_permission(Module::Users, Action::View));
    }

    #[test]
    fn test_anonymous_has_nothing() {
        let policy = AccessPolicy::default();
        let anonymous = policy.authorizer(None);

        for module in Module::ALL {
            for action in Action::ALL {
                assert!(!anonymous.has_permission(module, action));
            }
        }
        assert!(anonymous.current_role_permissions().is_none());
        assert!(!anonymous.is_authenticated());
        assert!(anonymous.can_access_route("/login"));
        assert!(!anonymous.can_access_route("/dashboard"));
    }

    #[test]
    fn test_convenience_wrappers() {
        let policy = AccessPolicy::default();
        let organizer = policy.authorizer(Some(RoleId::ORGANIZER));

        assert!(organizer.can_view(Module::Workshops));
        assert!(organizer.can_create(Module::Workshops));
        assert!(organizer.can_edit(Module::Workshops));
        assert!(!organizer.can_delete(Module::Workshops));
        assert!(!organizer.can_create(Module::Users));
    }

    #[test]
    fn test_named_lookups() {
        let policy = AccessPolicy::default();
        let staff = policy.authorizer(Some(RoleId::STAFF));

        assert!(staff.has_permission_named("asistencia", "registrar"));
        assert!(!staff.has_permission_named("asistencia", "eliminar"));
        assert!(!staff.has_permission_named("reportes", "ver"));
        assert!(!staff.has_permission_named("foros", "publicar"));
    }

    #[test]
    fn test_role_predicates() {
        let policy = AccessPolicy::default();

        assert!(policy.authorizer(Some(RoleId::ADMIN)).is_admin());
        assert!(policy.authorizer(Some(RoleId::ORGANIZER)).is_organizer());
        assert!(policy.authorizer(Some(RoleId::STAFF)).is_staff());
        assert!(policy.authorizer(Some(RoleId::PARTICIPANT)).is_participant());

        let unknown = policy.authorizer(Some(RoleId(12)));
        assert!(!unknown.is_admin() && !unknown.is_participant());
        assert!(unknown.current_role_permissions().is_none());
    }

    #[test]
    fn test_current_role_permissions_row() {
        let policy = AccessPolicy::default();
        let row = policy.authorizer(Some(RoleId::PARTICIPANT)).current_role_permissions().unwrap();

        assert!(row.allows(Module::Registrations, Action::Create));
        assert!(!row.allows(Module::Registrations, Action::ViewAllRegistrations));
    }
}
