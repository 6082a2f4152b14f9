//! Static permission matrix: role → module → action → bool
//!
//! Closed world: anything not recorded as `true` is denied. A role that is
//! not in the matrix, a module that a row lacks, and an action a module
//! lacks all answer `false`. Rows are self-contained; there is no
//! inheritance between roles.

use super::permissions::{Action, Module};
use super::roles::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Declares one role's row module by module.
///
/// ```ignore
/// let row = role_row! {
///     Users => { View: true, Create: false },
///     Forums => { View: true },
/// };
/// ```
macro_rules! role_row {
    ($($module:ident => { $($action:ident : $allowed:expr),* $(,)? }),* $(,)?) => {{
        let mut row = $crate::rbac::RolePermissions::new();
        $(
            row.set_module(
                $crate::rbac::Module::$module,
                [$(($crate::rbac::Action::$action, $allowed)),*],
            );
        )*
        row
    }};
}

/// Grants for a single module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePermissions {
    actions: BTreeMap<Action, bool>,
}

impl ModulePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `action` is granted; absent actions are denied
    pub fn allows(&self, action: Action) -> bool {
        self.actions.get(&action).copied().unwrap_or(false)
    }

    pub fn set(&mut self, action: Action, allowed: bool) {
        self.actions.insert(action, allowed);
    }

    /// Actions with an explicit entry, granted or not
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, bool)> + '_ {
        self.actions.iter().map(|(action, allowed)| (*action, *allowed))
    }
}

impl<I: IntoIterator<Item = (Action, bool)>> From<I> for ModulePermissions {
    fn from(entries: I) -> Self {
        Self { actions: entries.into_iter().collect() }
    }
}

/// One role's complete row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePermissions {
    modules: BTreeMap<Module, ModulePermissions>,
}

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grants for `module`
    pub fn set_module(
        &mut self,
        module: Module,
        entries: impl IntoIterator<Item = (Action, bool)>,
    ) {
        self.modules.insert(module, ModulePermissions::from(entries));
    }

    pub fn module(&self, module: Module) -> Option<&ModulePermissions> {
        self.modules.get(&module)
    }

    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.modules.get(&module).is_some_and(|grants| grants.allows(action))
    }

    pub fn modules(&self) -> impl Iterator<Item = (Module, &ModulePermissions)> + '_ {
        self.modules.iter().map(|(module, grants)| (*module, grants))
    }

    fn keys(&self) -> BTreeSet<(Module, Action)> {
        self.modules
            .iter()
            .flat_map(|(module, grants)| grants.actions().map(move |action| (*module, action)))
            .collect()
    }
}

/// The full authorization table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    rows: BTreeMap<RoleId, RolePermissions>,
}

lazy_static::lazy_static! {
    static ref STANDARD_MATRIX: PermissionMatrix = PermissionMatrix::new([
        (RoleId::ADMIN, administrator_row()),
        (RoleId::ORGANIZER, organizer_row()),
        (RoleId::STAFF, staff_row()),
        (RoleId::PARTICIPANT, participant_row()),
    ]);
}

impl PermissionMatrix {
    /// Build a matrix and complete it
    ///
    /// Every (module, action) pair that appears in any row is added as
    /// `false` to the rows that lack it, so all rows share one shape.
    pub fn new(rows: impl IntoIterator<Item = (RoleId, RolePermissions)>) -> Self {
        let mut rows: BTreeMap<RoleId, RolePermissions> = rows.into_iter().collect();

        let all_keys: BTreeSet<(Module, Action)> =
            rows.values().flat_map(RolePermissions::keys).collect();

        for row in rows.values_mut() {
            for (module, action) in &all_keys {
                let grants = row.modules.entry(*module).or_default();
                grants.actions.entry(*action).or_insert(false);
            }
        }

        Self { rows }
    }

    /// The conference matrix compiled into the crate
    pub fn standard() -> &'static PermissionMatrix {
        &STANDARD_MATRIX
    }

    pub fn row(&self, role: RoleId) -> Option<&RolePermissions> {
        self.rows.get(&role)
    }

    pub fn allows(&self, role: RoleId, module: Module, action: Action) -> bool {
        self.rows.get(&role).is_some_and(|row| row.allows(module, action))
    }

    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.rows.keys().copied()
    }

    pub fn contains_role(&self, role: RoleId) -> bool {
        self.rows.contains_key(&role)
    }

    /// True when every row carries exactly the same (module, action) keys
    pub fn is_complete(&self) -> bool {
        let mut shapes = self.rows.values().map(RolePermissions::keys);
        match shapes.next() {
            Some(first) => shapes.all(|shape| shape == first),
            None => true,
        }
    }
}

fn administrator_row() -> RolePermissions {
    role_row! {
        Users => { View: true, Create: true, Edit: true, Delete: true, ManageRoles: true },
        Categories => { View: true, Create: true, Edit: true, Delete: true },
        Workshops => {
            View: true, Create: true, Edit: true, Delete: true,
            ViewParticipants: true, ManageParticipants: true,
        },
        Competitions => {
            View: true, Create: true, Edit: true, Delete: true,
            ViewParticipants: true, ManageParticipants: true,
        },
        Registrations => { ViewAllRegistrations: true, Create: true, Edit: true, Delete: true },
        Attendance => { View: true, Record: true, Edit: true, Delete: true },
        Diplomas => { ViewAllDiplomas: true, Generate: true, Delete: true },
        Forums => { View: true, Create: true, EditAny: true, DeleteAny: true, Moderate: true },
        Dashboard => { ViewFullStatistics: true, ExportData: true },
    }
}

fn organizer_row() -> RolePermissions {
    role_row! {
        Users => { View: true, Create: false, Edit: false, Delete: false, ManageRoles: false },
        Categories => { View: true, Create: true, Edit: true, Delete: false },
        Workshops => {
            View: true, Create: true, Edit: true, Delete: false,
            ViewParticipants: true, ManageParticipants: true,
        },
        Competitions => {
            View: true, Create: true, Edit: true, Delete: false,
            ViewParticipants: true, ManageParticipants: true,
        },
        Registrations => { ViewAllRegistrations: true, Create: false, Edit: true, Delete: false },
        Attendance => { View: true, Record: true, Edit: true, Delete: false },
        Diplomas => { ViewAllDiplomas: true, Generate: true, Delete: false },
        Forums => { View: true, Create: true, EditAny: false, DeleteAny: false, Moderate: true },
        Dashboard => { ViewFullStatistics: true, ExportData: false },
    }
}

fn staff_row() -> RolePermissions {
    role_row! {
        Users => { View: true, Create: false, Edit: false, Delete: false, ManageRoles: false },
        Categories => { View: true, Create: false, Edit: false, Delete: false },
        Workshops => {
            View: true, Create: false, Edit: false, Delete: false,
            ViewParticipants: true, ManageParticipants: false,
        },
        Competitions => {
            View: true, Create: false, Edit: false, Delete: false,
            ViewParticipants: true, ManageParticipants: false,
        },
        Registrations => { ViewAllRegistrations: true, Create: false, Edit: false, Delete: false },
        Attendance => { View: true, Record: true, Edit: false, Delete: false },
        Diplomas => { ViewAllDiplomas: false, Generate: false, Delete: false },
        Forums => { View: true, Create: false, EditAny: false, DeleteAny: false, Moderate: true },
        Dashboard => { ViewFullStatistics: false, ExportData: false },
    }
}

fn participant_row() -> RolePermissions {
    role_row! {
        Users => { View: false, Create: false, Edit: false, Delete: false, ManageRoles: false },
        Categories => { View: true, Create: false, Edit: false, Delete: false },
        Workshops => {
            View: true, Create: false, Edit: false, Delete: false,
            ViewParticipants: false, ManageParticipants: false,
        },
        Competitions => {
            View: true, Create: false, Edit: false, Delete: false,
            ViewParticipants: false, ManageParticipants: false,
        },
        Registrations => { ViewAllRegistrations: false, Create: true, Edit: true, Delete: true },
        Attendance => { View: false, Record: false, Edit: false, Delete: false },
        Diplomas => { ViewAllDiplomas: false, Generate: false, Delete: false },
        Forums => { View: true, Create: true, EditAny: false, DeleteAny: false, Moderate: false },
        Dashboard => { ViewFullStatistics: false, ExportData: false },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_matrix_is_complete() {
        let matrix = PermissionMatrix::standard();
        assert!(matrix.is_complete());
        assert_eq!(matrix.roles().count(), 4);
        for role in [RoleId::ADMIN, RoleId::ORGANIZER, RoleId::STAFF, RoleId::PARTICIPANT] {
            assert!(matrix.contains_role(role));
            assert_eq!(matrix.row(role).map(|row| row.modules().count()), Some(9));
        }
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let matrix = PermissionMatrix::standard();
        for module in Module::ALL {
            for action in Action::ALL {
                assert!(!matrix.allows(RoleId(0), module, action));
                assert!(!matrix.allows(RoleId(7), module, action));
            }
        }
    }

    #[test]
    fn test_actions_outside_a_module_are_denied() {
        let matrix = PermissionMatrix::standard();
        // Admin has every listed action, but `moderar` is not a users action
        assert!(!matrix.allows(RoleId::ADMIN, Module::Users, Action::Moderate));
        assert!(!matrix.allows(RoleId::ADMIN, Module::Dashboard, Action::View));
    }

    #[test]
    fn test_completion_fills_missing_entries_with_false() {
        let mut editor = RolePermissions::new();
        editor.set_module(Module::Forums, [(Action::View, true), (Action::Moderate, true)]);

        let mut reader = RolePermissions::new();
        reader.set_module(Module::Categories, [(Action::View, true)]);

        let matrix = PermissionMatrix::new([(RoleId(10), editor), (RoleId(11), reader)]);

        assert!(matrix.is_complete());
        let reader = matrix.row(RoleId(11)).unwrap();
        assert_eq!(
            reader.module(Module::Forums).map(|m| m.iter().collect::<Vec<_>>()),
            Some(vec![(Action::View, false), (Action::Moderate, false)])
        );
        assert!(matrix.allows(RoleId(10), Module::Forums, Action::Moderate));
        assert!(!matrix.allows(RoleId(10), Module::Categories, Action::View));
    }

    #[test]
    fn test_row_serializes_with_wire_names() {
        let row = PermissionMatrix::standard().row(RoleId::STAFF).unwrap();
        let json = serde_json::to_value(row).unwrap();

        assert_eq!(json["asistencia"]["registrar"], true);
        assert_eq!(json["asistencia"]["editar"], false);
        assert_eq!(json["foros"]["moderar"], true);
        assert_eq!(json["dashboard"]["exportar_datos"], false);
    }

    #[test]
    fn test_empty_matrix_denies_everything() {
        let matrix = PermissionMatrix::default();
        assert!(matrix.is_complete());
        assert!(!matrix.allows(RoleId::ADMIN, Module::Users, Action::View));
    }
}
