//! Full truth table of the standard permission matrix and route table

use congreso_core::rbac::{AccessPolicy, Action, Module, PermissionMatrix, RoleId, RouteMatching};

/// (module, action, [admin, organizer, staff, participant])
const TABLE: &[(&str, &str, [bool; 4])] = &[
    ("usuarios", "ver", [true, true, true, false]),
    ("usuarios", "crear", [true, false, false, false]),
    ("usuarios", "editar", [true, false, false, false]),
    ("usuarios", "eliminar", [true, false, false, false]),
    ("usuarios", "gestionar_roles", [true, false, false, false]),
    ("categorias", "ver", [true, true, true, true]),
    ("categorias", "crear", [true, true, false, false]),
    ("categorias", "editar", [true, true, false, false]),
    ("categorias", "eliminar", [true, false, false, false]),
    ("talleres", "ver", [true, true, true, true]),
    ("talleres", "crear", [true, true, false, false]),
    ("talleres", "editar", [true, true, false, false]),
    ("talleres", "eliminar", [true, false, false, false]),
    ("talleres", "ver_participantes", [true, true, true, false]),
    ("talleres", "gestionar_participantes", [true, true, false, false]),
    ("competencias", "ver", [true, true, true, true]),
    ("competencias", "crear", [true, true, false, false]),
    ("competencias", "editar", [true, true, false, false]),
    ("competencias", "eliminar", [true, false, false, false]),
    ("competencias", "ver_participantes", [true, true, true, false]),
    ("competencias", "gestionar_participantes", [true, true, false, false]),
    ("inscripciones", "ver_todas", [true, true, true, false]),
    ("inscripciones", "crear", [true, false, false, true]),
    ("inscripciones", "editar", [true, true, false, true]),
    ("inscripciones", "eliminar", [true, false, false, true]),
    ("asistencia", "ver", [true, true, true, false]),
    ("asistencia", "registrar", [true, true, true, false]),
    ("asistencia", "editar", [true, true, false, false]),
    ("asistencia", "eliminar", [true, false, false, false]),
    ("diplomas", "ver_todos", [true, true, false, false]),
    ("diplomas", "generar", [true, true, false, false]),
    ("diplomas", "eliminar", [true, false, false, false]),
    ("foros", "ver", [true, true, true, true]),
    ("foros", "crear", [true, true, false, true]),
    ("foros", "editar_todos", [true, false, false, false]),
    ("foros", "eliminar_todos", [true, false, false, false]),
    ("foros", "moderar", [true, true, true, false]),
    ("dashboard", "ver_estadisticas_completas", [true, true, false, false]),
    ("dashboard", "exportar_datos", [true, false, false, false]),
];

const ROLES: [RoleId; 4] = [RoleId::ADMIN, RoleId::ORGANIZER, RoleId::STAFF, RoleId::PARTICIPANT];

#[test]
fn every_tabulated_cell_matches() {
    let policy = AccessPolicy::default();

    for (module, action, expected) in TABLE {
        for (role, allowed) in ROLES.iter().zip(expected) {
            assert_eq!(
                policy.authorizer(Some(*role)).has_permission_named(module, action),
                *allowed,
                "role {} on {}.{}",
                role,
                module,
                action
            );
        }
    }
}

#[test]
fn table_covers_the_whole_matrix() {
    let matrix = PermissionMatrix::standard();
    assert!(matrix.is_complete());

    for role in ROLES {
        let row = matrix.row(role).unwrap();
        let cells: usize = Module::ALL
            .iter()
            .filter_map(|module| row.module(*module))
            .map(|permissions| permissions.actions().count())
            .sum();
        assert_eq!(cells, TABLE.len(), "role {}", role);
    }
}

#[test]
fn unknown_or_missing_roles_have_nothing() {
    let policy = AccessPolicy::default();

    for role in [None, Some(RoleId(0)), Some(RoleId(5)), Some(RoleId(99))] {
        let access = policy.authorizer(role);
        for module in Module::ALL {
            for action in Action::ALL {
                assert!(!access.has_permission(module, action), "{:?} {} {}", role, module, action);
            }
        }
        assert!(access.current_role_permissions().is_none());

        for path in ["/", "/login", "/registro", "/no-autorizado"] {
            assert!(access.can_access_route(path), "{:?} {}", role, path);
        }
        for path in ["/dashboard", "/admin", "/perfil", "/foros/3", "/talleres"] {
            assert!(!access.can_access_route(path), "{:?} {}", role, path);
        }
    }
}

#[test]
fn route_scenarios() {
    let policy = AccessPolicy::default();

    assert!(!policy.authorizer(Some(RoleId::STAFF)).can_access_route("/admin/usuarios"));
    assert!(policy.authorizer(Some(RoleId::ADMIN)).can_access_route("/admin/usuarios"));
    assert!(policy.authorizer(None).can_access_route("/login"));
    assert!(!policy.authorizer(None).can_access_route("/dashboard"));

    let organizer = policy.authorizer(Some(RoleId::ORGANIZER));
    assert!(organizer.can_access_route("/admin/talleres/7"));
    assert!(!organizer.can_access_route("/admin/usuarios"));

    let participant = policy.authorizer(Some(RoleId::PARTICIPANT));
    assert!(participant.can_access_route("/inscripciones?estado=activa"));
    assert!(!participant.can_access_route("/asistencia"));
}

#[test]
fn prefix_mode_keeps_string_matching() {
    let segment = AccessPolicy::standard_with(RouteMatching::Segment);
    let prefix = AccessPolicy::standard_with(RouteMatching::Prefix);

    assert!(!segment.authorizer(Some(RoleId::ADMIN)).can_access_route("/administrator"));
    assert!(prefix.authorizer(Some(RoleId::ADMIN)).can_access_route("/administrator"));

    // Both modes agree on ordinary paths
    for role in ROLES {
        for path in ["/dashboard", "/admin/usuarios", "/foros/12", "/perfil", "/login"] {
            assert_eq!(
                segment.authorizer(Some(role)).can_access_route(path),
                prefix.authorizer(Some(role)).can_access_route(path),
                "role {} path {}",
                role,
                path
            );
        }
    }
}

#[test]
fn role_predicates_are_exclusive() {
    let policy = AccessPolicy::default();

    for role in ROLES {
        let access = policy.authorizer(Some(role));
        let flags = [access.is_admin(), access.is_organizer(), access.is_staff(), access.is_participant()];
        assert_eq!(flags.iter().filter(|flag| **flag).count(), 1, "role {}", role);
    }

    let anonymous = policy.authorizer(None);
    assert!(!anonymous.is_admin() && !anonymous.is_participant());
}
