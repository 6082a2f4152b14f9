use crate::features::world::CongresoWorld;
use congreso_core::rbac::{Action, Module, RouteMatching, PUBLIC_PATHS};
use cucumber::{given, then, when};

const PRIVATE_PATHS: [&str; 6] =
    ["/dashboard", "/admin", "/admin/usuarios", "/perfil", "/talleres", "/foros/1"];

#[given(expr = "a user with role {int}")]
async fn given_role(world: &mut CongresoWorld, role: u32) {
    world.role = Some(role.into());
}

#[given(expr = "an anonymous visitor")]
async fn given_anonymous(world: &mut CongresoWorld) {
    world.role = None;
}

#[given(expr = "prefix route matching")]
async fn given_prefix_matching(world: &mut CongresoWorld) {
    world.matching = RouteMatching::Prefix;
}

#[when(expr = "they ask for {string} on {string}")]
async fn when_ask(world: &mut CongresoWorld, action: String, module: String) {
    let answer = world.with_authorizer(|access| access.has_permission_named(&module, &action));
    world.answer = Some(answer);
}

#[then(expr = "the answer is {word}")]
async fn then_answer(world: &mut CongresoWorld, expected: String) {
    let expected = match expected.as_str() {
        "yes" => true,
        "no" => false,
        other => panic!("answer must be yes or no, got {}", other),
    };
    assert_eq!(world.answer, Some(expected));
}

#[then(expr = "route {string} is reachable")]
async fn then_reachable(world: &mut CongresoWorld, path: String) {
    assert!(world.with_authorizer(|access| access.can_access_route(&path)), "{} should be reachable", path);
}

#[then(expr = "route {string} is not reachable")]
async fn then_not_reachable(world: &mut CongresoWorld, path: String) {
    assert!(!world.with_authorizer(|access| access.can_access_route(&path)), "{} should be blocked", path);
}

#[then(expr = "every permission is denied")]
async fn then_all_denied(world: &mut CongresoWorld) {
    world.with_authorizer(|access| {
        for module in Module::ALL {
            for action in Action::ALL {
                assert!(!access.has_permission(module, action), "{}.{} granted", module, action);
            }
        }
        assert!(access.current_role_permissions().is_none());
    });
}

#[then(expr = "only public routes are reachable")]
async fn then_only_public(world: &mut CongresoWorld) {
    world.with_authorizer(|access| {
        for path in PUBLIC_PATHS {
            assert!(access.can_access_route(path), "{} should be public", path);
        }
        for path in PRIVATE_PATHS {
            assert!(!access.can_access_route(path), "{} should be blocked", path);
        }
    });
}
