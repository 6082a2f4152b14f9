//! Modules and actions permissions are scoped to
//!
//! Both enums render to (and parse from) the identifiers used by the web
//! client, e.g. `usuarios` / `gestionar_roles`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Functional area of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Module {
    #[serde(rename = "usuarios")]
    Users,
    #[serde(rename = "categorias")]
    Categories,
    #[serde(rename = "talleres")]
    Workshops,
    #[serde(rename = "competencias")]
    Competitions,
    #[serde(rename = "inscripciones")]
    Registrations,
    #[serde(rename = "asistencia")]
    Attendance,
    #[serde(rename = "diplomas")]
    Diplomas,
    #[serde(rename = "foros")]
    Forums,
    #[serde(rename = "dashboard")]
    Dashboard,
}

impl Module {
    pub const ALL: [Module; 9] = [
        Module::Users,
        Module::Categories,
        Module::Workshops,
        Module::Competitions,
        Module::Registrations,
        Module::Attendance,
        Module::Diplomas,
        Module::Forums,
        Module::Dashboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Users => "usuarios",
            Module::Categories => "categorias",
            Module::Workshops => "talleres",
            Module::Competitions => "competencias",
            Module::Registrations => "inscripciones",
            Module::Attendance => "asistencia",
            Module::Diplomas => "diplomas",
            Module::Forums => "foros",
            Module::Dashboard => "dashboard",
        }
    }
}

/// Operation within a module
///
/// Some actions only make sense for one module (`ExportData` on the
/// dashboard, `Moderate` on forums); the matrix simply has no `true` for
/// them elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "ver")]
    View,
    #[serde(rename = "crear")]
    Create,
    #[serde(rename = "editar")]
    Edit,
    #[serde(rename = "eliminar")]
    Delete,
    #[serde(rename = "gestionar_roles")]
    ManageRoles,
    #[serde(rename = "ver_participantes")]
    ViewParticipants,
    #[serde(rename = "gestionar_participantes")]
    ManageParticipants,
    /// `ver_todas`: every registration, not just the caller's own
    #[serde(rename = "ver_todas")]
    ViewAllRegistrations,
    /// `ver_todos`: every issued diploma
    #[serde(rename = "ver_todos")]
    ViewAllDiplomas,
    #[serde(rename = "registrar")]
    Record,
    #[serde(rename = "generar")]
    Generate,
    #[serde(rename = "editar_todos")]
    EditAny,
    #[serde(rename = "eliminar_todos")]
    DeleteAny,
    #[serde(rename = "moderar")]
    Moderate,
    #[serde(rename = "ver_estadisticas_completas")]
    ViewFullStatistics,
    #[serde(rename = "exportar_datos")]
    ExportData,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::ManageRoles,
        Action::ViewParticipants,
        Action::ManageParticipants,
        Action::ViewAllRegistrations,
        Action::ViewAllDiplomas,
        Action::Record,
        Action::Generate,
        Action::EditAny,
        Action::DeleteAny,
        Action::Moderate,
        Action::ViewFullStatistics,
        Action::ExportData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "ver",
            Action::Create => "crear",
            Action::Edit => "editar",
            Action::Delete => "eliminar",
            Action::ManageRoles => "gestionar_roles",
            Action::ViewParticipants => "ver_participantes",
            Action::ManageParticipants => "gestionar_participantes",
            Action::ViewAllRegistrations => "ver_todas",
            Action::ViewAllDiplomas => "ver_todos",
            Action::Record => "registrar",
            Action::Generate => "generar",
            Action::EditAny => "editar_todos",
            Action::DeleteAny => "eliminar_todos",
            Action::Moderate => "moderar",
            Action::ViewFullStatistics => "ver_estadisticas_completas",
            Action::ExportData => "exportar_datos",
        }
    }
}

/// Name that does not correspond to any module or action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {name}")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl FromStr for Module {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| UnknownName { kind: "module", name: s.to_string() })
    }
}

impl FromStr for Action {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownName { kind: "action", name: s.to_string() })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_parse_back() {
        for module in Module::ALL {
            assert_eq!(module.as_str().parse::<Module>(), Ok(module));
        }
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for module in Module::ALL {
            let json = serde_json::to_value(module).unwrap();
            assert_eq!(json, serde_json::Value::String(module.as_str().to_string()));
        }
        for action in Action::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, serde_json::Value::String(action.as_str().to_string()));
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        let err = "reportes".parse::<Module>().unwrap_err();
        assert_eq!(err.kind, "module");
        assert!("VER".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_similar_actions_stay_distinct() {
        assert_ne!("ver_todas".parse::<Action>(), "ver_todos".parse::<Action>());
    }
}
