//! Role identifiers and display metadata
//!
//! Authorization is keyed purely by the numeric [`RoleId`]. Names and
//! descriptions served by the remote roles endpoint ([`RoleInfo`]) are
//! labels for the UI and are never consulted by the permission checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric role identifier as assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u32);

impl RoleId {
    pub const ADMIN: RoleId = RoleId(1);
    pub const ORGANIZER: RoleId = RoleId(2);
    pub const STAFF: RoleId = RoleId(3);
    pub const PARTICIPANT: RoleId = RoleId(4);

    /// Raw numeric value
    pub fn get(self) -> u32 {
        self.0
    }

    /// The known role this id maps to, if any
    pub fn known(self) -> Option<KnownRole> {
        KnownRole::from_id(self)
    }
}

impl From<u32> for RoleId {
    fn from(id: u32) -> Self {
        RoleId(id)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roles the system can assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownRole {
    Administrator,
    Organizer,
    Staff,
    Participant,
}

impl KnownRole {
    /// Every assignable role, in id order
    pub const ALL: [KnownRole; 4] =
        [KnownRole::Administrator, KnownRole::Organizer, KnownRole::Staff, KnownRole::Participant];

    pub fn id(self) -> RoleId {
        match self {
            KnownRole::Administrator => RoleId::ADMIN,
            KnownRole::Organizer => RoleId::ORGANIZER,
            KnownRole::Staff => RoleId::STAFF,
            KnownRole::Participant => RoleId::PARTICIPANT,
        }
    }

    pub fn from_id(id: RoleId) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    /// Fallback label used when the roles endpoint is unavailable
    pub fn default_name(self) -> &'static str {
        match self {
            KnownRole::Administrator => "Administrador",
            KnownRole::Organizer => "Organizador",
            KnownRole::Staff => "Staff",
            KnownRole::Participant => "Participante",
        }
    }
}

/// Role record returned by `GET /roles`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    #[serde(rename = "id_rol")]
    pub id: RoleId,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Display labels for roles
///
/// Built from the remote roles listing. Lookups fall back to the built-in
/// names of [`KnownRole`] so a failed fetch never leaves a role unlabeled.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    roles: Vec<RoleInfo>,
}

impl RoleDirectory {
    pub fn new(roles: Vec<RoleInfo>) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &[RoleInfo] {
        &self.roles
    }

    pub fn get(&self, id: RoleId) -> Option<&RoleInfo> {
        self.roles.iter().find(|role| role.id == id)
    }

    /// Human-readable label for a role id
    pub fn label(&self, id: RoleId) -> Option<&str> {
        self.get(id)
            .map(|role| role.name.as_str())
            .or_else(|| id.known().map(KnownRole::default_name))
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
