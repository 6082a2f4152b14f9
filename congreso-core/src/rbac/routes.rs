//! Route reachability per role
//!
//! A path is reachable when it is one of the public paths, or when the
//! caller has a role and one of that role's allowed prefixes covers it.

use super::roles::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// How an allowed prefix is compared with a requested path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMatching {
    /// Whole `/`-separated segments must match; `/admin` does not cover
    /// `/adminx`. Query strings, fragments and trailing slashes are ignored.
    #[default]
    Segment,

    /// Plain `starts_with`, kept for parity with the web client.
    /// Known to over-match (`/admin` covers `/administrator`).
    Prefix,
}

impl FromStr for RouteMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "segment" => Ok(RouteMatching::Segment),
            "prefix" => Ok(RouteMatching::Prefix),
            other => Err(format!("unknown route matching mode: {}", other)),
        }
    }
}

/// Paths anyone may open, authenticated or not
pub const PUBLIC_PATHS: [&str; 4] = ["/", "/login", "/registro", "/no-autorizado"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessTable {
    allowed: BTreeMap<RoleId, Vec<String>>,
    public: BTreeSet<String>,
    matching: RouteMatching,
}

lazy_static::lazy_static! {
    static ref STANDARD_ROUTES: RouteAccessTable = RouteAccessTable::standard_with(RouteMatching::Segment);
}

impl RouteAccessTable {
    /// Empty table: only the given public paths are reachable
    pub fn new(public: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: BTreeMap::new(),
            public: public.into_iter().map(Into::into).collect(),
            matching: RouteMatching::default(),
        }
    }

    /// Allow `role` to reach everything under each of `prefixes`
    pub fn with_role(
        mut self,
        role: RoleId,
        prefixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed.entry(role).or_default().extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn with_matching(mut self, matching: RouteMatching) -> Self {
        self.matching = matching;
        self
    }

    /// The conference route table with segment-aware matching
    pub fn standard() -> &'static RouteAccessTable {
        &STANDARD_ROUTES
    }

    /// The conference route table with an explicit matching mode
    pub fn standard_with(matching: RouteMatching) -> Self {
        Self::new(PUBLIC_PATHS)
            .with_role(
                RoleId::ADMIN,
                ["/dashboard", "/admin", "/asistencia", "/diplomas", "/foros", "/perfil"],
            )
            .with_role(
                RoleId::ORGANIZER,
                [
                    "/dashboard",
                    "/admin/categorias",
                    "/admin/talleres",
                    "/admin/competencias",
                    "/admin/inscripciones",
                    "/asistencia",
                    "/diplomas",
                    "/foros",
                    "/perfil",
                ],
            )
            .with_role(RoleId::STAFF, ["/dashboard", "/asistencia", "/foros"])
            .with_role(
                RoleId::PARTICIPANT,
                [
                    "/dashboard",
                    "/talleres",
                    "/competencias",
                    "/inscripciones",
                    "/diplomas",
                    "/foros",
                    "/perfil",
                ],
            )
            .with_matching(matching)
    }

    pub fn matching(&self) -> RouteMatching {
        self.matching
    }

    pub fn allowed_prefixes(&self, role: RoleId) -> &[String] {
        self.allowed.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_public(&self, path: &str) -> bool {
        match self.matching {
            RouteMatching::Prefix => self.public.contains(path),
            RouteMatching::Segment => {
                let wanted = normalize(path);
                self.public.iter().any(|public| normalize(public) == wanted)
            }
        }
    }

    /// Whether `role` (or an anonymous caller when `None`) may open `path`
    pub fn can_access(&self, role: Option<RoleId>, path: &str) -> bool {
        if self.is_public(path) {
            return true;
        }

        let Some(role) = role else {
            return false;
        };

        self.allowed_prefixes(role).iter().any(|prefix| self.covers(prefix, path))
    }

    fn covers(&self, prefix: &str, path: &str) -> bool {
        match self.matching {
            RouteMatching::Prefix => path.starts_with(prefix),
            RouteMatching::Segment => {
                let prefix = segments(prefix);
                let path = segments(path);
                path.len() >= prefix.len() && path.iter().zip(&prefix).all(|(a, b)| a == b)
            }
        }
    }
}

impl Default for RouteAccessTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

fn segments(path: &str) -> Vec<&str> {
    strip_query(path).split('/').filter(|segment| !segment.is_empty()).collect()
}
