//! Authenticated user record

use crate::rbac::RoleId;
use serde::{Deserialize, Serialize};

/// Whether a participant belongs to the hosting institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantKind {
    #[serde(rename = "I")]
    Internal,
    #[serde(rename = "E")]
    External,
}

/// User record as served by the identity endpoint
///
/// Unknown fields are kept in `extra` so that a record read from storage
/// and written back is unchanged. The id is read from `id_usuario`, or
/// from a plain `id` when that is all the record carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    #[serde(rename = "id_usuario")]
    pub id: u64,

    #[serde(rename = "nombre")]
    pub first_name: String,

    #[serde(rename = "apellido")]
    pub last_name: String,

    #[serde(rename = "correo")]
    pub email: String,

    #[serde(rename = "id_rol")]
    pub role_id: RoleId,

    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "colegio", default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParticipantKind>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Wire shape accepting either id field, or both
#[derive(Deserialize)]
struct UserRecord {
    id_usuario: Option<u64>,
    id: Option<serde_json::Value>,
    nombre: String,
    apellido: String,
    correo: String,
    id_rol: RoleId,
    #[serde(default)]
    telefono: Option<String>,
    #[serde(default)]
    colegio: Option<String>,
    #[serde(default)]
    foto: Option<String>,
    #[serde(default)]
    tipo: Option<ParticipantKind>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let mut extra = record.extra;
        let id = match (record.id_usuario, record.id) {
            (Some(id), plain) => {
                if let Some(plain) = plain {
                    extra.insert("id".to_string(), plain);
                }
                id
            }
            (None, Some(plain)) => plain.as_u64().ok_or("field `id` is not an unsigned integer")?,
            (None, None) => return Err("missing field `id_usuario`".to_string()),
        };

        Ok(Self {
            id,
            first_name: record.nombre,
            last_name: record.apellido,
            email: record.correo,
            role_id: record.id_rol,
            phone: record.telefono,
            institution: record.colegio,
            photo: record.foto,
            kind: record.tipo,
            extra,
        })
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_wire() {
        let user: User = serde_json::from_value(json!({
            "id_usuario": 7,
            "nombre": "Ana",
            "apellido": "Pérez",
            "correo": "ana@example.com",
            "id_rol": 4,
            "colegio": "CBTIS 12",
            "tipo": "E"
        }))
        .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.role_id, RoleId::PARTICIPANT);
        assert_eq!(user.institution.as_deref(), Some("CBTIS 12"));
        assert_eq!(user.kind, Some(ParticipantKind::External));
        assert_eq!(user.full_name(), "Ana Pérez");
    }

    #[test]
    fn test_plain_id_alias() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "nombre": "Luis",
            "apellido": "Soto",
            "correo": "luis@example.com",
            "id_rol": 1
        }))
        .unwrap();

        assert_eq!(user.id, 3);
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_both_id_fields() {
        let record = json!({
            "id": 3,
            "id_usuario": 3,
            "nombre": "Luis",
            "apellido": "Soto",
            "correo": "luis@example.com",
            "id_rol": 2
        });

        let user: User = serde_json::from_value(record.clone()).unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.role_id, RoleId::ORGANIZER);
        assert_eq!(serde_json::to_value(&user).unwrap(), record);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_value::<User>(json!({
            "nombre": "Luis",
            "apellido": "Soto",
            "correo": "luis@example.com",
            "id_rol": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_survive_storage() {
        let original = json!({
            "id_usuario": 7,
            "nombre": "Ana",
            "apellido": "Pérez",
            "correo": "ana@example.com",
            "id_rol": 4,
            "fecha_registro": "2024-03-01"
        });

        let user: User = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(user.extra.get("fecha_registro"), Some(&json!("2024-03-01")));
        assert_eq!(serde_json::to_value(&user).unwrap(), original);
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let result = serde_json::from_value::<User>(json!({
            "id_usuario": 7,
            "nombre": "Ana",
            "apellido": "Pérez",
            "correo": "ana@example.com"
        }));
        assert!(result.is_err());
    }
}
