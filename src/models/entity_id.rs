//! Identificadores de entidades de la API de flota
//!
//! La API devuelve ids numéricos o cadenas opacas según el endpoint.
//! Las cadenas numéricas (`"7"`) se normalizan a enteros para que
//! `vehicle.id = 7` y `vehicleId = "7"` resuelvan al mismo vehículo.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Integer(n) => EntityId::Number(n),
            WireId::Float(f) if f.is_finite() && f.fract() == 0.0 => EntityId::Number(f as i64),
            WireId::Float(f) => EntityId::Text(f.to_string()),
            WireId::Text(s) => EntityId::from(s),
        })
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(value),
        }
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::from(value.to_string())
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_normalized() {
        let from_number: EntityId = serde_json::from_str("7").unwrap();
        let from_text: EntityId = serde_json::from_str("\"7\"").unwrap();
        let from_float: EntityId = serde_json::from_str("7.0").unwrap();

        assert_eq!(from_number, EntityId::Number(7));
        assert_eq!(from_text, from_number);
        assert_eq!(from_float, from_number);
    }

    #[test]
    fn test_opaque_ids_roundtrip_as_text() {
        let id: EntityId = serde_json::from_str("\"veh-001\"").unwrap();
        assert_eq!(id, EntityId::Text("veh-001".to_string()));
        assert_eq!(id.to_string(), "veh-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"veh-001\"");
        assert_eq!(serde_json::to_string(&EntityId::Number(12)).unwrap(), "12");
    }
}
