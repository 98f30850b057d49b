use serde::Deserialize;
use serde::de::Error;

use super::managererror::{
    parse_json_value,
    ManagerError
};

/// The `name` field every configuration entry carries.
#[derive(Clone, Deserialize)]
pub struct NamedJsonObject {
    name: String,
}

impl NamedJsonObject {
    pub fn from_json(json_value: &serde_json::Value) -> Result<NamedJsonObject, ManagerError> {
        let named: NamedJsonObject = parse_json_value(json_value.clone())?;
        if named.name.trim().is_empty() {
            return Err(ManagerError::Json(serde_json::Error::custom("entry name must not be empty")));
        }
        Ok(named)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
