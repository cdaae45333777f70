//! Light attributes and state as exchanged with the bridge.

use serde::{Deserialize, Serialize};

use crate::types::Brightness;

/// Attributes of a light as listed by `GET /api/<user>/lights`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub light_type: String,
    #[serde(default)]
    pub modelid: String,
    #[serde(default)]
    pub manufacturername: String,
    #[serde(default)]
    pub state: LightState,
}

impl LightInfo {
    /// Name followed by whatever of type, maker and model the bridge reported.
    pub fn summary(&self) -> String {
        let model = [self.manufacturername.as_str(), self.modelid.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let details: Vec<&str> = [self.light_type.as_str(), model.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        if details.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, details.join(", "))
        }
    }
}

/// Current state of a light.
///
/// Only the fields the monitors care about; the bridge sends many more.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightState {
    #[serde(default)]
    pub on: bool,
    /// Missing on on/off-only plugs.
    pub bri: Option<Brightness>,
    #[serde(default)]
    pub reachable: bool,
}

/// Body of `PUT /api/<user>/lights/<id>/state`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StateUpdate {
    pub bri: Option<Brightness>,
}

impl StateUpdate {
    pub fn brightness(value: Brightness) -> Self {
        StateUpdate { bri: Some(value) }
    }

    pub fn is_empty(&self) -> bool {
        self.bri.is_none()
    }
}
