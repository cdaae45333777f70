//! The light-control contract the monitors run against, and its Hue implementation.

use std::future::Future;

use log::warn;

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::status::StateUpdate;
use crate::types::{Brightness, LightId};

type Result<T> = std::result::Result<T, Error>;

/// A single light whose brightness can be read and written.
///
/// Every call goes to the device; implementations do not cache.
pub trait LightControl: Send + Sync {
    fn id(&self) -> LightId;

    fn name(&self) -> &str;

    /// Current brightness as reported by the device.
    fn brightness(&self) -> impl Future<Output = Result<Brightness>> + Send;

    /// Writes a brightness value to the device.
    fn set_brightness(&self, value: Brightness) -> impl Future<Output = Result<()>> + Send;
}

/// Something that can enumerate the lights it controls.
pub trait LightDirectory: Send + Sync {
    type Light: LightControl;

    fn list_lights(&self) -> impl Future<Output = Result<Vec<Self::Light>>> + Send;
}

/// A light reached through a Hue bridge.
///
/// # Example
///
/// ```ignore
/// use tradfri_workaround::{Bridge, HueLight, LightControl, LightId};
///
/// let bridge = Bridge::new("192.168.1.2", "username")?;
/// let light = HueLight::new(bridge, LightId::new(3), "Hallway");
/// let bri = light.brightness().await?;
/// light.set_brightness(bri).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HueLight {
    bridge: Bridge,
    id: LightId,
    name: String,
}

impl HueLight {
    pub fn new(bridge: Bridge, id: LightId, name: &str) -> Self {
        HueLight {
            bridge,
            id,
            name: name.to_string(),
        }
    }
}

impl LightControl for HueLight {
    fn id(&self) -> LightId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn brightness(&self) -> Result<Brightness> {
        self.bridge
            .light_state(self.id)
            .await?
            .bri
            .ok_or_else(|| Error::unexpected(format!("light {} has no brightness", self.id)))
    }

    async fn set_brightness(&self, value: Brightness) -> Result<()> {
        if !value.is_valid() {
            warn!(
                "Writing out-of-range brightness {} to light \"{}\"",
                value, self.name
            );
        }
        self.bridge
            .set_light_state(self.id, &StateUpdate::brightness(value))
            .await
    }
}
