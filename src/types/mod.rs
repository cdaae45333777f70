//! Value types shared by the bridge client and the monitors.

mod brightness;
mod light_id;

pub use brightness::Brightness;
pub use light_id::LightId;
