//! # tradfri_workaround
//!
//! Keeps brightness changes on IKEA Trådfri bulbs connected to a Philips Hue
//! bridge. The bulbs accept a new brightness from a remote or the app, but fall
//! back unless the value is written again once they have settled. This crate
//! polls the configured lights and, after a change has stayed put for a settle
//! delay, writes the brightness back.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tradfri_workaround::{
//!     Bridge, CredentialStore, LightDirectory, LightId, LogSink, MonitorConfig, PollDriver,
//!     shutdown_channel,
//! };
//!
//! async fn keep_brightness() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = CredentialStore::open(CredentialStore::default_path())?;
//!     let bridge = Bridge::connect("192.168.1.2", &mut store).await?;
//!     let lights = bridge.list_lights().await?;
//!
//!     let config = MonitorConfig::new(vec![LightId::new(3), LightId::new(5)]);
//!     let mut driver = PollDriver::new(&lights, &config, Arc::new(LogSink)).await?;
//!
//!     let (_shutdown, ctx) = shutdown_channel();
//!     driver.run(ctx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`LightMonitor`]: debounce state machine for one light
//! - [`PollDriver`]: checks every monitor, sleeps, repeats until cancelled
//! - [`EventSink`]: where monitor events go; [`LogSink`] forwards to `log`
//! - [`LightControl`] / [`LightDirectory`]: the light-control contract
//! - [`Bridge`] / [`HueLight`]: the Hue REST implementation of that contract
//!
//! ## Communication
//!
//! The bridge is reached over plain HTTP on the local network using the v1 REST
//! API. The first connection needs the link button on the bridge pressed; the
//! issued username is kept in a [`CredentialStore`].

mod bridge;
mod config;
mod driver;
mod errors;
mod events;
mod light;
#[cfg(test)]
mod mock;
mod monitor;
mod response;
mod status;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use config::{BridgeCredentials, CredentialStore, FailurePolicy, MonitorConfig};
pub use driver::{PollDriver, RunContext, ShutdownHandle, shutdown_channel};
pub use errors::Error;
pub use events::{EventSink, LogSink, MonitorEvent};
pub use light::{HueLight, LightControl, LightDirectory};
pub use monitor::LightMonitor;
pub use status::{LightInfo, LightState, StateUpdate};
pub use types::{Brightness, LightId};
