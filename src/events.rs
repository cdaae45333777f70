//! Events emitted by the monitors and the poll driver.

use std::fmt;
use std::time::Duration;

use log::Level;

use crate::types::{Brightness, LightId};

/// Something worth reporting happened while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Brightness differs from the previous tick.
    ChangeDetected {
        light: LightId,
        name: String,
        from: Brightness,
        to: Brightness,
    },
    /// A settled brightness was written back to the light.
    ChangeApplied {
        light: LightId,
        name: String,
        brightness: Brightness,
    },
    /// A light is about to be checked.
    Checking { light: LightId, name: String },
    /// All lights checked; the driver is going to sleep.
    Sleeping { interval: Duration },
    /// A configured light id does not exist on the bridge.
    LightMissing { light: LightId },
    /// Checking a light failed and the driver moved on.
    CheckFailed {
        light: LightId,
        name: String,
        error: String,
    },
}

impl MonitorEvent {
    pub fn level(&self) -> Level {
        match self {
            MonitorEvent::ChangeDetected { .. } | MonitorEvent::ChangeApplied { .. } => {
                Level::Info
            }
            MonitorEvent::Checking { .. } | MonitorEvent::Sleeping { .. } => Level::Debug,
            MonitorEvent::LightMissing { .. } | MonitorEvent::CheckFailed { .. } => Level::Warn,
        }
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEvent::ChangeDetected { name, from, to, .. } => write!(
                f,
                "Brightness change detected for light \"{name}\": {from} -> {to}"
            ),
            MonitorEvent::ChangeApplied {
                name, brightness, ..
            } => write!(f, "Brightness for light \"{name}\" set to {brightness}"),
            MonitorEvent::Checking { name, .. } => write!(f, "Checking light {name}"),
            MonitorEvent::Sleeping { interval } => {
                write!(f, "Sleeping for {} seconds...", interval.as_secs_f64())
            }
            MonitorEvent::LightMissing { light } => {
                write!(f, "Light {light} not found on the bridge, not monitoring it")
            }
            MonitorEvent::CheckFailed { name, error, .. } => {
                write!(f, "Checking light \"{name}\" failed: {error}")
            }
        }
    }
}

/// Receives monitor events.
///
/// Injected into the driver and every monitor so emission does not depend on
/// how (or whether) logging was set up.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &MonitorEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    const TARGET: &'static str = "tradfri_workaround";
}

impl EventSink for LogSink {
    fn emit(&self, event: &MonitorEvent) {
        log::log!(target: Self::TARGET, event.level(), "{}", event);
    }
}
