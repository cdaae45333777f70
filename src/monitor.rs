//! Per-light brightness debounce.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::errors::Error;
use crate::events::{EventSink, MonitorEvent};
use crate::light::LightControl;
use crate::types::Brightness;

type Result<T> = std::result::Result<T, Error>;

/// Watches one light and writes its brightness back once a change has settled.
///
/// A change is any difference from the brightness seen on the previous check.
/// Every change restarts the settle timer, so the write only happens after the
/// brightness has stayed the same for longer than `settle_delay`. The value
/// written is whatever was read on the check where the timer ran out.
pub struct LightMonitor<'a, L: LightControl> {
    light: &'a L,
    last_brightness: Brightness,
    pending_change: bool,
    change_detected_at: Instant,
    settle_delay: Duration,
    sink: Arc<dyn EventSink>,
}

impl<'a, L: LightControl> LightMonitor<'a, L> {
    pub fn new(
        light: &'a L,
        initial: Brightness,
        settle_delay: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        LightMonitor {
            light,
            last_brightness: initial,
            pending_change: false,
            change_detected_at: Instant::now(),
            settle_delay,
            sink,
        }
    }

    /// Reads the light's current brightness and starts watching from there.
    pub async fn attach(
        light: &'a L,
        settle_delay: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let initial = light.brightness().await?;
        Ok(Self::new(light, initial, settle_delay, sink))
    }

    pub fn light(&self) -> &'a L {
        self.light
    }

    pub fn last_brightness(&self) -> Brightness {
        self.last_brightness
    }

    pub fn is_pending(&self) -> bool {
        self.pending_change
    }

    /// One poll step. Returns the brightness written back, if any.
    ///
    /// A failed read leaves the monitor as it was. A write is attempted at most
    /// once per settle window: if it fails the change is dropped, and only a
    /// new change starts another window.
    pub async fn check_and_update(&mut self) -> Result<Option<Brightness>> {
        let current = self.light.brightness().await?;
        let now = Instant::now();

        if current != self.last_brightness {
            self.sink.emit(&MonitorEvent::ChangeDetected {
                light: self.light.id(),
                name: self.light.name().to_string(),
                from: self.last_brightness,
                to: current,
            });
            self.pending_change = true;
            self.change_detected_at = now;
        }

        self.last_brightness = current;

        if self.pending_change && now.duration_since(self.change_detected_at) > self.settle_delay {
            self.pending_change = false;
            self.light.set_brightness(current).await?;
            self.sink.emit(&MonitorEvent::ChangeApplied {
                light: self.light.id(),
                name: self.light.name().to_string(),
                brightness: current,
            });
            return Ok(Some(current));
        }

        Ok(None)
    }
}
