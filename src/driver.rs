//! Fixed-cadence polling over a set of light monitors.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::{FailurePolicy, MonitorConfig};
use crate::errors::Error;
use crate::events::{EventSink, MonitorEvent};
use crate::light::LightControl;
use crate::monitor::LightMonitor;

type Result<T> = std::result::Result<T, Error>;

/// Creates a linked shutdown handle and run context.
pub fn shutdown_channel() -> (ShutdownHandle, RunContext) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, RunContext { rx })
}

/// Stops every [`RunContext`] created from the same channel.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Cancellation state observed by [`PollDriver::run`].
///
/// If the handle is dropped without triggering, the context is never cancelled.
#[derive(Debug, Clone)]
pub struct RunContext {
    rx: watch::Receiver<bool>,
}

impl RunContext {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the shutdown handle is triggered.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives one [`LightMonitor`] per configured light at a fixed interval.
pub struct PollDriver<'a, L: LightControl> {
    monitors: Vec<LightMonitor<'a, L>>,
    poll_interval: Duration,
    failure_policy: FailurePolicy,
    sink: Arc<dyn EventSink>,
}

impl<'a, L: LightControl> PollDriver<'a, L> {
    /// Attaches a monitor to each configured light, in configuration order.
    ///
    /// Repeated ids get a single monitor. Ids with no matching light are
    /// reported as [`MonitorEvent::LightMissing`] and skipped; lights that are
    /// not configured are never touched.
    pub async fn new(
        lights: &'a [L],
        config: &MonitorConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        let mut monitors = Vec::with_capacity(config.targets.len());
        for &target in &config.targets {
            if !seen.insert(target) {
                continue;
            }
            match lights.iter().find(|l| l.id() == target) {
                Some(light) => {
                    let monitor =
                        LightMonitor::attach(light, config.settle_delay, Arc::clone(&sink)).await?;
                    monitors.push(monitor);
                }
                None => sink.emit(&MonitorEvent::LightMissing { light: target }),
            }
        }

        Ok(PollDriver {
            monitors,
            poll_interval: config.poll_interval,
            failure_policy: config.failure_policy,
            sink,
        })
    }

    pub fn monitors(&self) -> &[LightMonitor<'a, L>] {
        &self.monitors
    }

    /// Checks every monitor once.
    pub async fn tick(&mut self) -> Result<()> {
        for monitor in &mut self.monitors {
            let light = monitor.light();
            self.sink.emit(&MonitorEvent::Checking {
                light: light.id(),
                name: light.name().to_string(),
            });

            if let Err(err) = monitor.check_and_update().await {
                match self.failure_policy {
                    FailurePolicy::FailFast => return Err(err),
                    FailurePolicy::Isolate => self.sink.emit(&MonitorEvent::CheckFailed {
                        light: light.id(),
                        name: light.name().to_string(),
                        error: err.to_string(),
                    }),
                }
            }
        }
        Ok(())
    }

    /// Polls until `ctx` is cancelled.
    ///
    /// Returns `Ok(())` on cancellation, or the first error under
    /// [`FailurePolicy::FailFast`].
    pub async fn run(&mut self, mut ctx: RunContext) -> Result<()> {
        while !ctx.is_cancelled() {
            self.tick().await?;

            self.sink.emit(&MonitorEvent::Sleeping {
                interval: self.poll_interval,
            });
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        Ok(())
    }
}
