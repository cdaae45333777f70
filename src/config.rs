//! Monitor settings and the bridge credential file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::types::LightId;

type Result<T> = std::result::Result<T, Error>;

/// What the driver does when a light fails to read or write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the loop and return the error.
    #[default]
    FailFast,
    /// Report the error and carry on with the next light.
    Isolate,
}

/// Settings for a [`PollDriver`](crate::PollDriver).
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Light ids to watch, in the order they are checked.
    pub targets: Vec<LightId>,
    pub poll_interval: Duration,
    /// How long a brightness change must stay put before it is written back.
    pub settle_delay: Duration,
    pub failure_policy: FailurePolicy,
}

impl MonitorConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1200);

    pub fn new(targets: Vec<LightId>) -> Self {
        MonitorConfig {
            targets,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Username issued by a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCredentials {
    pub username: String,
}

/// JSON file holding one username per bridge host.
///
/// ```json
/// { "192.168.1.2": { "username": "83b7780291a6ceffbe0bd049104df" } }
/// ```
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    bridges: BTreeMap<String, BridgeCredentials>,
}

impl CredentialStore {
    const FILE_NAME: &'static str = ".tradfri-workaround.json";

    /// `$HOME/.tradfri-workaround.json`, or the working directory when `HOME` is unset.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(Self::FILE_NAME)
    }

    /// Loads the store; a missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bridges = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(Error::JsonLoad)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No credential file at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => return Err(Error::config(&path, e)),
        };
        Ok(CredentialStore { path, bridges })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn username(&self, host: &str) -> Option<&str> {
        self.bridges.get(host).map(|c| c.username.as_str())
    }

    pub fn insert(&mut self, host: &str, username: &str) {
        self.bridges.insert(
            host.to_string(),
            BridgeCredentials {
                username: username.to_string(),
            },
        );
    }

    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.bridges).map_err(Error::JsonDump)?;
        fs::write(&self.path, contents).map_err(|e| Error::config(&self.path, e))
    }
}
