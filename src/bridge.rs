//! Hue bridge REST client.

use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::{Value, json};

use crate::config::CredentialStore;
use crate::errors::Error;
use crate::light::{HueLight, LightDirectory};
use crate::response::{self, RESOURCE_NOT_AVAILABLE};
use crate::status::{LightInfo, LightState, StateUpdate};
use crate::types::LightId;

type Result<T> = std::result::Result<T, Error>;

/// An authenticated connection to one Hue bridge.
///
/// Cloning is cheap; clones share the underlying HTTP connection pool.
///
/// # Example
///
/// ```ignore
/// use tradfri_workaround::{Bridge, CredentialStore};
///
/// let mut store = CredentialStore::open(CredentialStore::default_path())?;
/// let bridge = Bridge::connect("192.168.1.2", &mut store).await?;
/// for (id, info) in bridge.lights().await? {
///     println!("{id}: {}", info.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Bridge {
    client: reqwest::Client,
    host: String,
    username: String,
}

impl Bridge {
    const TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEVICE_TYPE: &'static str = "tradfri-workaround#rust";

    /// Uses an already issued username without contacting the bridge.
    pub fn new(host: &str, username: &str) -> Result<Self> {
        Ok(Bridge {
            client: Self::http_client()?,
            host: host.to_string(),
            username: username.to_string(),
        })
    }

    /// Asks the bridge for a new username.
    ///
    /// Fails with [`Error::LinkButtonNotPressed`] unless the link button was
    /// pressed within the last 30 seconds.
    pub async fn register(host: &str, device_type: &str) -> Result<String> {
        let client = Self::http_client()?;
        let url = format!("http://{}/api", host);
        debug!("Registering {} with bridge {}", device_type, host);

        let body: Value = client
            .post(&url)
            .json(&json!({ "devicetype": device_type }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http("register", e))?
            .json()
            .await
            .map_err(|e| Error::http("register", e))?;

        response::successes(body)?
            .into_iter()
            .find_map(|v| v.get("username").and_then(Value::as_str).map(String::from))
            .ok_or_else(|| Error::unexpected("registration reply without username"))
    }

    /// Connects with the username stored for `host`, registering and saving a
    /// new one when there is none.
    pub async fn connect(host: &str, store: &mut CredentialStore) -> Result<Self> {
        if let Some(username) = store.username(host) {
            debug!("Using stored username for bridge {}", host);
            return Self::new(host, username);
        }

        info!("No username stored for bridge {}, registering", host);
        let username = Self::register(host, Self::DEVICE_TYPE).await?;
        store.insert(host, &username);
        store.save()?;
        info!("Registered with bridge {}, saved to {:?}", host, store.path());

        Self::new(host, &username)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// All lights known to the bridge, ordered by id.
    pub async fn lights(&self) -> Result<Vec<(LightId, LightInfo)>> {
        let body = response::resource(self.get("lights").await?)?;
        let lights: BTreeMap<LightId, LightInfo> =
            serde_json::from_value(body).map_err(Error::JsonLoad)?;
        Ok(lights.into_iter().collect())
    }

    pub async fn light(&self, id: LightId) -> Result<LightInfo> {
        let body = match response::resource(self.get(&format!("lights/{id}")).await?) {
            Err(Error::Bridge { kind, .. }) if kind == RESOURCE_NOT_AVAILABLE => {
                return Err(Error::LightNotFound(id));
            }
            other => other?,
        };
        serde_json::from_value(body).map_err(Error::JsonLoad)
    }

    pub async fn light_state(&self, id: LightId) -> Result<LightState> {
        Ok(self.light(id).await?.state)
    }

    /// Sends a state change.
    ///
    /// Attributes the bridge refuses (a light switched off answers error 201
    /// for `bri`) are logged as warnings and do not fail the call. A light that
    /// no longer exists is [`Error::LightNotFound`].
    pub async fn set_light_state(&self, id: LightId, update: &StateUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(update).map_err(Error::JsonDump)?;
        let reply = self.put(&format!("lights/{id}/state"), &body).await?;
        for result in response::results(reply)? {
            match result {
                Ok(_) => {}
                Err(e) if e.kind == RESOURCE_NOT_AVAILABLE => {
                    return Err(Error::LightNotFound(id));
                }
                Err(e) => warn!(
                    "Bridge refused {} for light {}: {} (error {})",
                    e.address, id, e.description, e.kind
                ),
            }
        }
        Ok(())
    }

    fn http_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| Error::http("client", e))
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}/api/{}/{}", self.host, self.username, path)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        debug!("GET /{}", path);
        self.client
            .get(self.url(path))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http("get", e))?
            .json()
            .await
            .map_err(|e| Error::http("get", e))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        debug!("PUT /{} {}", path, body);
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http("put", e))?
            .json()
            .await
            .map_err(|e| Error::http("put", e))
    }
}

impl LightDirectory for Bridge {
    type Light = HueLight;

    async fn list_lights(&self) -> Result<Vec<HueLight>> {
        Ok(self
            .lights()
            .await?
            .into_iter()
            .map(|(id, info)| HueLight::new(self.clone(), id, &info.name))
            .collect())
    }
}
