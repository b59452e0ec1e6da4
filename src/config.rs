//! Map Configuration
//!
//! Loaded from `config.json` next to `index.html`; every field has a default
//! so a missing or partial file still yields a working map.

use gloo_net::http::Request;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pin_sync::{PinError, PinId};
use serde::{Deserialize, Serialize};

pub const CONFIG_URL: &str = "config.json";

/// Push ids use `-` and `_`; keep them readable in URLs
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Map image and store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Static map image drawn as the only layer
    pub image_url: String,
    pub image_width: f64,
    pub image_height: f64,
    pub min_zoom: f64,
    pub store: StoreConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            image_url: "assets/image.png".to_string(),
            image_width: 2048.0,
            image_height: 1741.0,
            min_zoom: -2.0,
            store: StoreConfig::default(),
        }
    }
}

impl MapConfig {
    /// Image bounds as `[[0, 0], [height, width]]`
    pub fn bounds(&self) -> [[f64; 2]; 2] {
        [[0.0, 0.0], [self.image_height, self.image_width]]
    }
}

/// Realtime database location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
    /// Collection holding the pins
    pub collection: String,
    /// Database secret or ID token, sent as `?auth=`
    pub auth_token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "https://wild-west-map-default-rtdb.firebaseio.com".to_string(),
            collection: "pins".to_string(),
            auth_token: None,
        }
    }
}

impl StoreConfig {
    fn base(&self) -> &str {
        self.database_url.trim_end_matches('/')
    }

    fn collection_path(&self) -> &str {
        self.collection.trim_matches('/')
    }

    fn with_auth(&self, url: String) -> String {
        match &self.auth_token {
            Some(token) if !token.is_empty() => {
                format!("{}?auth={}", url, utf8_percent_encode(token, URL_COMPONENT))
            }
            _ => url,
        }
    }

    /// URL of the whole collection (stream subscription, push)
    pub fn collection_url(&self) -> String {
        self.with_auth(format!("{}/{}.json", self.base(), self.collection_path()))
    }

    /// URL of one pin record (update, delete)
    pub fn pin_url(&self, id: &PinId) -> String {
        self.with_auth(format!(
            "{}/{}/{}.json",
            self.base(),
            self.collection_path(),
            utf8_percent_encode(id.as_str(), URL_COMPONENT)
        ))
    }
}

/// Parse a config file body
pub fn parse_config(text: &str) -> Result<MapConfig, PinError> {
    serde_json::from_str(text).map_err(|e| PinError::Config(e.to_string()))
}

async fn fetch_config(url: &str) -> Result<MapConfig, PinError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| PinError::Config(e.to_string()))?;
    if !resp.ok() {
        return Err(PinError::Config(format!("{} returned {}", url, resp.status())));
    }
    let text = resp.text().await.map_err(|e| PinError::Config(e.to_string()))?;
    parse_config(&text)
}

/// Load `config.json`, falling back to defaults
pub async fn load_config() -> MapConfig {
    match fetch_config(CONFIG_URL).await {
        Ok(config) => {
            log::info!("loaded {} (collection '{}')", CONFIG_URL, config.store.collection);
            config
        }
        Err(e) => {
            log::warn!("{}; using built-in defaults", e);
            MapConfig::default()
        }
    }
}
