//! Pin Writes
//!
//! One REST call per intent. Callers never wait on these: `RemotePinStore`
//! spawns them and logs the outcome, and the change itself comes back
//! through the subscription.

use gloo_net::http::{Request, Response};
use leptos::task::spawn_local;
use pin_sync::{NewPin, PinError, PinId, PinPatch, PinWriter};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;

/// Body returned by a push: the generated key
#[derive(Deserialize)]
struct PushResponse {
    name: PinId,
}

fn write_error(e: impl std::fmt::Display) -> PinError {
    PinError::Write(e.to_string())
}

fn to_body<T: Serialize>(value: &T) -> Result<String, PinError> {
    serde_json::to_string(value).map_err(write_error)
}

async fn read_ok(resp: Response) -> Result<String, PinError> {
    if !resp.ok() {
        return Err(PinError::Write(format!("HTTP {} {}", resp.status(), resp.status_text())));
    }
    resp.text().await.map_err(write_error)
}

/// Create a pin under a store-generated key
pub async fn push_pin(store: &StoreConfig, record: &NewPin) -> Result<PinId, PinError> {
    let resp = Request::post(&store.collection_url())
        .header("Content-Type", "application/json")
        .body(to_body(record)?)
        .map_err(write_error)?
        .send()
        .await
        .map_err(write_error)?;
    let text = read_ok(resp).await?;
    let created: PushResponse = serde_json::from_str(&text).map_err(write_error)?;
    Ok(created.name)
}

/// Merge a partial record into an existing pin
pub async fn patch_pin(store: &StoreConfig, id: &PinId, patch: &PinPatch) -> Result<(), PinError> {
    let resp = Request::patch(&store.pin_url(id))
        .header("Content-Type", "application/json")
        .body(to_body(patch)?)
        .map_err(write_error)?
        .send()
        .await
        .map_err(write_error)?;
    read_ok(resp).await.map(|_| ())
}

pub async fn delete_pin(store: &StoreConfig, id: &PinId) -> Result<(), PinError> {
    let resp = Request::delete(&store.pin_url(id))
        .send()
        .await
        .map_err(write_error)?;
    read_ok(resp).await.map(|_| ())
}

/// Fire-and-forget writer used by the feed adapter
#[derive(Debug, Clone)]
pub struct RemotePinStore {
    store: StoreConfig,
}

impl RemotePinStore {
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }
}

impl PinWriter for RemotePinStore {
    fn push(&self, record: NewPin) {
        let store = self.store.clone();
        spawn_local(async move {
            match push_pin(&store, &record).await {
                Ok(id) => log::debug!("created pin {} '{}'", id, record.title),
                Err(e) => log::error!("creating pin '{}' failed: {}", record.title, e),
            }
        });
    }

    fn update(&self, id: &PinId, patch: PinPatch) {
        let store = self.store.clone();
        let id = id.clone();
        spawn_local(async move {
            if let Err(e) = patch_pin(&store, &id, &patch).await {
                log::error!("updating pin {} failed: {}", id, e);
            }
        });
    }

    fn remove(&self, id: &PinId) {
        let store = self.store.clone();
        let id = id.clone();
        spawn_local(async move {
            if let Err(e) = delete_pin(&store, &id).await {
                log::error!("deleting pin {} failed: {}", id, e);
            }
        });
    }
}
