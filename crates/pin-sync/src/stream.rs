//! Realtime Stream
//!
//! Decodes the database's REST streaming events (`put`, `patch`, `keep-alive`,
//! `cancel`, `auth_revoked`) and folds them into a local copy of the pin
//! collection, so every change ends up as a full snapshot.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PinError, PinResult};
use crate::snapshot::PinSnapshot;

/// One event from the change stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Replace the value at `path` (null deletes it)
    Put { path: String, data: Value },
    /// Replace each child of `path` named in `data`
    Patch { path: String, data: Value },
    KeepAlive,
    /// Server closed the stream, usually because rules deny access
    Cancel(String),
    /// The auth credential expired
    AuthRevoked,
}

#[derive(Deserialize)]
struct PathData {
    path: String,
    #[serde(default)]
    data: Value,
}

impl StreamEvent {
    /// Event type names the stream is expected to emit
    pub const EVENT_TYPES: [&'static str; 5] = ["put", "patch", "keep-alive", "cancel", "auth_revoked"];

    pub fn parse(event_type: &str, payload: &str) -> PinResult<Self> {
        match event_type {
            "put" | "patch" => {
                let PathData { path, data } = serde_json::from_str(payload)
                    .map_err(|e| PinError::Stream(format!("bad {} payload: {}", event_type, e)))?;
                Ok(if event_type == "put" {
                    StreamEvent::Put { path, data }
                } else {
                    StreamEvent::Patch { path, data }
                })
            }
            "keep-alive" => Ok(StreamEvent::KeepAlive),
            "cancel" => {
                let reason = match serde_json::from_str::<Value>(payload) {
                    Ok(Value::String(reason)) => reason,
                    Ok(Value::Null) => "cancelled by server".to_string(),
                    _ => payload.to_string(),
                };
                Ok(StreamEvent::Cancel(reason))
            }
            "auth_revoked" => Ok(StreamEvent::AuthRevoked),
            other => Err(PinError::Stream(format!("unknown event type '{}'", other))),
        }
    }
}

/// Connection state of the change stream
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedStatus {
    #[default]
    Connecting,
    Live,
    /// Connection dropped; the browser retries on its own
    Reconnecting,
    Closed(String),
}

impl FeedStatus {
    pub fn label(&self) -> String {
        match self {
            FeedStatus::Connecting => "Connecting…".to_string(),
            FeedStatus::Live => "Live".to_string(),
            FeedStatus::Reconnecting => "Reconnecting…".to_string(),
            FeedStatus::Closed(reason) => format!("Offline: {}", reason),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FeedStatus::Live)
    }
}

/// Local copy of the collection as a JSON tree
#[derive(Debug, Clone, Default)]
pub struct CollectionMirror {
    root: Value,
}

impl CollectionMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a data event; returns whether the collection changed
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        match event {
            StreamEvent::Put { path, data } => write(&mut self.root, &segments(path), data.clone()),
            StreamEvent::Patch { path, data } => {
                let Some(children) = data.as_object() else {
                    log::warn!("ignoring patch at {} with non-object data", path);
                    return false;
                };
                let base = segments(path);
                let mut changed = false;
                for (key, value) in children {
                    let mut target = base.clone();
                    target.extend(segments(key));
                    changed |= write(&mut self.root, &target, value.clone());
                }
                changed
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> PinSnapshot {
        PinSnapshot::from_value(&self.root)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Arrays are how the database renders integer-keyed objects; writes address
/// them by key, so turn them back into objects first.
fn objectify(node: &mut Value) {
    if let Value::Array(items) = node {
        let children: Map<String, Value> = items
            .drain(..)
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect();
        *node = Value::Object(children);
    }
}

fn is_empty_node(node: &Value) -> bool {
    node.is_null() || node.as_object().is_some_and(|o| o.is_empty())
}

/// Set `data` at `path` below `node`. Null deletes, and parents left empty
/// disappear.
fn write(node: &mut Value, path: &[&str], data: Value) -> bool {
    let Some((head, rest)) = path.split_first() else {
        let data = if is_empty_node(&data) { Value::Null } else { data };
        if *node == data {
            return false;
        }
        *node = data;
        return true;
    };

    objectify(node);

    if data.is_null() {
        let Some(children) = node.as_object_mut() else {
            return false;
        };
        let Some(child) = children.get_mut(*head) else {
            return false;
        };
        let changed = write(child, rest, Value::Null);
        if is_empty_node(child) {
            children.remove(*head);
        }
        if children.is_empty() {
            *node = Value::Null;
        }
        return changed;
    }

    let replaced = !node.is_object() && !node.is_null();
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Some(children) = node.as_object_mut() else {
        return false;
    };
    let child = children.entry(head.to_string()).or_insert(Value::Null);
    let changed = write(child, rest, data);
    // An empty write is a delete
    if is_empty_node(child) {
        children.remove(*head);
    }
    if children.is_empty() {
        *node = Value::Null;
    }
    changed || replaced
}
