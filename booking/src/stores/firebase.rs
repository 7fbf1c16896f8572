//! Firebase Realtime Database store client.
//!
//! Talks to the database over its REST surface: `GET`/`PUT`/`POST`/`DELETE`
//! on `{database_url}/{path}.json`, and `text/event-stream` streaming for
//! subtree subscriptions. Streaming events carry deltas (`put`/`patch`
//! relative to the watched location), so the client maintains a local copy
//! of the subtree and emits the full contents after every event — which is
//! exactly the snapshot shape the reducers consume.

use crate::error::{BookingError, Result};
use crate::providers::store::{RealtimeStore, SubtreeWatch, write_subtree};
use async_stream::stream;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

/// Configuration for the remote realtime database.
#[derive(Debug, Clone)]
pub struct RemoteDbConfig {
    /// Database base URL, e.g. `https://my-app-default-rtdb.firebaseio.com`.
    pub database_url: String,

    /// Auth token appended to every request, when the database rules
    /// require one.
    pub auth_token: Option<String>,
}

impl RemoteDbConfig {
    /// Create a configuration for the given database URL.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            auth_token: None,
        }
    }

    /// Attach an auth token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Response body of an append (`POST`): the store-generated id.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Payload of a streaming `put`/`patch` event.
#[derive(Debug, Deserialize)]
struct StreamEventData {
    path: String,
    data: Value,
}

/// Remote realtime-database store client.
#[derive(Clone)]
pub struct FirebaseStore {
    client: Client,
    config: RemoteDbConfig,
}

impl FirebaseStore {
    /// Create a client for the configured database.
    #[must_use]
    pub fn new(config: RemoteDbConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.config.database_url.trim_end_matches('/');
        match &self.config.auth_token {
            Some(token) => format!("{base}/{path}.json?auth={token}"),
            None => format!("{base}/{path}.json"),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BookingError::store("permission denied"))
            },
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(BookingError::store(format!("status {status}: {body}")))
            },
        }
    }
}

/// Apply one streaming event to the local copy of the watched subtree.
///
/// `put` replaces the value at the event path (the root path replaces the
/// whole subtree); `patch` merges the payload's children at the event
/// path. JSON `null` deletes.
fn apply_stream_event(tree: &mut Value, event_path: &str, data: Value, patch: bool) {
    if patch {
        if let Value::Object(children) = data {
            for (key, child) in children {
                let target = format!("{}/{}", event_path.trim_end_matches('/'), key);
                let value = if child.is_null() { None } else { Some(child) };
                write_subtree(tree, &target, value);
            }
        }
    } else {
        let value = if data.is_null() { None } else { Some(data) };
        write_subtree(tree, event_path, value);
    }
}

impl RealtimeStore for FirebaseStore {
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>>> + Send {
        let store = self.clone();
        let url = self.url(path);
        async move {
            let response = store
                .client
                .get(url)
                .send()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            let value: Value = Self::check_status(response)
                .await?
                .json()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            Ok(if value.is_null() { None } else { Some(value) })
        }
    }

    fn push(&self, path: &str, value: &Value) -> impl Future<Output = Result<String>> + Send {
        let store = self.clone();
        let url = self.url(path);
        let value = value.clone();
        async move {
            let response = store
                .client
                .post(url)
                .json(&value)
                .send()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            let push: PushResponse = Self::check_status(response)
                .await?
                .json()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            Ok(push.name)
        }
    }

    fn set(&self, path: &str, value: &Value) -> impl Future<Output = Result<()>> + Send {
        let store = self.clone();
        let url = self.url(path);
        let value = value.clone();
        async move {
            let response = store
                .client
                .put(url)
                .json(&value)
                .send()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            Self::check_status(response).await?;
            Ok(())
        }
    }

    fn remove(&self, path: &str) -> impl Future<Output = Result<()>> + Send {
        let store = self.clone();
        let url = self.url(path);
        async move {
            let response = store
                .client
                .delete(url)
                .send()
                .await
                .map_err(|error| BookingError::store(error.to_string()))?;
            Self::check_status(response).await?;
            Ok(())
        }
    }

    fn watch(&self, path: &str) -> impl Future<Output = Result<SubtreeWatch>> + Send {
        let store = self.clone();
        let url = self.url(path);
        let watched_path = path.to_string();
        async move {
            let response = store
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "text/event-stream")
                .send()
                .await
                .map_err(|error| BookingError::Subscription {
                    message: error.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(BookingError::Subscription {
                    message: format!("status {}", response.status()),
                });
            }

            let mut byte_stream = response.bytes_stream();

            let snapshots = stream! {
                let mut tree = Value::Null;
                let mut buffer = String::new();
                let mut event_name = String::new();

                while let Some(chunk) = byte_stream.next().await {
                    let bytes = match chunk {
                        Ok(bytes) => bytes,
                        Err(error) => {
                            tracing::warn!(path = %watched_path, %error, "Subscription stream failed");
                            break;
                        },
                    };
                    buffer.push_str(&String::from_utf8_lossy(&bytes));

                    while let Some(position) = buffer.find('\n') {
                        let line = buffer[..position].trim_end_matches('\r').to_string();
                        buffer.drain(..=position);

                        if let Some(name) = line.strip_prefix("event:") {
                            event_name = name.trim().to_string();
                        } else if let Some(data) = line.strip_prefix("data:") {
                            match event_name.as_str() {
                                "put" | "patch" => {
                                    match serde_json::from_str::<StreamEventData>(data.trim()) {
                                        Ok(event) => {
                                            apply_stream_event(
                                                &mut tree,
                                                &event.path,
                                                event.data,
                                                event_name == "patch",
                                            );
                                            yield if tree.is_null() { None } else { Some(tree.clone()) };
                                        },
                                        Err(error) => {
                                            tracing::warn!(path = %watched_path, %error, "Dropping undecodable stream event");
                                        },
                                    }
                                },
                                "keep-alive" => {},
                                "cancel" | "auth_revoked" => {
                                    tracing::warn!(path = %watched_path, event = %event_name, "Subscription closed by the store");
                                    return;
                                },
                                _ => {},
                            }
                        }
                    }
                }
            };

            Ok(SubtreeWatch::new(snapshots))
        }
    }
}
