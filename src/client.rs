//! Blocking HTTP transport for the tracker REST backend.
//!
//! Every request is a single JSON `GET` against the configured base URL. Bodies
//! are read as text and decoded with `serde_json`, so a payload that does not
//! match the expected shape surfaces as [`SkinTrackerError::Json`] rather than
//! as a transport error.

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::{Result, SkinTrackerError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin wrapper around a `reqwest` blocking client bound to one backend.
///
/// `ApiClient` is `Send + Sync`; independent requests may be issued from
/// several threads at once without any locking.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    cache: Option<ResponseCache>,
    offline: bool,
}

impl ApiClient {
    /// Build a client from a [`Config`].
    ///
    /// The cache is enabled when `config.cache_dir` is set, or implicitly (in
    /// the platform default directory) when offline mode is requested.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = match (&config.cache_dir, config.offline) {
            (Some(dir), _) => Some(ResponseCache::new(Some(dir.clone()))?),
            (None, true) => Some(ResponseCache::new(None)?),
            (None, false) => None,
        };
        Ok(Self {
            http: build_http_client(config.timeout)?,
            base_url: crate::config::normalize_base_url(&config.base_url),
            cache,
            offline: config.offline,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Full URL for an endpoint path such as `/items/42`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a GET and decode the JSON body into `T`.
    ///
    /// * non-2xx statuses (404 included) become [`SkinTrackerError::Status`],
    ///   carrying the backend's `detail` message
    /// * an offline cache miss becomes [`SkinTrackerError::NotFound`]
    /// * a body that does not decode becomes [`SkinTrackerError::Json`]
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let body = self.get_text(path, query)?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                // Never replay a body we could not decode.
                if let Some(cache) = &self.cache {
                    cache.evict(path, query);
                }
                tracing::warn!(path, error = %e, "malformed response payload");
                Err(e.into())
            }
        }
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        if self.offline {
            let cache = self.cache.as_ref().ok_or_else(|| {
                SkinTrackerError::InvalidArgument("offline mode requires a cache".into())
            })?;
            return cache.load(path, query)?.ok_or_else(|| {
                SkinTrackerError::NotFound(format!(
                    "Response for {} not cached and offline mode is enabled",
                    path
                ))
            });
        }

        let url = self.url_for(path);
        tracing::debug!(%url, ?query, "GET");
        let resp = self.http.get(&url).query(query).send()?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().ok().and_then(|body| error_detail(&body));
            tracing::debug!(%url, status = status.as_u16(), ?detail, "non-success status");
            return Err(SkinTrackerError::Status {
                status: status.as_u16(),
                url,
                detail,
            });
        }
        let body = resp.text()?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(path, query, &body) {
                tracing::warn!(path, error = %e, "failed to cache response");
            }
        }
        Ok(body)
    }
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

/// FastAPI error bodies look like `{"detail": "..."}`; anything else is kept verbatim.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        _ => Some(body.to_string()),
    }
}
