// Hand-crafted async HTTP client for the Whooktown platform.
//
// Two services: auth (token introspection) and sensor (everything else).
// Auth: `Authorization: Bearer <token>` header on every request.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::environment::ServiceUrls;
use crate::error::Error;
use crate::models::{
    CameraState, LayoutDb, LayoutUpdate, SensorState, TokenInfo, TrafficState,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ── Error response shape from the platform ──────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Configuration ────────────────────────────────────────────────────

/// Configuration for [`WhooktownClient::new`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token. `None` builds an unauthenticated client, which can
    /// only call [`WhooktownClient::check_token`].
    pub token: Option<String>,
    /// Resolved base URLs, see [`ServiceUrls::resolve`].
    pub urls: ServiceUrls,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Whooktown platform.
///
/// Cheap to clone: the underlying HTTP client is reference-counted.
#[derive(Clone)]
pub struct WhooktownClient {
    http: reqwest::Client,
    urls: ServiceUrls,
}

impl WhooktownClient {
    /// Build a client. The token (if any) is injected as a default
    /// `Authorization` header on every request.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::Unauthorized {
                    message: "token contains characters not valid in a header".into(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("wt/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            urls: config.urls,
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn auth_url(&self, path: &str) -> Url {
        self.urls
            .auth
            .join(path)
            .expect("path should be a valid relative URL")
    }

    fn sensor_url(&self, path: &str) -> Url {
        self.urls
            .sensor
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(Error::from_reqwest)?;
        Self::handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        Self::handle_empty(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), Error> {
        debug!("PUT {url}");
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(Error::from_reqwest)?;
            serde_json::from_str(&body).map_err(|e| {
                // Cut on char boundaries; the body is arbitrary text.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Unauthorized { message }
            }
            reqwest::StatusCode::BAD_REQUEST => Error::BadRequest { message },
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth service ─────────────────────────────────────────────────

    /// Introspect a token: type, role grants, and owning account.
    ///
    /// Takes the token explicitly so an unauthenticated client can
    /// validate a candidate token during login.
    pub async fn check_token(&self, token: &str) -> Result<TokenInfo, Error> {
        let url = self.auth_url("v1/token/introspect");
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        Self::handle_response(resp).await
    }

    // ── Sensor service ───────────────────────────────────────────────

    /// All known sensor states.
    pub async fn sensor_states(&self) -> Result<Vec<SensorState>, Error> {
        self.get(self.sensor_url("v1/sensor-states")).await
    }

    /// Submit a raw sensor data payload. Must contain at least an `id`.
    pub async fn send_sensor_data(
        &self,
        payload: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), Error> {
        self.post_no_response(self.sensor_url("v1/sensor-data"), payload)
            .await
    }

    /// All per-layout traffic states.
    pub async fn traffic_states(&self) -> Result<Vec<TrafficState>, Error> {
        self.get(self.sensor_url("v1/traffic-states")).await
    }

    /// Replace the traffic state for one layout.
    pub async fn set_traffic_state(&self, state: &TrafficState) -> Result<(), Error> {
        let url = self.sensor_url(&format!("v1/traffic-states/{}", state.layout_id));
        self.put_no_response(url, state).await
    }

    /// All per-layout camera states.
    pub async fn camera_states(&self) -> Result<Vec<CameraState>, Error> {
        self.get(self.sensor_url("v1/camera-states")).await
    }

    // ── Layouts ──────────────────────────────────────────────────────

    /// All layout documents.
    pub async fn layouts(&self) -> Result<Vec<LayoutDb>, Error> {
        self.get(self.sensor_url("v1/layouts")).await
    }

    /// Replace an entire layout document. The platform only supports
    /// layout-level writes, so building edits go through this.
    pub async fn update_layout(&self, layout: &LayoutUpdate) -> Result<(), Error> {
        let url = self.sensor_url(&format!("v1/layouts/{}", layout.id));
        self.put_no_response(url, layout).await
    }

    /// Toggle building labels for a layout.
    pub async fn set_labels_enabled(&self, layout_id: &str, enabled: bool) -> Result<(), Error> {
        let url = self.sensor_url(&format!("v1/layouts/{layout_id}/labels"));
        self.post_no_response(url, &serde_json::json!({ "enabled": enabled }))
            .await
    }
}
