//! # API Client
//!
//! HTTP implementation of [`RecordsBackend`] over the records REST API.
//!
//! Requests carry `Authorization: Bearer <token>` when the configuration holds a token. Non-2xx
//! responses are mapped onto [`BackendError`] using the status code and the FastAPI `detail`
//! field of the body. There is no retry and no token refresh.

use async_trait::async_trait;
use cartella_core::{
    BackendError, ClientConfig, Dossier, Page, Patient, RecordsBackend, StaffUser,
};
use moduli::{EntryCreate, ModuleEntry};
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

/// Records backend reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    base_url: String,
    has_token: bool,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Build a client from the startup configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] if the token is not a valid header value or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = config.access_token() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| BackendError::Transport(format!("invalid access token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base().to_string(),
            has_token: config.access_token().is_some(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        tracing::debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        read_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        read_response(response).await
    }
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    if !status.is_success() {
        let err = classify(status, &body);
        tracing::debug!(status = status.as_u16(), error = %err, "request failed");
        return Err(err);
    }

    serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Deserialize)]
struct ValidationItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

/// Extract the FastAPI `detail` of an error body.
///
/// `detail` is either a message string or, for validation failures, a list of
/// `{loc, msg, type}` items, rendered as `loc.path: msg` joined by `; `.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ValidationItem>(item).ok())
                .map(|item| {
                    let loc: Vec<String> = item
                        .loc
                        .iter()
                        .map(|p| match p {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect();
                    if loc.is_empty() {
                        item.msg
                    } else {
                        format!("{}: {}", loc.join("."), item.msg)
                    }
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

/// Map a non-success response onto a [`BackendError`].
pub fn classify(status: StatusCode, body: &[u8]) -> BackendError {
    let detail = error_detail(body);
    match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthenticated,
        StatusCode::FORBIDDEN => BackendError::Forbidden(detail),
        StatusCode::NOT_FOUND => BackendError::NotFound(detail),
        StatusCode::UNPROCESSABLE_ENTITY => {
            BackendError::Validation(detail.unwrap_or_else(|| "validation error".to_string()))
        }
        other => BackendError::Status {
            status: other.as_u16(),
            detail,
        },
    }
}

#[async_trait]
impl RecordsBackend for HttpBackend {
    fn has_credential(&self) -> bool {
        self.has_token
    }

    async fn current_user(&self) -> Result<StaffUser, BackendError> {
        self.get("/users/me", &[]).await
    }

    async fn list_dossiers(&self, page_size: u32) -> Result<Page<Dossier>, BackendError> {
        self.get(
            "/dossiers",
            &[("page", "1".to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn get_dossier(&self, id: Uuid) -> Result<Dossier, BackendError> {
        self.get(&format!("/dossiers/{id}"), &[]).await
    }

    async fn get_patient(&self, id: Uuid) -> Result<Patient, BackendError> {
        self.get(&format!("/patients/{id}"), &[]).await
    }

    async fn get_entry(&self, id: Uuid) -> Result<ModuleEntry, BackendError> {
        self.get(&format!("/modules/entries/{id}"), &[]).await
    }

    async fn create_entry(&self, body: &EntryCreate) -> Result<ModuleEntry, BackendError> {
        self.post("/modules/entries", body).await
    }
}
