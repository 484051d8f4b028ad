//! Client runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the session and the HTTP client. Operations never read environment variables, which
//! keeps behaviour consistent across runtimes and test harnesses.

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_DOSSIER_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_DOSSIER_PAGE_SIZE,
};
use crate::{FormError, FormResult};
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base: String,
    access_token: Option<String>,
    dossier_page_size: u32,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL is stored without a trailing slash. A blank token is treated as absent. The
    /// page size is capped at the largest page the records API serves.
    pub fn new(
        api_base: impl Into<String>,
        access_token: Option<String>,
        dossier_page_size: u32,
        request_timeout: Duration,
    ) -> FormResult<Self> {
        let api_base = api_base.into().trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(FormError::InvalidInput("api_base cannot be empty".into()));
        }
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(FormError::InvalidInput(format!(
                "api_base must be an http(s) URL, got '{api_base}'"
            )));
        }
        if dossier_page_size == 0 {
            return Err(FormError::InvalidInput(
                "dossier_page_size must be at least 1".into(),
            ));
        }
        if dossier_page_size > MAX_DOSSIER_PAGE_SIZE {
            tracing::warn!(
                requested = dossier_page_size,
                max = MAX_DOSSIER_PAGE_SIZE,
                "dossier page size clamped"
            );
        }
        let dossier_page_size = dossier_page_size.min(MAX_DOSSIER_PAGE_SIZE);

        Ok(Self {
            api_base,
            access_token: access_token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            dossier_page_size,
            request_timeout,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn dossier_page_size(&self) -> u32 {
        self.dossier_page_size
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: None,
            dossier_page_size: DEFAULT_DOSSIER_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}
