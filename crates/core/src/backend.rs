//! Records backend seam.
//!
//! [`RecordsBackend`] is the only way the form engine reaches the REST API. The HTTP
//! implementation lives in `api-client`; tests use in-memory fakes.

use async_trait::async_trait;
use moduli::{EntryCreate, ModuleEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failures reported by a backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("forbidden{}", fmt_detail(.0))]
    Forbidden(Option<String>),
    #[error("not found{}", fmt_detail(.0))]
    NotFound(Option<String>),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected status {status}{}", fmt_detail(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl BackendError {
    /// Server-provided detail, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Forbidden(d) | BackendError::NotFound(d) => d.as_deref(),
            BackendError::Status { detail, .. } => detail.as_deref(),
            BackendError::Validation(d) => Some(d),
            _ => None,
        }
    }
}

/// An admission episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub care_level: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
    #[serde(default)]
    pub discharge_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Dossier {
    pub fn is_open(&self) -> bool {
        self.discharge_date.is_none()
    }

    /// Status reported by the backend, or one derived from the discharge date.
    pub fn status_label(&self) -> &str {
        match self.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ if self.is_open() => "active",
            _ => "discharged",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub fiscal_code: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// The signed-in staff member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl StaffUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// A page of a listing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub has_next: bool,
}

#[async_trait]
pub trait RecordsBackend: Send + Sync {
    /// Whether a bearer credential is available. No network call.
    fn has_credential(&self) -> bool;

    async fn current_user(&self) -> Result<StaffUser, BackendError>;

    /// First page of dossiers.
    async fn list_dossiers(&self, page_size: u32) -> Result<Page<Dossier>, BackendError>;

    async fn get_dossier(&self, id: Uuid) -> Result<Dossier, BackendError>;

    async fn get_patient(&self, id: Uuid) -> Result<Patient, BackendError>;

    async fn get_entry(&self, id: Uuid) -> Result<ModuleEntry, BackendError>;

    async fn create_entry(&self, body: &EntryCreate) -> Result<ModuleEntry, BackendError>;
}
