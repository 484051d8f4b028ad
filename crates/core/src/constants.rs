//! Constants used throughout the cartella core crate.

/// Default base URL of the records REST API.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Default number of dossiers loaded for the selection step.
pub const DEFAULT_DOSSIER_PAGE_SIZE: u32 = 100;

/// Largest page size accepted by the dossier listing.
pub const MAX_DOSSIER_PAGE_SIZE: u32 = 100;

/// Default per-request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Title shown on the nursing evaluation form.
pub const FORM_TITLE: &str = "Valutazione infermieristica";

/// Date format used by date controls and stored documents.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Progressive number prefilled for a new entry.
pub const FIRST_PROGRESSIVE_NUMBER: i64 = 1;
