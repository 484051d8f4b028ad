//! Clinical module wire/boundary support.
//!
//! This crate is responsible for translating between the JSON documents stored by the records
//! backend and typed module structs:
//! - the nursing evaluation document (module `ROG26/1.4`, schema version 1)
//! - module entry records as they travel over the REST API
//! - the `(module_code, schema_version)` registry used to pick a parser for a payload
//!
//! Form behaviour (controls, serialisation from controls, visibility) lives in `cartella-core`.
//! This crate handles the document shape and schema-level validation only.

pub mod entry;
pub mod registry;
pub mod valutazione_infermieristica;
pub mod vocabulary;

mod wire;

pub use entry::{EntryCreate, ModuleEntry};
pub use registry::{lookup, validate_payload, ModuleDocument, SchemaInfo};
pub use valutazione_infermieristica::ValutazioneInfermieristicaV1;

/// The nursing evaluation document, the only registered module schema.
pub type FormDocument = ValutazioneInfermieristicaV1;

/// Module code of the nursing evaluation ("valutazione infermieristica").
pub const MODULE_CODE: &str = "ROG26/1.4";

/// Schema version of [`FormDocument`].
pub const SCHEMA_VERSION: u32 = 1;

/// Errors returned by the `moduli` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum ModuliError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("schema not registered: {module_code} v{schema_version}")]
    SchemaNotRegistered {
        module_code: String,
        schema_version: u32,
    },

    #[error("module data is absent")]
    MissingDocument,

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid value at {path}: {reason}")]
    InvalidValue { path: String, reason: String },
}

/// Type alias for Results that can fail with a [`ModuliError`].
pub type ModuliResult<T> = Result<T, ModuliError>;
