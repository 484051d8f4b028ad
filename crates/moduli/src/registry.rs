//! Registry of module schemas keyed by `(module_code, schema_version)`.
//!
//! The registry picks the parser for a payload. Only one pair is registered; payloads naming
//! any other pair are rejected rather than guessed at.

use crate::{FormDocument, ModuliError, ModuliResult, MODULE_CODE, SCHEMA_VERSION};

/// A parsed and validated module document.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleDocument {
    ValutazioneInfermieristicaV1(FormDocument),
}

/// Static description of a registered module schema.
#[derive(Clone, Copy, Debug)]
pub struct SchemaInfo {
    pub module_code: &'static str,
    pub schema_version: u32,
    pub title: &'static str,
    parse: fn(serde_json::Value) -> ModuliResult<ModuleDocument>,
}

impl SchemaInfo {
    /// Parse and validate a payload with this schema.
    pub fn parse(&self, payload: serde_json::Value) -> ModuliResult<ModuleDocument> {
        (self.parse)(payload)
    }
}

fn parse_valutazione_v1(payload: serde_json::Value) -> ModuliResult<ModuleDocument> {
    let doc = FormDocument::from_json_value(payload)?;
    doc.validate()?;
    Ok(ModuleDocument::ValutazioneInfermieristicaV1(doc))
}

static SCHEMAS: &[SchemaInfo] = &[SchemaInfo {
    module_code: MODULE_CODE,
    schema_version: SCHEMA_VERSION,
    title: "Valutazione infermieristica",
    parse: parse_valutazione_v1,
}];

/// All registered schemas.
pub fn registered() -> &'static [SchemaInfo] {
    SCHEMAS
}

/// Find the schema registered for a pair.
pub fn lookup(module_code: &str, schema_version: u32) -> Option<&'static SchemaInfo> {
    SCHEMAS
        .iter()
        .find(|s| s.module_code == module_code && s.schema_version == schema_version)
}

/// Parse and validate a payload for a registered pair.
///
/// # Errors
///
/// Returns [`ModuliError::SchemaNotRegistered`] for unknown pairs, otherwise any parse or
/// validation error of the selected schema.
pub fn validate_payload(
    module_code: &str,
    schema_version: u32,
    payload: serde_json::Value,
) -> ModuliResult<ModuleDocument> {
    let schema =
        lookup(module_code, schema_version).ok_or_else(|| ModuliError::SchemaNotRegistered {
            module_code: module_code.to_string(),
            schema_version,
        })?;
    schema.parse(payload)
}
