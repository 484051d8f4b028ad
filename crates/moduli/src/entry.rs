//! Module entry records as exchanged with the records backend.
//!
//! A [`ModuleEntry`] keeps its `data` as an untyped JSON value so that a malformed stored
//! document surfaces when the entry is opened, rather than as a transport decode failure.

use crate::registry::lookup;
use crate::{FormDocument, ModuliError, ModuliResult, MODULE_CODE, SCHEMA_VERSION};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted module entry, immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub id: Uuid,
    pub dossier_id: Uuid,
    pub module_code: String,
    pub schema_version: u32,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub created_by_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ModuleEntry {
    /// Whether this entry was written with a registered `(module_code, schema_version)` pair.
    pub fn is_registered(&self) -> bool {
        lookup(&self.module_code, self.schema_version).is_some()
    }

    /// Strictly parse the stored document.
    ///
    /// # Errors
    ///
    /// - [`ModuliError::SchemaNotRegistered`] if the entry's schema pair is unknown.
    /// - [`ModuliError::MissingDocument`] if `data` is absent or `null`.
    /// - [`ModuliError::Translation`] if the document does not match the schema.
    pub fn document(&self) -> ModuliResult<FormDocument> {
        if !self.is_registered() {
            return Err(ModuliError::SchemaNotRegistered {
                module_code: self.module_code.clone(),
                schema_version: self.schema_version,
            });
        }
        if self.data.is_null() {
            return Err(ModuliError::MissingDocument);
        }
        FormDocument::from_json_value(self.data.clone())
    }
}

/// Request body for creating a module entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryCreate {
    pub dossier_id: Uuid,
    pub module_code: String,
    pub schema_version: u32,
    pub occurred_at: DateTime<Utc>,
    pub data: FormDocument,
}

impl EntryCreate {
    /// Build a nursing evaluation entry occurring at midnight UTC of the compilation date.
    pub fn nursing_evaluation(dossier_id: Uuid, compiled_on: NaiveDate, data: FormDocument) -> Self {
        Self {
            dossier_id,
            module_code: MODULE_CODE.to_string(),
            schema_version: SCHEMA_VERSION,
            occurred_at: compiled_on.and_time(chrono::NaiveTime::MIN).and_utc(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_json(data: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "5f0c3c39-6a0e-4c1b-9d0b-0b6a3f1b8e11",
            "dossier_id": "0e9b1f4a-2a7d-4d44-8c7e-2f0d5c4b9a10",
            "module_code": MODULE_CODE,
            "schema_version": 1,
            "occurred_at": "2026-03-14T00:00:00Z",
            "data": data,
            "created_by_user_id": null,
            "created_at": "2026-03-14T09:12:00Z"
        })
    }

    #[test]
    fn document_parses_stored_data() {
        let entry: ModuleEntry =
            serde_json::from_value(entry_json(json!({ "firma": "M. Rossi" }))).expect("entry");
        assert!(entry.updated_at.is_none());
        let doc = entry.document().expect("document");
        assert_eq!(doc.firma.as_deref(), Some("M. Rossi"));
    }

    #[test]
    fn document_rejects_null_data() {
        let entry: ModuleEntry = serde_json::from_value(entry_json(json!(null))).expect("entry");
        assert!(matches!(entry.document(), Err(ModuliError::MissingDocument)));
    }

    #[test]
    fn absent_data_key_is_missing_document() {
        let mut value = entry_json(json!({}));
        value.as_object_mut().expect("object").remove("data");
        let entry: ModuleEntry = serde_json::from_value(value).expect("entry");
        assert!(matches!(entry.document(), Err(ModuliError::MissingDocument)));
    }

    #[test]
    fn document_rejects_unregistered_schema() {
        let mut entry: ModuleEntry = serde_json::from_value(entry_json(json!({}))).expect("entry");
        entry.schema_version = 2;
        let err = entry.document().expect_err("unregistered");
        match err {
            ModuliError::SchemaNotRegistered {
                module_code,
                schema_version,
            } => {
                assert_eq!(module_code, MODULE_CODE);
                assert_eq!(schema_version, 2);
            }
            other => panic!("expected SchemaNotRegistered, got {other:?}"),
        }
    }

    #[test]
    fn entry_create_occurs_at_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).expect("date");
        let create = EntryCreate::nursing_evaluation(Uuid::nil(), date, FormDocument::default());
        let body = serde_json::to_value(&create).expect("serialise");
        assert_eq!(body["module_code"], json!("ROG26/1.4"));
        assert_eq!(body["schema_version"], json!(1));
        assert_eq!(body["occurred_at"], json!("2026-03-14T00:00:00Z"));
        assert!(body["data"].is_object());
    }
}
