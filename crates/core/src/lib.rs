//! # Cartella Core
//!
//! Form engine for the nursing evaluation module of the cartella client.
//!
//! This crate owns everything between the raw form controls and the stored document:
//! - the typed field registry ([`fields`])
//! - form-control state ([`controls`])
//! - conversion from controls to a [`FormDocument`](moduli::FormDocument) ([`serializer`]) and
//!   back ([`populator`])
//! - conditional visibility of dependent fields ([`visibility`])
//! - the form session controller for create and view modes ([`session`])
//! - the typed view model and its plain-text rendering ([`view`])
//!
//! **No transport concerns**: the records backend is reached through the [`RecordsBackend`] trait;
//! the HTTP implementation lives in `api-client`.

pub mod backend;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod fields;
pub mod populator;
pub mod serializer;
pub mod session;
pub mod view;
pub mod visibility;

pub use backend::{BackendError, Dossier, Page, Patient, RecordsBackend, StaffUser};
pub use config::ClientConfig;
pub use controls::FormState;
pub use error::{FormError, FormResult};
pub use fields::{
    ChoiceField, DateField, FieldKey, FlagField, FloatField, IntField, MultiField, NumberField,
    Section, TextField, ToggleField, YesNo,
};
pub use populator::populate;
pub use serializer::serialize;
pub use session::{DossierSnapshot, FormSession, Mode, SaveControl, SessionContext};
pub use view::{render_text, FormView};
pub use visibility::{Container, VisibilityController};
