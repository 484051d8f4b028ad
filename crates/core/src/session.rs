//! Form session controller.
//!
//! A [`FormSession`] owns everything one nursing evaluation form needs between user actions: the
//! mode, the [`SessionContext`] (current user, dossier snapshots, selection, viewed entry), the
//! control state, the visibility state and the save control. Operations take `&mut self`, so at
//! most one save can be in flight per session.
//!
//! [`FormSession::start_new_entry`] is the reset point between entries.

use crate::backend::{Dossier, Patient, RecordsBackend, StaffUser};
use crate::config::ClientConfig;
use crate::constants::{DATE_FORMAT, FIRST_PROGRESSIVE_NUMBER};
use crate::controls::FormState;
use crate::error::{FormError, FormResult, Operation};
use crate::fields::{
    ChoiceField, DateField, FieldKey, FlagField, IntField, MultiField, NumberField, TextField,
    ToggleField, YesNo,
};
use crate::populator::populate;
use crate::serializer::serialize;
use crate::view::FormView;
use crate::visibility::VisibilityController;
use cartella_types::NonEmptyText;
use chrono::{Datelike, NaiveDate};
use moduli::{EntryCreate, FormDocument, ModuleEntry};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No form opened yet, or the last open attempt failed.
    Closed,
    Create,
    View,
}

/// State of the save control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveControl {
    Enabled,
    Busy,
}

/// A dossier together with its patient, as loaded for the selection step.
#[derive(Clone, Debug, PartialEq)]
pub struct DossierSnapshot {
    pub dossier: Dossier,
    pub patient: Patient,
}

impl DossierSnapshot {
    fn matches(&self, needle: &str) -> bool {
        self.patient.full_name().to_lowercase().contains(needle)
            || self
                .patient
                .fiscal_code
                .as_deref()
                .is_some_and(|cf| cf.to_lowercase().contains(needle))
    }
}

/// Selection and reference data of one form session.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    pub user: Option<StaffUser>,
    pub dossiers: Vec<DossierSnapshot>,
    pub selected: Option<DossierSnapshot>,
    pub entry: Option<ModuleEntry>,
}

pub struct FormSession<B: RecordsBackend> {
    backend: B,
    config: ClientConfig,
    mode: Mode,
    context: SessionContext,
    state: FormState,
    visibility: VisibilityController,
    save: SaveControl,
    today: Option<NaiveDate>,
}

impl<B: RecordsBackend> FormSession<B> {
    pub fn new(backend: B, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            mode: Mode::Closed,
            context: SessionContext::default(),
            state: FormState::new(),
            visibility: VisibilityController::new(),
            save: SaveControl::Enabled,
            today: None,
        }
    }

    /// Fix the date used for prefilling instead of the local calendar date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn save_control(&self) -> SaveControl {
        self.save
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The document the current controls serialise to.
    pub fn document(&self) -> FormDocument {
        serialize(&self.state)
    }

    pub fn view(&self) -> FormView {
        FormView::build(self.mode, &self.state, &self.visibility, &self.context)
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Open an empty form for a new entry.
    pub async fn open_create(&mut self) -> FormResult<()> {
        if !self.backend.has_credential() {
            return Err(FormError::LoginRequired);
        }
        let user = self
            .backend
            .current_user()
            .await
            .map_err(FormError::backend(Operation::OpenForm))?;

        self.start_new_entry();
        self.context.user = Some(user);
        self.mode = Mode::Create;
        tracing::info!("nursing evaluation opened in create mode");
        Ok(())
    }

    /// Load the dossier snapshot used for selection.
    ///
    /// A dossier whose patient cannot be loaded is skipped.
    pub async fn load_dossiers(&mut self) -> FormResult<&[DossierSnapshot]> {
        let page = self
            .backend
            .list_dossiers(self.config.dossier_page_size())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load dossiers");
                FormError::backend(Operation::LoadDossiers)(e)
            })?;

        let mut snapshots = Vec::with_capacity(page.items.len());
        for dossier in page.items {
            match self.backend.get_patient(dossier.patient_id).await {
                Ok(patient) => snapshots.push(DossierSnapshot { dossier, patient }),
                Err(e) => tracing::warn!(
                    dossier_id = %dossier.id,
                    patient_id = %dossier.patient_id,
                    error = %e,
                    "skipping dossier whose patient could not be loaded"
                ),
            }
        }

        tracing::info!(count = snapshots.len(), "dossiers loaded");
        self.context.dossiers = snapshots;
        Ok(&self.context.dossiers)
    }

    /// Case-insensitive search over patient full name and fiscal code of the loaded dossiers.
    pub fn search_dossiers(&self, query: &str) -> Vec<&DossierSnapshot> {
        let needle = query.trim().to_lowercase();
        self.context
            .dossiers
            .iter()
            .filter(|s| needle.is_empty() || s.matches(&needle))
            .collect()
    }

    /// Select a dossier and prefill the identification and signature fields.
    pub async fn select_dossier(&mut self, id: Uuid) -> FormResult<()> {
        self.require_mode(Mode::Create)?;

        let dossier = self.backend.get_dossier(id).await.map_err(|e| {
            tracing::error!(dossier_id = %id, error = %e, "failed to load dossier");
            FormError::backend(Operation::SelectDossier)(e)
        })?;
        let patient = self
            .backend
            .get_patient(dossier.patient_id)
            .await
            .map_err(|e| {
                tracing::error!(patient_id = %dossier.patient_id, error = %e, "failed to load patient");
                FormError::backend(Operation::SelectDossier)(e)
            })?;

        self.context.selected = Some(DossierSnapshot { dossier, patient });
        self.prefill();
        tracing::info!(dossier_id = %id, "dossier selected");
        Ok(())
    }

    fn prefill(&mut self) {
        let today = self.today();
        let Some(selected) = &self.context.selected else {
            return;
        };
        let state = &mut self.state;

        if let Some(user) = &self.context.user {
            state.put_text(TextField::InizNome, initial(&user.first_name).as_deref());
            state.put_text(TextField::InizCognome, initial(&user.last_name).as_deref());
            state.put_text(
                TextField::InfermiereCompilatore,
                Some(user.full_name().as_str()),
            );
        }

        state.put_text(
            TextField::Dossier,
            Some(selected.dossier.id.to_string().as_str()),
        );
        if !state.put_choice(
            ChoiceField::Struttura,
            selected.dossier.care_level.as_deref(),
        ) {
            tracing::debug!(care_level = ?selected.dossier.care_level, "care level not prefilled");
        }
        state.put_text(
            TextField::PazienteNominativo,
            Some(selected.patient.full_name().as_str()),
        );
        state.put_int_input(IntField::Anno, &today.year().to_string());
        state.put_int_input(
            IntField::NumeroProgressivo,
            &FIRST_PROGRESSIVE_NUMBER.to_string(),
        );
        state.put_date_input(
            DateField::DataCompilazione,
            &today.format(DATE_FORMAT).to_string(),
        );
    }

    fn require_mode(&self, expected: Mode) -> FormResult<()> {
        if self.mode != expected {
            return Err(FormError::WrongMode {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    fn require_input(&self) -> FormResult<()> {
        match self.mode {
            Mode::Create => Ok(()),
            Mode::View => Err(FormError::ReadOnly),
            Mode::Closed => Err(FormError::WrongMode {
                expected: Mode::Create,
                actual: Mode::Closed,
            }),
        }
    }

    fn changed(&mut self, key: FieldKey) {
        self.visibility.on_change(key, &self.state);
    }

    pub fn set_text(&mut self, field: TextField, value: &str) -> FormResult<()> {
        self.require_input()?;
        self.state.set_text(field, value)?;
        self.changed(FieldKey::Text(field));
        Ok(())
    }

    pub fn set_number(&mut self, field: impl Into<NumberField>, value: &str) -> FormResult<()> {
        self.require_input()?;
        let field = field.into();
        self.state.set_number(field, value)?;
        self.changed(match field {
            NumberField::Int(f) => FieldKey::Int(f),
            NumberField::Float(f) => FieldKey::Float(f),
        });
        Ok(())
    }

    pub fn set_date(&mut self, field: DateField, value: &str) -> FormResult<()> {
        self.require_input()?;
        self.state.set_date(field, value)?;
        self.changed(FieldKey::Date(field));
        Ok(())
    }

    pub fn set_flag(&mut self, field: FlagField, value: Option<YesNo>) -> FormResult<()> {
        self.require_input()?;
        self.state.set_flag(field, value)?;
        self.changed(FieldKey::Flag(field));
        Ok(())
    }

    pub fn set_toggle(&mut self, field: ToggleField, checked: bool) -> FormResult<()> {
        self.require_input()?;
        self.state.set_toggle(field, checked)?;
        self.changed(FieldKey::Toggle(field));
        Ok(())
    }

    pub fn select(&mut self, field: ChoiceField, option: Option<&str>) -> FormResult<()> {
        self.require_input()?;
        self.state.select(field, option)?;
        self.changed(FieldKey::Choice(field));
        Ok(())
    }

    pub fn check(&mut self, field: MultiField, option: &str, checked: bool) -> FormResult<()> {
        self.require_input()?;
        self.state.check(field, option, checked)?;
        self.changed(FieldKey::Multi(field));
        Ok(())
    }

    /// Apply a JSON object of control inputs, firing the rules of every changed control.
    ///
    /// Nothing changes when any input is rejected.
    pub fn apply_inputs(
        &mut self,
        inputs: &serde_json::Map<String, serde_json::Value>,
    ) -> FormResult<()> {
        self.require_input()?;
        let applied = self.state.apply_inputs(inputs)?;
        for key in applied {
            self.changed(key);
        }
        Ok(())
    }

    /// Serialise the form and create the entry.
    ///
    /// The required-field gate runs before any network call. On failure the save control is
    /// enabled again so the user can retry.
    pub async fn save(&mut self) -> FormResult<ModuleEntry> {
        self.require_mode(Mode::Create)?;
        let dossier_id = self
            .context
            .selected
            .as_ref()
            .map(|s| s.dossier.id)
            .ok_or(FormError::NoDossierSelected)?;

        let document = serialize(&self.state);
        let compiled_on = required_fields(&document)?;

        self.save = SaveControl::Busy;
        let body = EntryCreate::nursing_evaluation(dossier_id, compiled_on, document);
        let result = self.backend.create_entry(&body).await;
        self.save = SaveControl::Enabled;

        match result {
            Ok(entry) => {
                tracing::info!(entry_id = %entry.id, %dossier_id, "nursing evaluation saved");
                Ok(entry)
            }
            Err(e) => {
                tracing::error!(%dossier_id, error = %e, "failed to save nursing evaluation");
                Err(FormError::backend(Operation::Save)(e))
            }
        }
    }

    /// Clear controls, visibility, dossier selection and save control for a new entry.
    ///
    /// The current user and the loaded dossier snapshot are kept.
    pub fn start_new_entry(&mut self) {
        self.state = FormState::new();
        self.visibility.reset();
        self.context.selected = None;
        self.context.entry = None;
        self.save = SaveControl::Enabled;
        if self.mode == Mode::View {
            self.mode = Mode::Closed;
        }
    }

    /// Load an entry and show it read-only.
    ///
    /// Nothing is rendered unless the stored document parses: the session keeps its previous state
    /// on any failure.
    pub async fn open_view(&mut self, entry_id: Uuid) -> FormResult<()> {
        if !self.backend.has_credential() {
            return Err(FormError::LoginRequired);
        }
        let user = self
            .backend
            .current_user()
            .await
            .map_err(FormError::backend(Operation::View))?;
        let entry = self.backend.get_entry(entry_id).await.map_err(|e| {
            tracing::error!(%entry_id, error = %e, "failed to load entry");
            FormError::backend(Operation::View)(e)
        })?;

        let document = entry.document().map_err(|e| {
            tracing::error!(%entry_id, error = %e, "stored document cannot be displayed");
            FormError::MalformedDocument(e)
        })?;

        let mut state = FormState::new();
        state.disable();
        populate(&mut state, &document);
        let mut visibility = VisibilityController::new();
        visibility.evaluate_all(&state);

        self.state = state;
        self.visibility = visibility;
        self.save = SaveControl::Enabled;
        self.context = SessionContext {
            user: Some(user),
            dossiers: std::mem::take(&mut self.context.dossiers),
            selected: None,
            entry: Some(entry),
        };
        self.mode = Mode::View;
        tracing::info!(%entry_id, "nursing evaluation opened in view mode");
        Ok(())
    }
}

fn initial(name: &str) -> Option<String> {
    let name = NonEmptyText::new(name).ok()?;
    name.as_str()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
}

/// Check the fields that must be filled before saving; returns the compilation date.
fn required_fields(document: &FormDocument) -> FormResult<NaiveDate> {
    let Some(compiled_on) = document.data else {
        return Err(FormError::MissingRequired {
            field: DateField::DataCompilazione.id(),
            message: "Inserisci la data di compilazione",
        });
    };
    if NonEmptyText::optional(document.infermiere_compilatore.as_deref()).is_none() {
        return Err(FormError::MissingRequired {
            field: TextField::InfermiereCompilatore.id(),
            message: "Inserisci il nome del compilatore",
        });
    }
    if NonEmptyText::optional(document.firma.as_deref()).is_none() {
        return Err(FormError::MissingRequired {
            field: TextField::Firma.id(),
            message: "Inserisci la firma",
        });
    }
    Ok(compiled_on)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, Page};
    use crate::visibility::Container;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const DOSSIER_A: Uuid = Uuid::from_u128(0xa1);
    const DOSSIER_B: Uuid = Uuid::from_u128(0xb2);
    const DOSSIER_ORPHAN: Uuid = Uuid::from_u128(0xc3);
    const PATIENT_A: Uuid = Uuid::from_u128(0x1a);
    const PATIENT_B: Uuid = Uuid::from_u128(0x2b);
    const PATIENT_MISSING: Uuid = Uuid::from_u128(0x3c);

    struct FakeBackend {
        credential: bool,
        dossiers: Vec<Dossier>,
        patients: HashMap<Uuid, Patient>,
        entries: Mutex<HashMap<Uuid, ModuleEntry>>,
        created: Mutex<Vec<EntryCreate>>,
        create_failure: Mutex<Option<BackendError>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            let dossier = |id, patient_id, care_level: &str| Dossier {
                id,
                patient_id,
                care_level: Some(care_level.to_string()),
                admission_date: Some("2026-01-10T08:00:00".into()),
                discharge_date: None,
                status: Some("active".into()),
            };
            let patient = |id, first: &str, last: &str, cf: &str| Patient {
                id,
                first_name: first.into(),
                last_name: last.into(),
                fiscal_code: Some(cf.into()),
            };
            Self {
                credential: true,
                dossiers: vec![
                    dossier(DOSSIER_A, PATIENT_A, "R3D"),
                    dossier(DOSSIER_B, PATIENT_B, "R3"),
                    dossier(DOSSIER_ORPHAN, PATIENT_MISSING, "R3"),
                ],
                patients: HashMap::from([
                    (PATIENT_A, patient(PATIENT_A, "Anna", "Bianchi", "BNCNNA40A41H501X")),
                    (PATIENT_B, patient(PATIENT_B, "Luigi", "Verdi", "VRDLGU35B12F205Y")),
                ]),
                entries: Mutex::new(HashMap::new()),
                created: Mutex::new(Vec::new()),
                create_failure: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn without_credential() -> Self {
            Self {
                credential: false,
                ..Self::new()
            }
        }

        fn log(&self, call: &'static str) {
            self.calls.lock().expect("calls").push(call);
        }

        fn called(&self, call: &str) -> bool {
            self.calls.lock().expect("calls").iter().any(|c| *c == call)
        }

        fn store(&self, entry: ModuleEntry) {
            self.entries.lock().expect("entries").insert(entry.id, entry);
        }
    }

    #[async_trait]
    impl RecordsBackend for FakeBackend {
        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn current_user(&self) -> Result<StaffUser, BackendError> {
            self.log("current_user");
            Ok(StaffUser {
                id: Uuid::from_u128(0x99),
                first_name: "mario".into(),
                last_name: "Rossi".into(),
                username: Some("mrossi".into()),
            })
        }

        async fn list_dossiers(&self, page_size: u32) -> Result<Page<Dossier>, BackendError> {
            self.log("list_dossiers");
            let items: Vec<Dossier> = self
                .dossiers
                .iter()
                .take(page_size as usize)
                .cloned()
                .collect();
            Ok(Page {
                total: items.len() as u64,
                items,
                page: 1,
                page_size,
                has_next: false,
            })
        }

        async fn get_dossier(&self, id: Uuid) -> Result<Dossier, BackendError> {
            self.log("get_dossier");
            self.dossiers
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or(BackendError::NotFound(None))
        }

        async fn get_patient(&self, id: Uuid) -> Result<Patient, BackendError> {
            self.log("get_patient");
            self.patients
                .get(&id)
                .cloned()
                .ok_or(BackendError::NotFound(None))
        }

        async fn get_entry(&self, id: Uuid) -> Result<ModuleEntry, BackendError> {
            self.log("get_entry");
            self.entries
                .lock()
                .expect("entries")
                .get(&id)
                .cloned()
                .ok_or(BackendError::NotFound(None))
        }

        async fn create_entry(&self, body: &EntryCreate) -> Result<ModuleEntry, BackendError> {
            self.log("create_entry");
            if let Some(err) = self.create_failure.lock().expect("failure").take() {
                return Err(err);
            }
            self.created.lock().expect("created").push(body.clone());
            let entry = ModuleEntry {
                id: Uuid::new_v4(),
                dossier_id: body.dossier_id,
                module_code: body.module_code.clone(),
                schema_version: body.schema_version,
                occurred_at: body.occurred_at,
                data: serde_json::to_value(&body.data).expect("serialise"),
                created_by_user_id: Some(Uuid::from_u128(0x99)),
                created_at: Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
                updated_at: None,
            };
            self.store(entry.clone());
            Ok(entry)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("date")
    }

    fn session(backend: FakeBackend) -> FormSession<FakeBackend> {
        FormSession::new(backend, ClientConfig::default()).with_today(today())
    }

    async fn ready_session() -> FormSession<FakeBackend> {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        s.select_dossier(DOSSIER_A).await.expect("select");
        s
    }

    fn stored_entry(data: serde_json::Value) -> ModuleEntry {
        ModuleEntry {
            id: Uuid::from_u128(0xe1),
            dossier_id: DOSSIER_A,
            module_code: moduli::MODULE_CODE.into(),
            schema_version: moduli::SCHEMA_VERSION,
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap(),
            data,
            created_by_user_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn open_create_requires_credential() {
        let mut s = session(FakeBackend::without_credential());
        let err = s.open_create().await.expect_err("no credential");
        assert!(matches!(err, FormError::LoginRequired));
        assert!(err.requires_login());
        assert_eq!(s.mode(), Mode::Closed);
        assert!(!s.backend().called("current_user"));
    }

    #[tokio::test]
    async fn open_create_starts_with_dependents_hidden() {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        assert_eq!(s.mode(), Mode::Create);
        assert_eq!(s.visibility().visible().count(), 0);
        assert_eq!(
            s.context().user.as_ref().map(StaffUser::full_name).as_deref(),
            Some("mario Rossi")
        );
    }

    #[tokio::test]
    async fn input_before_open_is_rejected() {
        let mut s = session(FakeBackend::new());
        let err = s.set_text(TextField::Firma, "x").expect_err("closed");
        assert!(matches!(
            err,
            FormError::WrongMode {
                expected: Mode::Create,
                actual: Mode::Closed
            }
        ));
    }

    #[tokio::test]
    async fn load_dossiers_skips_missing_patients() {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        let loaded = s.load_dossiers().await.expect("load");
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|d| d.dossier.id != DOSSIER_ORPHAN));
    }

    #[tokio::test]
    async fn search_matches_name_or_fiscal_code() {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        s.load_dossiers().await.expect("load");

        let by_name = s.search_dossiers("  anna BIA ");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].dossier.id, DOSSIER_A);

        let by_cf = s.search_dossiers("vrdlgu");
        assert_eq!(by_cf.len(), 1);
        assert_eq!(by_cf[0].dossier.id, DOSSIER_B);

        assert_eq!(s.search_dossiers("").len(), 2);
        assert!(s.search_dossiers("neri").is_empty());
    }

    #[tokio::test]
    async fn select_dossier_prefills_identification_and_signature() {
        let s = ready_session().await;
        let state = s.state();
        assert_eq!(state.text(TextField::InizNome), "M");
        assert_eq!(state.text(TextField::InizCognome), "R");
        assert_eq!(state.text(TextField::Dossier), DOSSIER_A.to_string());
        assert_eq!(state.choice(ChoiceField::Struttura), Some("R3D"));
        assert_eq!(state.text(TextField::PazienteNominativo), "Anna Bianchi");
        assert_eq!(state.number_input(IntField::Anno.into()), "2026");
        assert_eq!(state.number_input(IntField::NumeroProgressivo.into()), "1");
        assert_eq!(state.date_input(DateField::DataCompilazione), "2026-03-14");
        assert_eq!(state.text(TextField::InfermiereCompilatore), "mario Rossi");
    }

    #[tokio::test]
    async fn select_unknown_dossier_surfaces_single_message() {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        let err = s.select_dossier(Uuid::from_u128(0xdead)).await.expect_err("missing");
        assert_eq!(err.user_message(), "Errore nella selezione del dossier");
        assert!(s.context().selected.is_none());
    }

    #[tokio::test]
    async fn concrete_scenario_serialises_and_saves() {
        let mut s = ready_session().await;

        s.check(MultiField::Udito, "sordità", true).expect("udito");
        s.set_toggle(ToggleField::ProtesiUdito, false).expect("protesi");
        s.select(ChoiceField::TipologiaRespirazione, Some("normale")).expect("tipologia");
        s.select(ChoiceField::GradoAutonomiaUrinaria, Some("incontinente")).expect("urinaria");
        s.select(ChoiceField::IncontinenteTipo, Some("urgenza")).expect("incontinente");
        s.set_flag(FlagField::PatologieCroniche, Some(YesNo::Si)).expect("patologie");
        s.set_text(TextField::QualiPatologieCroniche, "diabete").expect("quali");

        let vis = s.visibility();
        assert!(vis.is_visible(Container::SorditaLato));
        assert!(!vis.is_visible(Container::ProtesiUditoLato));
        assert!(!vis.is_visible(Container::DispneaTipo));
        assert!(vis.is_visible(Container::IncontinenteTipo));
        assert!(vis.is_visible(Container::QualiPatologieCroniche));

        s.select(ChoiceField::SorditaLato, Some("sn")).expect("sordita lato");

        let value = serde_json::to_value(s.document()).expect("serialise");
        let anamnesi = &value["anamnesi_ed_esame_obiettivo"];
        assert_eq!(anamnesi["comunicazione"]["udito"], json!(["sordità"]));
        assert_eq!(anamnesi["comunicazione"]["sordita_lato"], json!("sn"));
        assert_eq!(anamnesi["comunicazione"]["protesi_udito"], json!(false));
        assert_eq!(anamnesi["respirazione"]["tipologia"], json!("normale"));
        assert_eq!(anamnesi["respirazione"]["dispnea_tipo"], json!([]));
        let urinaria = &anamnesi["eliminazione_vescicale_urinaria"];
        assert_eq!(urinaria["grado_autonomia"], json!("incontinente"));
        assert_eq!(urinaria["incontinente_tipo"], json!("urgenza"));
        assert_eq!(value["patologie_croniche"], json!(true));
        assert_eq!(value["quali_patologie_croniche"], json!("diabete"));

        s.set_text(TextField::Firma, "M. Rossi").expect("firma");
        let entry = s.save().await.expect("save");
        assert_eq!(entry.dossier_id, DOSSIER_A);
        assert_eq!(s.save_control(), SaveControl::Enabled);

        let created = s.backend().created.lock().expect("created").clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].module_code, "ROG26/1.4");
        assert_eq!(
            created[0].occurred_at,
            Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn required_field_gate_runs_before_network() {
        let cases: [(&dyn Fn(&mut FormSession<FakeBackend>), &str); 3] = [
            (
                &|s: &mut FormSession<FakeBackend>| s.set_date(DateField::DataCompilazione, "").expect("date"),
                "Inserisci la data di compilazione",
            ),
            (
                &|s: &mut FormSession<FakeBackend>| s.set_text(TextField::InfermiereCompilatore, "   ").expect("name"),
                "Inserisci il nome del compilatore",
            ),
            (
                &|s: &mut FormSession<FakeBackend>| s.set_text(TextField::Firma, "").expect("firma"),
                "Inserisci la firma",
            ),
        ];

        for (blank, message) in cases {
            let mut s = ready_session().await;
            s.set_text(TextField::Firma, "M. Rossi").expect("firma");
            blank(&mut s);
            let err = s.save().await.expect_err("gate");
            assert!(matches!(err, FormError::MissingRequired { .. }));
            assert_eq!(err.user_message(), message);
            assert!(!s.backend().called("create_entry"));
            assert_eq!(s.save_control(), SaveControl::Enabled);
        }
    }

    #[tokio::test]
    async fn unparsable_compilation_date_fails_the_gate() {
        let mut s = ready_session().await;
        s.set_text(TextField::Firma, "M. Rossi").expect("firma");
        s.set_date(DateField::DataCompilazione, "14/03/2026").expect("date");
        let err = s.save().await.expect_err("gate");
        assert_eq!(err.user_message(), "Inserisci la data di compilazione");
    }

    #[tokio::test]
    async fn save_requires_selected_dossier() {
        let mut s = session(FakeBackend::new());
        s.open_create().await.expect("open");
        let err = s.save().await.expect_err("no dossier");
        assert!(matches!(err, FormError::NoDossierSelected));
        assert_eq!(err.user_message(), "Seleziona prima un dossier");
    }

    #[tokio::test]
    async fn failed_save_reenables_control_and_allows_retry() {
        let mut s = ready_session().await;
        s.set_text(TextField::Firma, "M. Rossi").expect("firma");
        *s.backend().create_failure.lock().expect("failure") =
            Some(BackendError::Forbidden(None));

        let err = s.save().await.expect_err("forbidden");
        assert_eq!(
            err.user_message(),
            "Non hai i permessi per creare questo modulo."
        );
        assert_eq!(s.save_control(), SaveControl::Enabled);

        s.save().await.expect("retry succeeds");
        assert_eq!(s.backend().created.lock().expect("created").len(), 1);
    }

    #[tokio::test]
    async fn saved_entry_round_trips_through_view() {
        let mut s = ready_session().await;
        let inputs = json!({
            "udito": ["sordità"],
            "sordita_lato": "dx",
            "presa_arti_inferiori": "paralisi",
            "paralisi_arti_inferiori_lato": "sn",
            "tipo_dolore": ["cronico"],
            "sede_dolore_cronico": "lombare",
            "peso_kg": "70,5",
            "firma": "M. Rossi"
        });
        s.apply_inputs(inputs.as_object().expect("object")).expect("apply");
        let saved_doc = s.document();
        let entry = s.save().await.expect("save");

        let mut viewer = session(FakeBackend::new());
        viewer.backend().store(entry.clone());
        viewer.open_view(entry.id).await.expect("view");

        assert_eq!(viewer.mode(), Mode::View);
        assert!(viewer.state().is_disabled());
        assert_eq!(viewer.document(), saved_doc);
        assert!(viewer.visibility().is_visible(Container::SorditaLato));
        assert!(viewer.visibility().is_visible(Container::ParalisiArtiInferioriLato));
        assert!(viewer.visibility().is_visible(Container::SedeDoloreCronico));
        assert!(!viewer.visibility().is_visible(Container::SedeDoloreAcuto));
    }

    #[tokio::test]
    async fn failed_apply_inputs_leaves_state_and_visibility_untouched() {
        let mut s = ready_session().await;
        let state_before = s.state().clone();
        let visibility_before = s.visibility().clone();

        let inputs = json!({
            "udito": ["sordità"],
            "grado_autonomia_urinaria": "incontinente",
            "zzz": 1
        });
        let err = s
            .apply_inputs(inputs.as_object().expect("object"))
            .expect_err("unknown control");
        assert!(matches!(err, FormError::InvalidInput(_)));

        assert_eq!(s.state(), &state_before);
        assert_eq!(s.visibility(), &visibility_before);
        assert!(s.state().checked(MultiField::Udito).is_empty());
        assert!(!s.visibility().is_visible(Container::SorditaLato));
        assert!(!s.visibility().is_visible(Container::IncontinenteTipo));

        let valid = json!({ "udito": ["sordità"] });
        s.apply_inputs(valid.as_object().expect("object"))
            .expect("apply");
        assert!(s.visibility().is_visible(Container::SorditaLato));
    }

    #[tokio::test]
    async fn view_mode_rejects_input_and_save() {
        let backend = FakeBackend::new();
        backend.store(stored_entry(json!({ "firma": "M. Rossi" })));
        let mut s = session(backend);
        s.open_view(Uuid::from_u128(0xe1)).await.expect("view");

        assert!(matches!(
            s.set_text(TextField::Firma, "altro"),
            Err(FormError::ReadOnly)
        ));
        assert!(matches!(
            s.select(ChoiceField::Ansia, Some("lieve")),
            Err(FormError::ReadOnly)
        ));
        assert!(matches!(
            s.save().await,
            Err(FormError::WrongMode {
                expected: Mode::Create,
                actual: Mode::View
            })
        ));
        assert_eq!(s.state().text(TextField::Firma), "M. Rossi");
    }

    #[tokio::test]
    async fn view_reveals_filled_dependents_from_lenient_document() {
        let backend = FakeBackend::new();
        backend.store(stored_entry(json!({
            "patologie_croniche": true,
            "quali_patologie_croniche": "BPCO",
            "anamnesi_ed_esame_obiettivo": {
                "comunicazione": { "udito": "sordità" },
                "eliminazione_vescicale_urinaria": { "grado_autonomia": "regolare" }
            }
        })));
        let mut s = session(backend);
        s.open_view(Uuid::from_u128(0xe1)).await.expect("view");

        assert!(s.visibility().is_visible(Container::QualiPatologieCroniche));
        assert!(!s.visibility().is_visible(Container::SorditaLato));
        assert!(!s.visibility().is_visible(Container::IncontinenteTipo));
    }

    #[tokio::test]
    async fn malformed_document_blocks_view() {
        let backend = FakeBackend::new();
        backend.store(stored_entry(json!({ "paziente": { "colore_occhi": "verdi" } })));
        let mut s = session(backend);
        let err = s.open_view(Uuid::from_u128(0xe1)).await.expect_err("malformed");
        assert!(matches!(err, FormError::MalformedDocument(_)));
        assert_eq!(s.mode(), Mode::Closed);
        assert!(s.context().entry.is_none());
    }

    #[tokio::test]
    async fn absent_document_blocks_view() {
        let backend = FakeBackend::new();
        backend.store(stored_entry(serde_json::Value::Null));
        let mut s = session(backend);
        let err = s.open_view(Uuid::from_u128(0xe1)).await.expect_err("absent");
        assert_eq!(err.user_message(), "Dati modulo non disponibili");
    }

    #[tokio::test]
    async fn unregistered_schema_blocks_view() {
        let backend = FakeBackend::new();
        let mut entry = stored_entry(json!({}));
        entry.schema_version = 9;
        backend.store(entry);
        let mut s = session(backend);
        let err = s.open_view(Uuid::from_u128(0xe1)).await.expect_err("unregistered");
        assert!(matches!(
            err,
            FormError::MalformedDocument(moduli::ModuliError::SchemaNotRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn view_of_missing_entry_reports_not_found() {
        let mut s = session(FakeBackend::new());
        let err = s.open_view(Uuid::from_u128(0xe1)).await.expect_err("missing");
        assert_eq!(err.user_message(), "Modulo non trovato");
    }

    #[tokio::test]
    async fn start_new_entry_resets_state_visibility_and_selection() {
        let mut s = ready_session().await;
        s.load_dossiers().await.expect("load");
        s.check(MultiField::TipoDolore, "acuto", true).expect("check");
        assert!(s.visibility().is_visible(Container::SedeDoloreAcuto));

        s.start_new_entry();
        assert_eq!(s.state(), &FormState::new());
        assert_eq!(s.visibility().visible().count(), 0);
        assert!(s.context().selected.is_none());
        assert_eq!(s.context().dossiers.len(), 2);
        assert_eq!(s.mode(), Mode::Create);
    }
}
