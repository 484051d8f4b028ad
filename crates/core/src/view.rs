//! Typed view model of the form and its plain-text rendering.

use crate::constants::FORM_TITLE;
use crate::controls::FormState;
use crate::fields::{FieldKey, Section, YesNo};
use crate::session::{Mode, SessionContext};
use crate::visibility::VisibilityController;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct FormView {
    pub title: &'static str,
    pub mode_badge: &'static str,
    /// Patient and dossier the form refers to, when known.
    pub subject: Option<String>,
    pub sections: Vec<ViewSection>,
    pub audit: Option<AuditBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSection {
    pub title: &'static str,
    pub rows: Vec<ViewRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewRow {
    pub control: &'static str,
    pub label: String,
    pub value: String,
}

/// Record metadata shown in view mode.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditBlock {
    pub entry_id: Uuid,
    pub module_code: String,
    pub schema_version: u32,
    pub occurred_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FormView {
    pub fn build(
        mode: Mode,
        state: &FormState,
        visibility: &VisibilityController,
        context: &SessionContext,
    ) -> Self {
        let sections = Section::ALL
            .iter()
            .map(|section| ViewSection {
                title: section.title(),
                rows: section
                    .fields()
                    .filter(|f| visibility.is_field_visible(*f))
                    .map(|f| ViewRow {
                        control: f.id(),
                        label: f.label(),
                        value: display_value(state, f),
                    })
                    .collect(),
            })
            .collect();

        let subject = context.selected.as_ref().map(|s| {
            format!(
                "{} (dossier {})",
                s.patient.full_name(),
                s.dossier.id
            )
        });

        let audit = match mode {
            Mode::View => context.entry.as_ref().map(|e| AuditBlock {
                entry_id: e.id,
                module_code: e.module_code.clone(),
                schema_version: e.schema_version,
                occurred_at: e.occurred_at,
                created_by: e.created_by_user_id,
                created_at: e.created_at,
                updated_at: e.updated_at,
            }),
            _ => None,
        };

        Self {
            title: FORM_TITLE,
            mode_badge: match mode {
                Mode::Create => "Nuova compilazione",
                Mode::View => "Sola lettura",
                Mode::Closed => "Non aperto",
            },
            subject,
            sections,
            audit,
        }
    }

    /// The row for a control, if it is shown.
    pub fn row(&self, control: &str) -> Option<&ViewRow> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find(|r| r.control == control)
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "Sì" } else { "No" };
    text.to_string()
}

fn display_value(state: &FormState, field: FieldKey) -> String {
    match field {
        FieldKey::Text(f) => state.text(f).trim().to_string(),
        FieldKey::Int(f) => state.number_input(f.into()).trim().to_string(),
        FieldKey::Float(f) => state.number_input(f.into()).trim().to_string(),
        FieldKey::Date(f) => state.date_input(f).trim().to_string(),
        FieldKey::Flag(f) => state
            .flag(f)
            .map(|v| yes_no(v == YesNo::Si))
            .unwrap_or_default(),
        FieldKey::Toggle(f) => yes_no(state.toggle(f)),
        FieldKey::Choice(f) => state.choice(f).unwrap_or_default().to_string(),
        FieldKey::Multi(f) => state.checked(f).join(", "),
    }
}

/// Plain-text rendering. Blank values print as `-`.
impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.mode_badge)?;
        if let Some(subject) = &self.subject {
            writeln!(f, "{subject}")?;
        }

        for section in &self.sections {
            if section.rows.is_empty() {
                continue;
            }
            writeln!(f, "\n== {} ==", section.title)?;
            for row in &section.rows {
                let value = if row.value.is_empty() { "-" } else { row.value.as_str() };
                writeln!(f, "  {}: {}", row.label, value)?;
            }
        }

        if let Some(audit) = &self.audit {
            writeln!(f, "\n-- Registrazione --")?;
            writeln!(f, "  Voce: {}", audit.entry_id)?;
            writeln!(f, "  Modulo: {} v{}", audit.module_code, audit.schema_version)?;
            writeln!(f, "  Data evento: {}", audit.occurred_at.format("%d/%m/%Y"))?;
            if let Some(by) = audit.created_by {
                writeln!(f, "  Creato da: {by}")?;
            }
            writeln!(f, "  Creato il: {}", audit.created_at.format("%d/%m/%Y %H:%M"))?;
            if let Some(updated) = audit.updated_at {
                writeln!(f, "  Aggiornato il: {}", updated.format("%d/%m/%Y %H:%M"))?;
            }
        }
        Ok(())
    }
}

/// Render the view as plain text.
pub fn render_text(view: &FormView) -> String {
    view.to_string()
}
