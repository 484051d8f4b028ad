//! Conditional visibility of dependent fields.
//!
//! Each dependent container is the target of exactly one rule. A container is visible iff its
//! rule's trigger currently holds the activating value, so the outcome of any sequence of changes
//! depends only on the final control state. Visibility is presentation only and never touches
//! control values.

use crate::controls::FormState;
use crate::fields::{
    ChoiceField, FieldKey, FlagField, MultiField, TextField, ToggleField, YesNo,
};
use std::collections::BTreeSet;

/// A dependent container that is hidden unless its trigger is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    SorditaLato,
    ProtesiUditoLato,
    DispneaTipo,
    AltroEscursioneArticolare,
    DebolezzaManiLato,
    ParalisiManiLato,
    DebolezzaArtiInferioriLato,
    ParalisiArtiInferioriLato,
    SedeDoloreAcuto,
    SedeDoloreCronico,
    IncontinenteTipo,
    QualiPatologieCroniche,
}

impl Container {
    pub const ALL: &'static [Container] = &[
        Container::SorditaLato,
        Container::ProtesiUditoLato,
        Container::DispneaTipo,
        Container::AltroEscursioneArticolare,
        Container::DebolezzaManiLato,
        Container::ParalisiManiLato,
        Container::DebolezzaArtiInferioriLato,
        Container::ParalisiArtiInferioriLato,
        Container::SedeDoloreAcuto,
        Container::SedeDoloreCronico,
        Container::IncontinenteTipo,
        Container::QualiPatologieCroniche,
    ];

    /// The control wrapped by this container.
    pub fn field(self) -> FieldKey {
        match self {
            Container::SorditaLato => FieldKey::Choice(ChoiceField::SorditaLato),
            Container::ProtesiUditoLato => FieldKey::Choice(ChoiceField::ProtesiUditoLato),
            Container::DispneaTipo => FieldKey::Multi(MultiField::DispneaTipo),
            Container::AltroEscursioneArticolare => {
                FieldKey::Text(TextField::AltroEscursioneArticolare)
            }
            Container::DebolezzaManiLato => FieldKey::Choice(ChoiceField::DebolezzaManiLato),
            Container::ParalisiManiLato => FieldKey::Choice(ChoiceField::ParalisiManiLato),
            Container::DebolezzaArtiInferioriLato => {
                FieldKey::Choice(ChoiceField::DebolezzaArtiInferioriLato)
            }
            Container::ParalisiArtiInferioriLato => {
                FieldKey::Choice(ChoiceField::ParalisiArtiInferioriLato)
            }
            Container::SedeDoloreAcuto => FieldKey::Text(TextField::SedeDoloreAcuto),
            Container::SedeDoloreCronico => FieldKey::Text(TextField::SedeDoloreCronico),
            Container::IncontinenteTipo => FieldKey::Choice(ChoiceField::IncontinenteTipo),
            Container::QualiPatologieCroniche => FieldKey::Text(TextField::QualiPatologieCroniche),
        }
    }

    /// The container wrapping `field`, if it is a dependent field.
    pub fn of(field: FieldKey) -> Option<Container> {
        Container::ALL.iter().copied().find(|c| c.field() == field)
    }
}

/// Condition on a trigger control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Contains(MultiField, &'static str),
    Checked(ToggleField),
    Equals(ChoiceField, &'static str),
    Flag(FlagField, YesNo),
}

impl Trigger {
    pub fn control(self) -> FieldKey {
        match self {
            Trigger::Contains(f, _) => FieldKey::Multi(f),
            Trigger::Checked(f) => FieldKey::Toggle(f),
            Trigger::Equals(f, _) => FieldKey::Choice(f),
            Trigger::Flag(f, _) => FieldKey::Flag(f),
        }
    }

    pub fn holds(self, state: &FormState) -> bool {
        match self {
            Trigger::Contains(f, option) => state.is_checked(f, option),
            Trigger::Checked(f) => state.toggle(f),
            Trigger::Equals(f, option) => state.choice(f) == Some(option),
            Trigger::Flag(f, value) => state.flag(f) == Some(value),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub trigger: Trigger,
    pub container: Container,
}

const fn rule(trigger: Trigger, container: Container) -> Rule {
    Rule { trigger, container }
}

pub static RULES: &[Rule] = &[
    rule(
        Trigger::Contains(MultiField::Udito, "sordità"),
        Container::SorditaLato,
    ),
    rule(
        Trigger::Checked(ToggleField::ProtesiUdito),
        Container::ProtesiUditoLato,
    ),
    rule(
        Trigger::Equals(ChoiceField::TipologiaRespirazione, "dispnea"),
        Container::DispneaTipo,
    ),
    rule(
        Trigger::Equals(ChoiceField::EscursioneArticolare, "altro"),
        Container::AltroEscursioneArticolare,
    ),
    rule(
        Trigger::Equals(ChoiceField::PresaMani, "debolezza"),
        Container::DebolezzaManiLato,
    ),
    rule(
        Trigger::Equals(ChoiceField::PresaMani, "paralisi"),
        Container::ParalisiManiLato,
    ),
    rule(
        Trigger::Equals(ChoiceField::PresaArtiInferiori, "debolezza"),
        Container::DebolezzaArtiInferioriLato,
    ),
    rule(
        Trigger::Equals(ChoiceField::PresaArtiInferiori, "paralisi"),
        Container::ParalisiArtiInferioriLato,
    ),
    rule(
        Trigger::Contains(MultiField::TipoDolore, "acuto"),
        Container::SedeDoloreAcuto,
    ),
    rule(
        Trigger::Contains(MultiField::TipoDolore, "cronico"),
        Container::SedeDoloreCronico,
    ),
    rule(
        Trigger::Equals(ChoiceField::GradoAutonomiaUrinaria, "incontinente"),
        Container::IncontinenteTipo,
    ),
    rule(
        Trigger::Flag(FlagField::PatologieCroniche, YesNo::Si),
        Container::QualiPatologieCroniche,
    ),
];

/// Visible dependent containers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityController {
    visible: BTreeSet<Container>,
}

impl VisibilityController {
    /// All dependent containers hidden.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, container: Container) -> bool {
        self.visible.contains(&container)
    }

    /// Whether a control is shown: non-dependent controls always are.
    pub fn is_field_visible(&self, field: FieldKey) -> bool {
        Container::of(field).map_or(true, |c| self.is_visible(c))
    }

    pub fn visible(&self) -> impl Iterator<Item = Container> + '_ {
        self.visible.iter().copied()
    }

    /// Fire the rules triggered by `changed`.
    pub fn on_change(&mut self, changed: FieldKey, state: &FormState) {
        for r in RULES.iter().filter(|r| r.trigger.control() == changed) {
            self.apply(r, state);
        }
    }

    /// Fire every rule once.
    pub fn evaluate_all(&mut self, state: &FormState) {
        for r in RULES {
            self.apply(r, state);
        }
    }

    pub fn reset(&mut self) {
        self.visible.clear();
    }

    fn apply(&mut self, rule: &Rule, state: &FormState) {
        let show = rule.trigger.holds(state);
        tracing::debug!(container = ?rule.container, show, "visibility rule fired");
        if show {
            self.visible.insert(rule.container);
        } else {
            self.visible.remove(&rule.container);
        }
    }
}
