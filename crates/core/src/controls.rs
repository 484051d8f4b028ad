//! Raw form-control state.
//!
//! [`FormState`] mirrors what the controls hold before serialisation: the literal input strings of
//! text, number and date controls, `si`/`no` selections, checkbox states and option selections.
//! Parsing happens in the [`serializer`](crate::serializer), never here.

use crate::error::{FormError, FormResult};
use crate::fields::{
    ChoiceField, DateField, FieldKey, FlagField, FloatField, IntField, MultiField, NumberField,
    TextField, ToggleField, YesNo,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    disabled: bool,
    text: BTreeMap<TextField, String>,
    ints: BTreeMap<IntField, String>,
    floats: BTreeMap<FloatField, String>,
    dates: BTreeMap<DateField, String>,
    flags: BTreeMap<FlagField, YesNo>,
    toggles: BTreeSet<ToggleField>,
    choices: BTreeMap<ChoiceField, &'static str>,
    checked: BTreeMap<MultiField, BTreeSet<&'static str>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether controls are non-interactive (view mode).
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn disable(&mut self) {
        self.disabled = true;
    }

    /// Return every control to its unset state, keeping the disabled flag.
    pub(crate) fn clear_values(&mut self) {
        let disabled = self.disabled;
        *self = Self {
            disabled,
            ..Self::default()
        };
    }

    fn ensure_editable(&self) -> FormResult<()> {
        if self.disabled {
            return Err(FormError::ReadOnly);
        }
        Ok(())
    }

    // Reads.

    pub fn text(&self, field: TextField) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn number_input(&self, field: NumberField) -> &str {
        let value = match field {
            NumberField::Int(f) => self.ints.get(&f),
            NumberField::Float(f) => self.floats.get(&f),
        };
        value.map(String::as_str).unwrap_or("")
    }

    pub fn date_input(&self, field: DateField) -> &str {
        self.dates.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn flag(&self, field: FlagField) -> Option<YesNo> {
        self.flags.get(&field).copied()
    }

    pub fn toggle(&self, field: ToggleField) -> bool {
        self.toggles.contains(&field)
    }

    pub fn choice(&self, field: ChoiceField) -> Option<&'static str> {
        self.choices.get(&field).copied()
    }

    pub fn is_checked(&self, field: MultiField, option: &str) -> bool {
        self.checked
            .get(&field)
            .is_some_and(|set| set.contains(option))
    }

    /// Checked options of a group, in rendering order.
    pub fn checked(&self, field: MultiField) -> Vec<&'static str> {
        field
            .options()
            .iter()
            .copied()
            .filter(|o| self.is_checked(field, o))
            .collect()
    }

    // User mutations. Each fails with `ReadOnly` once the state is disabled.

    pub fn set_text(&mut self, field: TextField, value: &str) -> FormResult<()> {
        self.ensure_editable()?;
        self.put_text(field, Some(value));
        Ok(())
    }

    pub fn set_number(&mut self, field: NumberField, value: &str) -> FormResult<()> {
        self.ensure_editable()?;
        match field {
            NumberField::Int(f) => self.put_int_input(f, value),
            NumberField::Float(f) => self.put_float_input(f, value),
        }
        Ok(())
    }

    pub fn set_date(&mut self, field: DateField, value: &str) -> FormResult<()> {
        self.ensure_editable()?;
        self.put_date_input(field, value);
        Ok(())
    }

    pub fn set_flag(&mut self, field: FlagField, value: Option<YesNo>) -> FormResult<()> {
        self.ensure_editable()?;
        self.put_flag(field, value);
        Ok(())
    }

    pub fn set_toggle(&mut self, field: ToggleField, checked: bool) -> FormResult<()> {
        self.ensure_editable()?;
        self.put_toggle(field, checked);
        Ok(())
    }

    /// Select an option of a group, or clear the selection with `None`.
    pub fn select(&mut self, field: ChoiceField, option: Option<&str>) -> FormResult<()> {
        self.ensure_editable()?;
        let resolved = match option {
            None => None,
            Some(value) => Some(field.option(value).ok_or_else(|| FormError::UnknownOption {
                field: field.id(),
                option: value.to_string(),
            })?),
        };
        match resolved {
            Some(o) => {
                self.choices.insert(field, o);
            }
            None => {
                self.choices.remove(&field);
            }
        }
        Ok(())
    }

    /// Check or uncheck one option of a checkbox group.
    pub fn check(&mut self, field: MultiField, option: &str, checked: bool) -> FormResult<()> {
        self.ensure_editable()?;
        let resolved = field.option(option).ok_or_else(|| FormError::UnknownOption {
            field: field.id(),
            option: option.to_string(),
        })?;
        let set = self.checked.entry(field).or_default();
        if checked {
            set.insert(resolved);
        } else {
            set.remove(resolved);
        }
        Ok(())
    }

    /// Fill controls from a JSON object keyed by control identifier.
    ///
    /// Text, number and date controls accept strings or numbers; `si`/`no` groups accept `"si"`,
    /// `"no"` or booleans; checkboxes accept booleans; option groups accept an option identifier
    /// and checkbox groups an array of identifiers (which replaces the current selection).
    /// `null` clears a control.
    ///
    /// The inputs are applied all or nothing: on any error the state is left as it was. Returns
    /// the keys that were applied, in control identifier order.
    pub fn apply_inputs(&mut self, inputs: &Map<String, Value>) -> FormResult<Vec<FieldKey>> {
        self.ensure_editable()?;
        let mut staged = self.clone();
        let applied = staged.apply_each(inputs)?;
        *self = staged;
        Ok(applied)
    }

    fn apply_each(&mut self, inputs: &Map<String, Value>) -> FormResult<Vec<FieldKey>> {
        let mut applied = Vec::with_capacity(inputs.len());

        for (id, value) in inputs {
            let key = FieldKey::from_control_id(id)
                .ok_or_else(|| FormError::InvalidInput(format!("unknown control '{id}'")))?;

            match key {
                FieldKey::Text(f) => {
                    let text = scalar_input(id, value)?;
                    self.set_text(f, &text)?;
                }
                FieldKey::Int(f) => {
                    let text = scalar_input(id, value)?;
                    self.set_number(f.into(), &text)?;
                }
                FieldKey::Float(f) => {
                    let text = scalar_input(id, value)?;
                    self.set_number(f.into(), &text)?;
                }
                FieldKey::Date(f) => {
                    let text = scalar_input(id, value)?;
                    self.set_date(f, &text)?;
                }
                FieldKey::Flag(f) => {
                    let selection = match value {
                        Value::Null => None,
                        Value::Bool(b) => Some(YesNo::from_bool(*b)),
                        Value::String(s) => Some(YesNo::parse(s).ok_or_else(|| {
                            FormError::UnknownOption {
                                field: f.id(),
                                option: s.clone(),
                            }
                        })?),
                        other => return Err(type_error(id, "\"si\", \"no\" or a boolean", other)),
                    };
                    self.set_flag(f, selection)?;
                }
                FieldKey::Toggle(f) => match value {
                    Value::Null => self.set_toggle(f, false)?,
                    Value::Bool(b) => self.set_toggle(f, *b)?,
                    other => return Err(type_error(id, "a boolean", other)),
                },
                FieldKey::Choice(f) => match value {
                    Value::Null => self.select(f, None)?,
                    Value::String(s) if s.is_empty() => self.select(f, None)?,
                    Value::String(s) => self.select(f, Some(s))?,
                    other => return Err(type_error(id, "an option identifier", other)),
                },
                FieldKey::Multi(f) => {
                    let options = match value {
                        Value::Null => Vec::new(),
                        Value::Array(items) => items
                            .iter()
                            .map(|item| match item {
                                Value::String(s) => Ok(s.as_str()),
                                other => Err(type_error(id, "an array of strings", other)),
                            })
                            .collect::<FormResult<Vec<_>>>()?,
                        other => return Err(type_error(id, "an array of strings", other)),
                    };
                    // Validate the whole group before touching it.
                    for option in &options {
                        if f.option(option).is_none() {
                            return Err(FormError::UnknownOption {
                                field: f.id(),
                                option: (*option).to_string(),
                            });
                        }
                    }
                    self.checked.remove(&f);
                    for option in options {
                        self.check(f, option, true)?;
                    }
                }
            }
            applied.push(key);
        }

        Ok(applied)
    }

    // Unchecked writes used by the populator and prefill. `None` leaves the control untouched.

    pub(crate) fn put_text(&mut self, field: TextField, value: Option<&str>) {
        if let Some(v) = value {
            self.text.insert(field, v.to_string());
        }
    }

    pub(crate) fn put_int_input(&mut self, field: IntField, value: &str) {
        self.ints.insert(field, value.to_string());
    }

    pub(crate) fn put_float_input(&mut self, field: FloatField, value: &str) {
        self.floats.insert(field, value.to_string());
    }

    pub(crate) fn put_date_input(&mut self, field: DateField, value: &str) {
        self.dates.insert(field, value.to_string());
    }

    pub(crate) fn put_flag(&mut self, field: FlagField, value: Option<YesNo>) {
        match value {
            Some(v) => {
                self.flags.insert(field, v);
            }
            None => {
                self.flags.remove(&field);
            }
        }
    }

    pub(crate) fn put_toggle(&mut self, field: ToggleField, checked: bool) {
        if checked {
            self.toggles.insert(field);
        } else {
            self.toggles.remove(&field);
        }
    }

    /// Select the option equal to `value`; a value outside the vocabulary selects nothing.
    pub(crate) fn put_choice(&mut self, field: ChoiceField, value: Option<&str>) -> bool {
        match value.and_then(|v| field.option(v)) {
            Some(o) => {
                self.choices.insert(field, o);
                true
            }
            None => {
                self.choices.remove(&field);
                false
            }
        }
    }

    /// Set every option of a group to whether it appears in `values`.
    pub(crate) fn put_checked(&mut self, field: MultiField, values: &[String]) {
        let set: BTreeSet<&'static str> = field
            .options()
            .iter()
            .copied()
            .filter(|o| values.iter().any(|v| v == o))
            .collect();
        self.checked.insert(field, set);
    }
}

fn scalar_input(id: &str, value: &Value) -> FormResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(type_error(id, "a string or number", other)),
    }
}

fn type_error(id: &str, expected: &str, found: &Value) -> FormError {
    FormError::InvalidInput(format!("control '{id}' expects {expected}, found {found}"))
}
