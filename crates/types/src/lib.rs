//! Validated text shared by the cartella crates.

/// Why a piece of text was rejected.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("text is blank")]
    Empty,

    #[error("text is longer than {max} characters")]
    TooLong { max: usize },
}

/// Trimmed text with at least one non-whitespace character.
///
/// Used wherever a blank value must count as missing: required signature fields, staff
/// initials, bounded names in stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], also rejecting text of more than `max` characters (not bytes)
    /// once trimmed.
    pub fn bounded(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(text)
    }

    /// Missing or blank input is `None`.
    pub fn optional(input: Option<&str>) -> Option<Self> {
        input.and_then(|s| Self::new(s).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
