use super::HarvestField;
use serde::Serialize;
use std::fmt;

/// Classification of a rejected submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    MissingField,
    DateTooEarly,
    InvalidChoice,
    AmountOutOfBounds,
    PriceOutOfBounds,
    PriceMalformed,
    DuplicateEntry,
}

/// One user-correctable problem with a submission.
///
/// `field` is `None` for errors concerning the entry as a whole, which is the
/// case for [`ErrorKind::DuplicateEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Option<HarvestField>,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: HarvestField, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: HarvestField) -> Self {
        Self::new(field, ErrorKind::MissingField, "This field is required.")
    }
}

/// Every error found for a single submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn for_field(&self, field: HarvestField) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.field == Some(field))
    }

    /// True when the only problem is a key collision.
    pub fn is_duplicate_only(&self) -> bool {
        !self.errors.is_empty() && self.errors.iter().all(|e| e.kind == ErrorKind::DuplicateEntry)
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            match error.field {
                Some(field) => write!(f, "{}: {}", field, error.message)?,
                None => write!(f, "{}", error.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
