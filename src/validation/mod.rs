//! Field validation and composite-key uniqueness for harvest submissions.

mod error;
mod field;
mod uniqueness;
mod validator;

pub use error::{ErrorKind, FieldError, FieldErrors};
pub use field::{AmountBounds, DateBounds, FieldBounds, FieldRule, HarvestField, PriceBounds};
pub use uniqueness::{DuplicateEntry, UniquenessError, check_uniqueness};
pub use validator::{FieldCheck, check_fields, validate_fields};
