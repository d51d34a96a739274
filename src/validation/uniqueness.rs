use super::{ErrorKind, FieldError};
use crate::domain::{FruitKind, HarvestId, OwnerId};
use crate::store::{HarvestStore, StoreError};
use chrono::NaiveDate;

/// Another entry of the same owner already uses the `(date, fruit)` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Harvest with this Date, Owner and Fruit already exists.")]
pub struct DuplicateEntry {
    /// The colliding entry, when the store could name it.
    pub existing: Option<HarvestId>,
}

impl From<DuplicateEntry> for FieldError {
    fn from(duplicate: DuplicateEntry) -> Self {
        FieldError {
            field: None,
            kind: ErrorKind::DuplicateEntry,
            message: duplicate.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UniquenessError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateEntry),
    #[error("unable to look up existing harvests")]
    Store(#[from] StoreError),
}

/// Fails when `owner` already has another entry for `date` and `fruit`.
///
/// `exclude` names the entry being edited, so an entry never collides with
/// itself. Read-only.
#[tracing::instrument(skip(store))]
pub async fn check_uniqueness<S: HarvestStore>(
    store: &S,
    owner: OwnerId,
    date: NaiveDate,
    fruit: FruitKind,
    exclude: Option<HarvestId>,
) -> Result<(), UniquenessError> {
    match store.find_duplicate(owner, date, fruit, exclude).await? {
        Some(existing) => {
            tracing::debug!(%existing, "composite key already taken");
            Err(DuplicateEntry {
                existing: Some(existing),
            }
            .into())
        }
        None => Ok(()),
    }
}
