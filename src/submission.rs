//! Add and edit flows for harvest entries.
//!
//! A submission moves `Unvalidated → FieldsChecked → UniquenessChecked →
//! Accepted`, or ends in `Rejected` after either check. The store has the
//! final say on uniqueness: a collision it reports after the pre-check passed
//! still ends in `Rejected`.

use crate::domain::{HarvestEntry, HarvestForm, HarvestId, OwnerId, ValidatedHarvest};
use crate::store::{HarvestStore, StoreError};
use crate::validation::{
    DuplicateEntry, FieldCheck, FieldError, FieldErrors, UniquenessError, check_fields,
    check_uniqueness,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTarget {
    Add,
    Edit(HarvestId),
}

impl SubmissionTarget {
    /// The entry that may keep its own key.
    fn excluded(&self) -> Option<HarvestId> {
        match self {
            SubmissionTarget::Add => None,
            SubmissionTarget::Edit(id) => Some(*id),
        }
    }
}

#[derive(Debug)]
pub enum SubmissionState {
    Unvalidated,
    FieldsChecked(FieldCheck),
    UniquenessChecked(ValidatedHarvest),
    Accepted(HarvestEntry),
    Rejected(FieldErrors),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Unvalidated => "unvalidated",
            SubmissionState::FieldsChecked(_) => "fields_checked",
            SubmissionState::UniquenessChecked(_) => "uniqueness_checked",
            SubmissionState::Accepted(_) => "accepted",
            SubmissionState::Rejected(_) => "rejected",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("harvest rejected: {0}")]
    Rejected(FieldErrors),
    #[error("harvest not found")]
    NotFound,
    #[error("owner {0} does not exist")]
    UnknownOwner(OwnerId),
    #[error("harvest store failed")]
    Store(#[source] StoreError),
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => SubmissionError::NotFound,
            StoreError::UnknownOwner(owner) => SubmissionError::UnknownOwner(owner),
            other => SubmissionError::Store(other),
        }
    }
}

/// Runs a submission through every stage and returns the stored entry.
///
/// On edit the entry must belong to `owner`; the owner itself never changes.
#[tracing::instrument(skip(store, form))]
pub async fn submit<S: HarvestStore>(
    store: &S,
    owner: OwnerId,
    target: SubmissionTarget,
    form: &HarvestForm,
) -> Result<HarvestEntry, SubmissionError> {
    if let SubmissionTarget::Edit(id) = target {
        if store.get(owner, id).await?.is_none() {
            return Err(SubmissionError::NotFound);
        }
    }

    let mut state = SubmissionState::Unvalidated;
    loop {
        state = match state {
            SubmissionState::Unvalidated => SubmissionState::FieldsChecked(check_fields(form)),
            SubmissionState::FieldsChecked(check) => {
                check_key(store, owner, target, check).await?
            }
            SubmissionState::UniquenessChecked(fields) => {
                persist(store, owner, target, fields).await?
            }
            SubmissionState::Accepted(entry) => {
                tracing::info!(harvest = %entry.id, "harvest stored");
                return Ok(entry);
            }
            SubmissionState::Rejected(errors) => {
                tracing::info!(%errors, "harvest rejected");
                return Err(SubmissionError::Rejected(errors));
            }
        };
        tracing::debug!(state = state.name(), "submission advanced");
    }
}

/// Looks for a key collision whenever date and fruit are usable, so that a
/// duplicate is itemized next to failures of the remaining fields.
async fn check_key<S: HarvestStore>(
    store: &S,
    owner: OwnerId,
    target: SubmissionTarget,
    check: FieldCheck,
) -> Result<SubmissionState, SubmissionError> {
    let duplicate = match check.composite_key() {
        Some((date, fruit)) => {
            match check_uniqueness(store, owner, date, fruit, target.excluded()).await {
                Ok(()) => None,
                Err(UniquenessError::Duplicate(duplicate)) => Some(duplicate),
                Err(UniquenessError::Store(err)) => return Err(err.into()),
            }
        }
        None => None,
    };

    Ok(match (check.into_result(), duplicate) {
        (Ok(fields), None) => SubmissionState::UniquenessChecked(fields),
        (Ok(_), Some(duplicate)) => SubmissionState::Rejected(FieldError::from(duplicate).into()),
        (Err(mut errors), duplicate) => {
            if let Some(duplicate) = duplicate {
                errors.push(duplicate.into());
            }
            SubmissionState::Rejected(errors)
        }
    })
}

async fn persist<S: HarvestStore>(
    store: &S,
    owner: OwnerId,
    target: SubmissionTarget,
    fields: ValidatedHarvest,
) -> Result<SubmissionState, SubmissionError> {
    let stored = match target {
        SubmissionTarget::Add => store.insert(owner, fields).await,
        SubmissionTarget::Edit(id) => store.update(owner, id, fields).await,
    };

    match stored {
        Ok(entry) => Ok(SubmissionState::Accepted(entry)),
        Err(StoreError::Duplicate { existing }) => {
            tracing::warn!(%owner, "store rejected a key that passed the pre-check");
            Ok(SubmissionState::Rejected(
                FieldError::from(DuplicateEntry { existing }).into(),
            ))
        }
        Err(err) => Err(err.into()),
    }
}
