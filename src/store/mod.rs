//! Persistence of harvest entries and their owners.
//!
//! Every implementation enforces the `(owner, date, fruit)` uniqueness
//! atomically on insert and update, independent of any pre-check done by the
//! caller.

mod memory;
mod postgres;

pub use memory::InMemoryHarvestStore;
pub use postgres::{PgHarvestStore, migrate};

use crate::domain::{
    DeletionOutcome, FruitKind, FruitTotals, HarvestEntry, HarvestFilter, HarvestId, OwnerId,
    Page, PageRequest, User, UserSummary, ValidatedHarvest,
};
use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a harvest with this date, owner and fruit already exists")]
    Duplicate { existing: Option<HarvestId> },
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
    #[error("harvest not found")]
    NotFound,
    #[error("owner {0} does not exist")]
    UnknownOwner(OwnerId),
    #[error("stored row is invalid: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[allow(async_fn_in_trait)]
pub trait HarvestStore: Send + Sync + 'static {
    /// Id of an entry of `owner` with the given date and fruit, other than `exclude`.
    async fn find_duplicate(
        &self,
        owner: OwnerId,
        date: NaiveDate,
        fruit: FruitKind,
        exclude: Option<HarvestId>,
    ) -> Result<Option<HarvestId>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the composite key is taken.
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError>;

    /// Replaces every field but `id` and `owner`. Fails with
    /// [`StoreError::NotFound`] when `owner` has no entry `id`.
    async fn update(
        &self,
        owner: OwnerId,
        id: HarvestId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError>;

    async fn get(&self, owner: OwnerId, id: HarvestId)
    -> Result<Option<HarvestEntry>, StoreError>;

    /// Ordered by date, then id.
    async fn list(
        &self,
        owner: OwnerId,
        filter: HarvestFilter,
        page: PageRequest,
    ) -> Result<Page<HarvestEntry>, StoreError>;

    /// Newest first.
    async fn recent(&self, owner: OwnerId, limit: u32) -> Result<Vec<HarvestEntry>, StoreError>;

    /// Per fruit aggregates for one calendar year, ordered by fruit key.
    async fn season_totals(&self, owner: OwnerId, year: i32)
    -> Result<Vec<FruitTotals>, StoreError>;

    async fn delete(&self, owner: OwnerId, id: HarvestId) -> Result<bool, StoreError>;

    async fn count_harvests(&self) -> Result<i64, StoreError>;

    /// Deletes regardless of owner, reporting the outcome per requested id.
    async fn delete_harvests(&self, ids: &[HarvestId])
    -> Result<Vec<DeletionOutcome>, StoreError>;

    async fn create_user(&self, username: &str) -> Result<User, StoreError>;

    async fn get_user(&self, id: OwnerId) -> Result<Option<User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Also deletes every harvest of the user.
    async fn delete_user(&self, id: OwnerId) -> Result<bool, StoreError>;

    /// [`HarvestStore::delete_user`] for several users, reporting the outcome
    /// per requested id.
    async fn delete_users(
        &self,
        ids: &[OwnerId],
    ) -> Result<Vec<DeletionOutcome<OwnerId>>, StoreError>;
}
