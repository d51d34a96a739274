use super::{HarvestStore, StoreError};
use crate::domain::{
    DeletionOutcome, FruitKind, FruitTotals, HarvestEntry, HarvestFilter, HarvestId, OwnerId,
    Page, PageRequest, User, UserSummary, ValidatedHarvest,
};
use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Process-local store.
///
/// A single lock is held across the duplicate check and the write, which makes
/// insert and update a compare-and-swap on the composite key.
#[derive(Debug, Default)]
pub struct InMemoryHarvestStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_user_id: i32,
    last_harvest_id: i32,
    users: BTreeMap<OwnerId, String>,
    harvests: BTreeMap<HarvestId, HarvestEntry>,
}

impl State {
    fn duplicate_of(
        &self,
        owner: OwnerId,
        date: NaiveDate,
        fruit: FruitKind,
        exclude: Option<HarvestId>,
    ) -> Option<HarvestId> {
        self.harvests
            .values()
            .find(|h| {
                h.owner == owner && h.date == date && h.fruit == fruit && Some(h.id) != exclude
            })
            .map(|h| h.id)
    }

    fn owned_by(&self, owner: OwnerId) -> impl Iterator<Item = &HarvestEntry> {
        self.harvests.values().filter(move |h| h.owner == owner)
    }

    /// Removes the user and every harvest they own.
    fn remove_user(&mut self, id: OwnerId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        self.harvests.retain(|_, h| h.owner != id);
        true
    }
}

impl HarvestStore for InMemoryHarvestStore {
    async fn find_duplicate(
        &self,
        owner: OwnerId,
        date: NaiveDate,
        fruit: FruitKind,
        exclude: Option<HarvestId>,
    ) -> Result<Option<HarvestId>, StoreError> {
        Ok(self.state.lock().duplicate_of(owner, date, fruit, exclude))
    }

    #[tracing::instrument(skip(self))]
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&owner) {
            return Err(StoreError::UnknownOwner(owner));
        }
        if let Some(existing) = state.duplicate_of(owner, fields.date, fields.fruit, None) {
            return Err(StoreError::Duplicate {
                existing: Some(existing),
            });
        }

        state.last_harvest_id += 1;
        let id = HarvestId(state.last_harvest_id);
        let entry = HarvestEntry::from_fields(id, owner, fields);
        state.harvests.insert(id, entry.clone());
        Ok(entry)
    }

    #[tracing::instrument(skip(self))]
    async fn update(
        &self,
        owner: OwnerId,
        id: HarvestId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError> {
        let mut state = self.state.lock();
        match state.harvests.get(&id) {
            Some(entry) if entry.owner == owner => {}
            _ => return Err(StoreError::NotFound),
        }
        if let Some(existing) = state.duplicate_of(owner, fields.date, fields.fruit, Some(id)) {
            return Err(StoreError::Duplicate {
                existing: Some(existing),
            });
        }

        let entry = HarvestEntry::from_fields(id, owner, fields);
        state.harvests.insert(id, entry.clone());
        Ok(entry)
    }

    async fn get(
        &self,
        owner: OwnerId,
        id: HarvestId,
    ) -> Result<Option<HarvestEntry>, StoreError> {
        let state = self.state.lock();
        Ok(state.harvests.get(&id).filter(|h| h.owner == owner).cloned())
    }

    async fn list(
        &self,
        owner: OwnerId,
        filter: HarvestFilter,
        page: PageRequest,
    ) -> Result<Page<HarvestEntry>, StoreError> {
        let state = self.state.lock();
        let mut matching: Vec<&HarvestEntry> = state
            .owned_by(owner)
            .filter(|h| filter.matches(h.date.year(), h.fruit))
            .collect();
        matching.sort_by_key(|h| (h.date, h.id));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.per_page() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, page, total))
    }

    async fn recent(&self, owner: OwnerId, limit: u32) -> Result<Vec<HarvestEntry>, StoreError> {
        let state = self.state.lock();
        let mut entries: Vec<&HarvestEntry> = state.owned_by(owner).collect();
        entries.sort_by_key(|h| Reverse((h.date, h.id)));
        Ok(entries
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn season_totals(
        &self,
        owner: OwnerId,
        year: i32,
    ) -> Result<Vec<FruitTotals>, StoreError> {
        let state = self.state.lock();
        let mut totals: BTreeMap<&'static str, FruitTotals> = BTreeMap::new();
        for entry in state.owned_by(owner).filter(|h| h.date.year() == year) {
            let row = totals
                .entry(entry.fruit.as_str())
                .or_insert_with(|| FruitTotals {
                    fruit: entry.fruit,
                    harvests: 0,
                    total_amount: 0,
                    total_value: BigDecimal::from(0),
                });
            row.harvests += 1;
            row.total_amount += i64::from(entry.amount);
            row.total_value += entry.value();
        }
        Ok(totals.into_values().collect())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, owner: OwnerId, id: HarvestId) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        let owned = state.harvests.get(&id).is_some_and(|h| h.owner == owner);
        if owned {
            state.harvests.remove(&id);
        }
        Ok(owned)
    }

    async fn count_harvests(&self) -> Result<i64, StoreError> {
        Ok(self.state.lock().harvests.len() as i64)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_harvests(
        &self,
        ids: &[HarvestId],
    ) -> Result<Vec<DeletionOutcome>, StoreError> {
        let mut state = self.state.lock();
        Ok(ids
            .iter()
            .map(|&id| DeletionOutcome {
                id,
                deleted: state.harvests.remove(&id).is_some(),
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let mut state = self.state.lock();
        if state.users.values().any(|name| name == username) {
            return Err(StoreError::UsernameTaken(username.to_owned()));
        }

        state.last_user_id += 1;
        let id = OwnerId(state.last_user_id);
        state.users.insert(id, username.to_owned());
        Ok(User {
            id,
            username: username.to_owned(),
        })
    }

    async fn get_user(&self, id: OwnerId) -> Result<Option<User>, StoreError> {
        let state = self.state.lock();
        Ok(state.users.get(&id).map(|username| User {
            id,
            username: username.clone(),
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let state = self.state.lock();
        Ok(state
            .users
            .iter()
            .map(|(&id, username)| UserSummary {
                id,
                username: username.clone(),
                harvest_count: state.owned_by(id).count() as i64,
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, id: OwnerId) -> Result<bool, StoreError> {
        Ok(self.state.lock().remove_user(id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_users(
        &self,
        ids: &[OwnerId],
    ) -> Result<Vec<DeletionOutcome<OwnerId>>, StoreError> {
        let mut state = self.state.lock();
        Ok(ids
            .iter()
            .map(|&id| DeletionOutcome {
                id,
                deleted: state.remove_user(id),
            })
            .collect())
    }
}
