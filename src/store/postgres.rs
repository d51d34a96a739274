use super::{HarvestStore, StoreError};
use crate::domain::{
    DeletionOutcome, FruitKind, FruitTotals, HarvestEntry, HarvestFilter, HarvestId, OwnerId,
    Page, PageRequest, UnknownFruit, User, UserSummary, ValidatedHarvest,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashSet;

/// Store backed by the `harvest` and `app_user` tables.
///
/// Uniqueness is the `unique_date_and_fruit_for_owner` constraint, see
/// `migrations/`.
#[derive(Debug, Clone)]
pub struct PgHarvestStore {
    pool: PgPool,
}

impl PgHarvestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Applies the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

const HARVEST_COLUMNS: &str = "harvest_id, owner, harvest_date, fruit, amount, price";

#[derive(sqlx::FromRow)]
struct HarvestRow {
    harvest_id: i32,
    owner: i32,
    harvest_date: NaiveDate,
    fruit: String,
    amount: i32,
    price: BigDecimal,
}

impl TryFrom<HarvestRow> for HarvestEntry {
    type Error = StoreError;

    fn try_from(row: HarvestRow) -> Result<Self, Self::Error> {
        let fruit = row
            .fruit
            .parse::<FruitKind>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(HarvestEntry {
            id: HarvestId(row.harvest_id),
            owner: OwnerId(row.owner),
            date: row.harvest_date,
            fruit,
            amount: row.amount,
            price: row.price,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FruitTotalsRow {
    fruit: String,
    harvests: i64,
    total_amount: i64,
    total_value: BigDecimal,
}

impl TryFrom<FruitTotalsRow> for FruitTotals {
    type Error = StoreError;

    fn try_from(row: FruitTotalsRow) -> Result<Self, Self::Error> {
        Ok(FruitTotals {
            fruit: row
                .fruit
                .parse()
                .map_err(|e: UnknownFruit| StoreError::Corrupt(e.to_string()))?,
            harvests: row.harvests,
            total_amount: row.total_amount,
            total_value: row.total_value,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: OwnerId(row.user_id),
            username: row.username,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    user_id: i32,
    username: String,
    harvest_count: i64,
}

fn into_entries(rows: Vec<HarvestRow>) -> Result<Vec<HarvestEntry>, StoreError> {
    rows.into_iter().map(HarvestEntry::try_from).collect()
}

/// Translates constraint violations of harvest writes into domain errors.
fn harvest_write_error(err: sqlx::Error, owner: OwnerId) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            tracing::warn!(%owner, "harvest rejected by unique constraint");
            return StoreError::Duplicate { existing: None };
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::UnknownOwner(owner);
        }
    }
    tracing::error!(error = ?err, %owner, "unable to write harvest");
    StoreError::Database(err)
}

impl HarvestStore for PgHarvestStore {
    #[tracing::instrument(skip(self))]
    async fn find_duplicate(
        &self,
        owner: OwnerId,
        date: NaiveDate,
        fruit: FruitKind,
        exclude: Option<HarvestId>,
    ) -> Result<Option<HarvestId>, StoreError> {
        let existing = sqlx::query_scalar::<_, i32>(
            "select harvest_id from harvest
             where owner = $1
               and harvest_date = $2
               and fruit = $3
               and ($4::int4 is null or harvest_id <> $4)
             limit 1",
        )
        .bind(owner.0)
        .bind(date)
        .bind(fruit.as_str())
        .bind(exclude.map(|id| id.0))
        .fetch_optional(&self.pool)
        .await?;

        Ok(existing.map(HarvestId))
    }

    #[tracing::instrument(skip(self))]
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError> {
        let row = sqlx::query_as::<_, HarvestRow>(&format!(
            "insert into harvest (owner, harvest_date, fruit, amount, price)
             values ($1, $2, $3, $4, $5)
             returning {HARVEST_COLUMNS}"
        ))
        .bind(owner.0)
        .bind(fields.date)
        .bind(fields.fruit.as_str())
        .bind(fields.amount)
        .bind(&fields.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| harvest_write_error(e, owner))?;

        row.try_into()
    }

    #[tracing::instrument(skip(self))]
    async fn update(
        &self,
        owner: OwnerId,
        id: HarvestId,
        fields: ValidatedHarvest,
    ) -> Result<HarvestEntry, StoreError> {
        let row = sqlx::query_as::<_, HarvestRow>(&format!(
            "update harvest
             set harvest_date = $3, fruit = $4, amount = $5, price = $6
             where harvest_id = $1 and owner = $2
             returning {HARVEST_COLUMNS}"
        ))
        .bind(id.0)
        .bind(owner.0)
        .bind(fields.date)
        .bind(fields.fruit.as_str())
        .bind(fields.amount)
        .bind(&fields.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| harvest_write_error(e, owner))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::NotFound),
        }
    }

    async fn get(
        &self,
        owner: OwnerId,
        id: HarvestId,
    ) -> Result<Option<HarvestEntry>, StoreError> {
        sqlx::query_as::<_, HarvestRow>(&format!(
            "select {HARVEST_COLUMNS} from harvest where harvest_id = $1 and owner = $2"
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await?
        .map(HarvestEntry::try_from)
        .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        owner: OwnerId,
        filter: HarvestFilter,
        page: PageRequest,
    ) -> Result<Page<HarvestEntry>, StoreError> {
        const MATCHING: &str = "from harvest
             where owner = $1
               and ($2::int4 is null or date_part('year', harvest_date)::int4 = $2)
               and ($3::text is null or fruit = $3)";

        let fruit = filter.fruit.map(|f| f.as_str());
        let mut transaction = self.pool.begin().await?;

        let total = sqlx::query_scalar::<_, i64>(&format!("select count(*) {MATCHING}"))
            .bind(owner.0)
            .bind(filter.year)
            .bind(fruit)
            .fetch_one(transaction.as_mut())
            .await?;

        let rows = sqlx::query_as::<_, HarvestRow>(&format!(
            "select {HARVEST_COLUMNS} {MATCHING}
             order by harvest_date, harvest_id
             limit $4 offset $5"
        ))
        .bind(owner.0)
        .bind(filter.year)
        .bind(fruit)
        .bind(i64::from(page.per_page()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(transaction.as_mut())
        .await?;

        transaction.commit().await?;

        Ok(Page::new(
            into_entries(rows)?,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }

    async fn recent(&self, owner: OwnerId, limit: u32) -> Result<Vec<HarvestEntry>, StoreError> {
        let rows = sqlx::query_as::<_, HarvestRow>(&format!(
            "select {HARVEST_COLUMNS} from harvest
             where owner = $1
             order by harvest_date desc, harvest_id desc
             limit $2"
        ))
        .bind(owner.0)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    async fn season_totals(
        &self,
        owner: OwnerId,
        year: i32,
    ) -> Result<Vec<FruitTotals>, StoreError> {
        let rows = sqlx::query_as::<_, FruitTotalsRow>(
            "select
               fruit,
               count(*) as harvests,
               coalesce(sum(amount), 0)::int8 as total_amount,
               coalesce(sum(price * amount), 0) as total_value
             from harvest
             where owner = $1
               and date_part('year', harvest_date)::int4 = $2
             group by fruit
             order by fruit",
        )
        .bind(owner.0)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FruitTotals::try_from).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, owner: OwnerId, id: HarvestId) -> Result<bool, StoreError> {
        let result = sqlx::query("delete from harvest where harvest_id = $1 and owner = $2")
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_harvests(&self) -> Result<i64, StoreError> {
        Ok(sqlx::query_scalar::<_, i64>("select count(*) from harvest")
            .fetch_one(&self.pool)
            .await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_harvests(
        &self,
        ids: &[HarvestId],
    ) -> Result<Vec<DeletionOutcome>, StoreError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        let mut deleted: HashSet<i32> = sqlx::query_scalar::<_, i32>(
            "delete from harvest where harvest_id = any($1) returning harvest_id",
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(ids
            .iter()
            .map(|&id| DeletionOutcome {
                id,
                deleted: deleted.remove(&id.0),
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "insert into app_user (username) values ($1) returning user_id, username",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UsernameTaken(username.to_owned())
            }
            _ => StoreError::Database(err),
        })?;

        Ok(row.into())
    }

    async fn get_user(&self, id: OwnerId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "select user_id, username from app_user where user_id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            "select u.user_id, u.username, count(h.harvest_id) as harvest_count
             from app_user u
             left join harvest h
               on h.owner = u.user_id
             group by u.user_id, u.username
             order by u.user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                id: OwnerId(row.user_id),
                username: row.username,
                harvest_count: row.harvest_count,
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, id: OwnerId) -> Result<bool, StoreError> {
        let result = sqlx::query("delete from app_user where user_id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Harvests go with their user through `on delete cascade`.
    #[tracing::instrument(skip(self))]
    async fn delete_users(
        &self,
        ids: &[OwnerId],
    ) -> Result<Vec<DeletionOutcome<OwnerId>>, StoreError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.0).collect();
        let mut deleted: HashSet<i32> = sqlx::query_scalar::<_, i32>(
            "delete from app_user where user_id = any($1) returning user_id",
        )
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(ids
            .iter()
            .map(|&id| DeletionOutcome {
                id,
                deleted: deleted.remove(&id.0),
            })
            .collect())
    }
}
