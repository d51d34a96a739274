mod deletion_outcome;
mod fruit_kind;
mod fruit_totals;
mod harvest_entry;
mod harvest_filter;
mod harvest_form;
mod ids;
mod user;
mod validated_harvest;

pub use deletion_outcome::DeletionOutcome;
pub use fruit_kind::{FruitKind, UnknownFruit};
pub use fruit_totals::FruitTotals;
pub use harvest_entry::{HarvestEntry, HarvestView};
pub use harvest_filter::{HarvestFilter, Page, PageRequest};
pub use harvest_form::HarvestForm;
pub use ids::{HarvestId, OwnerId};
pub use user::{NewUser, User, UserSummary};
pub use validated_harvest::ValidatedHarvest;
