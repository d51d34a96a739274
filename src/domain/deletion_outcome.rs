use super::HarvestId;
use serde::Serialize;

/// Whether a requested id existed and was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome<I = HarvestId> {
    pub id: I,
    pub deleted: bool,
}
