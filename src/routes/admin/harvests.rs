use crate::domain::HarvestId;
use crate::routes::common::store_failure;
use crate::store::HarvestStore;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HarvestIds {
    /// **Example:** `[4, 8, 15]`
    ids: Vec<HarvestId>,
}

#[tracing::instrument(skip(store))]
pub async fn count_harvests<S: HarvestStore>(store: web::Data<S>) -> HttpResponse {
    match store.count_harvests().await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "count": count })),
        Err(e) => store_failure(&e, "Error counting harvests."),
    }
}

/// Deletes harvests of any owner, reporting which ids existed.
#[tracing::instrument(skip(store))]
pub async fn delete_harvests<S: HarvestStore>(
    store: web::Data<S>,
    body: web::Json<HarvestIds>,
) -> HttpResponse {
    if body.ids.is_empty() {
        return HttpResponse::BadRequest().body("Provide at least one harvest id.");
    }

    match store.delete_harvests(&body.ids).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => store_failure(&e, "Error deleting harvests."),
    }
}
