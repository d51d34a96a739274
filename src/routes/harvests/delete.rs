use crate::domain::{HarvestId, OwnerId};
use crate::routes::common::store_failure;
use crate::store::HarvestStore;
use actix_web::{HttpResponse, web};

#[tracing::instrument(skip(store))]
pub async fn delete_harvest<S: HarvestStore>(
    store: web::Data<S>,
    owner: OwnerId,
    path: web::Path<(i32,)>,
) -> HttpResponse {
    let harvest_id = HarvestId(path.into_inner().0);

    match store.delete(owner, harvest_id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().body("Harvest not found."),
        Err(e) => store_failure(&e, "Error deleting harvest."),
    }
}
