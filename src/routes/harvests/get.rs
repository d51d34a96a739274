use crate::domain::{HarvestId, HarvestView, OwnerId};
use crate::routes::common::{HarvestListQuery, store_failure};
use crate::startup::ListingSettings;
use crate::store::HarvestStore;
use actix_web::{HttpResponse, web};

#[tracing::instrument(skip(store, listing))]
pub async fn list_harvests<S: HarvestStore>(
    store: web::Data<S>,
    listing: web::Data<ListingSettings>,
    owner: OwnerId,
    query: web::Query<HarvestListQuery>,
) -> HttpResponse {
    let page = query.page_request(listing.page_size);

    match store.list(owner, query.filter(), page).await {
        Ok(harvests) => HttpResponse::Ok().json(harvests.map(|entry| HarvestView::from(&entry))),
        Err(e) => store_failure(&e, "Error listing harvests."),
    }
}

#[tracing::instrument(skip(store))]
pub async fn get_harvest<S: HarvestStore>(
    store: web::Data<S>,
    owner: OwnerId,
    path: web::Path<(i32,)>,
) -> HttpResponse {
    let harvest_id = HarvestId(path.into_inner().0);

    match store.get(owner, harvest_id).await {
        Ok(Some(entry)) => HttpResponse::Ok().json(HarvestView::from(&entry)),
        Ok(None) => HttpResponse::NotFound().body("Harvest not found."),
        Err(e) => store_failure(&e, "Error loading harvest."),
    }
}
