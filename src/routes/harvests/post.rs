use crate::domain::{HarvestForm, HarvestView, OwnerId};
use crate::routes::common::submission_failure;
use crate::startup::ApplicationBaseUrl;
use crate::store::HarvestStore;
use crate::submission::{SubmissionTarget, submit};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};

#[tracing::instrument(skip(store, base_url, form))]
pub async fn add_harvest<S: HarvestStore>(
    store: web::Data<S>,
    base_url: web::Data<ApplicationBaseUrl>,
    owner: OwnerId,
    form: web::Json<HarvestForm>,
) -> HttpResponse {
    match submit(store.get_ref(), owner, SubmissionTarget::Add, &form).await {
        Ok(entry) => HttpResponse::Created()
            .insert_header((LOCATION, format!("{}/harvests/{}", base_url.0, entry.id)))
            .json(HarvestView::from(&entry)),
        Err(e) => submission_failure(e),
    }
}
