use crate::domain::{HarvestForm, HarvestId, HarvestView, OwnerId};
use crate::routes::common::submission_failure;
use crate::store::HarvestStore;
use crate::submission::{SubmissionTarget, submit};
use actix_web::{HttpResponse, web};

#[tracing::instrument(skip(store, form))]
pub async fn edit_harvest<S: HarvestStore>(
    store: web::Data<S>,
    owner: OwnerId,
    path: web::Path<(i32,)>,
    form: web::Json<HarvestForm>,
) -> HttpResponse {
    let harvest_id = HarvestId(path.into_inner().0);

    match submit(
        store.get_ref(),
        owner,
        SubmissionTarget::Edit(harvest_id),
        &form,
    )
    .await
    {
        Ok(entry) => HttpResponse::Ok().json(HarvestView::from(&entry)),
        Err(e) => submission_failure(e),
    }
}
