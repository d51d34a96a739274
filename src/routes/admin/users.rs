use crate::domain::{HarvestView, NewUser, OwnerId};
use crate::routes::common::{HarvestListQuery, store_failure};
use crate::startup::ListingSettings;
use crate::store::{HarvestStore, StoreError};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserIds {
    /// **Example:** `[2, 3]`
    ids: Vec<OwnerId>,
}

#[tracing::instrument(skip(store))]
pub async fn create_user<S: HarvestStore>(
    store: web::Data<S>,
    new_user: web::Json<NewUser>,
) -> HttpResponse {
    let username = new_user.username.trim();
    if username.is_empty() {
        return HttpResponse::BadRequest().body("Username must not be empty.");
    }

    match store.create_user(username).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(StoreError::UsernameTaken(name)) => {
            HttpResponse::Conflict().body(format!("Username {name} is already taken."))
        }
        Err(e) => store_failure(&e, "Error creating user."),
    }
}

#[tracing::instrument(skip(store))]
pub async fn list_users<S: HarvestStore>(store: web::Data<S>) -> HttpResponse {
    match store.list_users().await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => store_failure(&e, "Error listing users."),
    }
}

/// Removes the user together with every harvest they own.
#[tracing::instrument(skip(store))]
pub async fn delete_user<S: HarvestStore>(
    store: web::Data<S>,
    path: web::Path<(i32,)>,
) -> HttpResponse {
    let user_id = OwnerId(path.into_inner().0);

    match store.delete_user(user_id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().body("User not found."),
        Err(e) => store_failure(&e, "Error deleting user."),
    }
}

/// Removes several users with their harvests, reporting which ids existed.
#[tracing::instrument(skip(store))]
pub async fn delete_users<S: HarvestStore>(
    store: web::Data<S>,
    body: web::Json<UserIds>,
) -> HttpResponse {
    if body.ids.is_empty() {
        return HttpResponse::BadRequest().body("Provide at least one user id.");
    }

    match store.delete_users(&body.ids).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => store_failure(&e, "Error deleting users."),
    }
}

/// Harvests of any user, filtered and paged like the owner's own listing.
#[tracing::instrument(skip(store, listing))]
pub async fn list_user_harvests<S: HarvestStore>(
    store: web::Data<S>,
    listing: web::Data<ListingSettings>,
    path: web::Path<(i32,)>,
    query: web::Query<HarvestListQuery>,
) -> HttpResponse {
    let user_id = OwnerId(path.into_inner().0);

    let user = match store.get_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return HttpResponse::NotFound().body("User with given id does not exist."),
        Err(e) => return store_failure(&e, "Error loading user."),
    };

    let page = query.page_request(listing.page_size);
    match store.list(user.id, query.filter(), page).await {
        Ok(harvests) => HttpResponse::Ok().json(serde_json::json!({
            "user": user,
            "harvests": harvests.map(|entry| HarvestView::from(&entry)),
        })),
        Err(e) => store_failure(&e, "Error listing harvests."),
    }
}
