mod admin;
mod common;
mod harvests;
mod home;

pub use admin::{
    count_harvests, create_user, delete_harvests, delete_user, delete_users, list_user_harvests,
    list_users,
};
pub use common::OWNER_HEADER;
pub use harvests::{add_harvest, delete_harvest, edit_harvest, get_harvest, list_harvests};
pub use home::home_page;

use crate::store::HarvestStore;
use actix_web::web;

/// Registers every route, served from the store `S` found in the app data.
pub fn configure<S: HarvestStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home_page::<S>))
        .route("/harvests", web::get().to(list_harvests::<S>))
        .route("/harvests", web::post().to(add_harvest::<S>))
        .route("/harvests/{harvest_id}", web::get().to(get_harvest::<S>))
        .route("/harvests/{harvest_id}", web::put().to(edit_harvest::<S>))
        .route("/harvests/{harvest_id}", web::delete().to(delete_harvest::<S>))
        .service(
            web::scope("/admin")
                .route("/harvests/count", web::get().to(count_harvests::<S>))
                .route("/harvests", web::delete().to(delete_harvests::<S>))
                .route("/users", web::post().to(create_user::<S>))
                .route("/users", web::get().to(list_users::<S>))
                .route("/users", web::delete().to(delete_users::<S>))
                .route("/users/{user_id}", web::delete().to(delete_user::<S>))
                .route(
                    "/users/{user_id}/harvests",
                    web::get().to(list_user_harvests::<S>),
                ),
        );
}
