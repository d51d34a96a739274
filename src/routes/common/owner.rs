use crate::domain::OwnerId;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, error};
use std::future::{Ready, ready};

/// Header carrying the authenticated user, set by the fronting auth proxy.
pub const OWNER_HEADER: &str = "X-Owner-Id";

impl FromRequest for OwnerId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let owner = req
            .headers()
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .map(OwnerId)
            .ok_or_else(|| {
                error::ErrorUnauthorized(format!("Missing or invalid {OWNER_HEADER} header."))
            });
        ready(owner)
    }
}
