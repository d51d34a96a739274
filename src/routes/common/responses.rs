use crate::store::StoreError;
use crate::submission::SubmissionError;
use actix_web::HttpResponse;

pub fn submission_failure(error: SubmissionError) -> HttpResponse {
    match error {
        SubmissionError::Rejected(errors) if errors.is_duplicate_only() => {
            HttpResponse::Conflict().json(errors)
        }
        SubmissionError::Rejected(errors) => HttpResponse::BadRequest().json(errors),
        SubmissionError::NotFound => HttpResponse::NotFound().body("Harvest not found."),
        SubmissionError::UnknownOwner(owner) => {
            HttpResponse::Forbidden().body(format!("Unknown owner {owner}."))
        }
        SubmissionError::Store(e) => store_failure(&e, "Error saving harvest."),
    }
}

/// Logs the cause and answers with a generic 500.
pub fn store_failure(error: &StoreError, message: &'static str) -> HttpResponse {
    tracing::error!(error = ?error, "{}", message);
    HttpResponse::InternalServerError().body(message)
}
