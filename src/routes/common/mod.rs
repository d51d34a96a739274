mod listing;
mod owner;
mod responses;

pub use listing::HarvestListQuery;
pub use owner::OWNER_HEADER;
pub use responses::{store_failure, submission_failure};
