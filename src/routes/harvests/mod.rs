mod delete;
mod get;
mod post;
mod put;

pub use delete::delete_harvest;
pub use get::{get_harvest, list_harvests};
pub use post::add_harvest;
pub use put::edit_harvest;
