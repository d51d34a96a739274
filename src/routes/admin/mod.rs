mod harvests;
mod users;

pub use harvests::{count_harvests, delete_harvests};
pub use users::{create_user, delete_user, delete_users, list_user_harvests, list_users};
