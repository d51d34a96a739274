mod get;

pub use get::home_page;
