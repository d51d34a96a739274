pub mod configuration;
pub mod domain;
pub mod routes;
pub mod startup;
pub mod store;
pub mod submission;
pub mod telemetry;
pub mod validation;
