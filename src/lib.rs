pub mod configuration;
pub mod error;
pub mod providers;
pub mod routes;
pub mod startup;
pub mod telemetry;
