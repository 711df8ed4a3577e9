pub mod actions;
pub mod bigmarker_client;
pub mod configuration;
pub mod domain;
pub mod profile_store;
pub mod relay;
pub mod routes;
pub mod startup;
pub mod telemetry;
