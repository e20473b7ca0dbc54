// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod eero_client;
pub mod models;
pub mod networks;
pub mod routes;
pub mod telemetry;
pub mod token_store;
pub mod version;
pub mod worker;
