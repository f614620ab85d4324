pub mod auth;
pub mod configuration;
pub mod db_interaction;
pub mod domain;
pub mod email_client;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod schema;
pub mod sms_client;
pub mod startup;
pub mod telemetry;
pub mod utils;
