pub mod config;
pub mod domain;
pub mod forms;
pub mod jobs;
pub mod models;
pub mod notifications;
pub mod pricing;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role that grants access to every listing and booking of the hub.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
