// Library exports for Safeko
// The binary and the integration tests both build on these modules

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod planner;
pub mod render;
pub mod routes;
pub mod state;
