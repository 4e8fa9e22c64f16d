//! # Services Marketplace Library
//!
//! This library provides the core functionality of the services marketplace,
//! including the schema layer, repositories, the user directory client, the
//! catalog seed workflow, and the tenant REST API.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub use migration;
