//! Database seeding functionality
//!
//! This module resets the marketplace tables and fills them with the demo
//! catalog of providers, services and options.

pub mod catalog;
pub mod progress;
pub mod services;

pub use catalog::SeedCatalog;
pub use progress::{ConsoleProgress, SeedProgress};
pub use services::{SeedError, SeedOutcome, SeedSummary, seed_services, seed_services_with_catalog};
