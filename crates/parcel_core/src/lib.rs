//! Core domain logic for the parcel tracker.
//! This crate is the single source of truth for parcel lifecycle invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::parcel::{ClientId, Parcel, ParcelNumber};
pub use model::status::{is_valid_status, next_status, ParcelStatus, UnknownStatusError};
pub use repo::memory_store::InMemoryParcelStore;
pub use repo::parcel_repo::{ParcelStore, RepoError, RepoResult, SqliteParcelRepository};
pub use service::parcel_service::ParcelService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
