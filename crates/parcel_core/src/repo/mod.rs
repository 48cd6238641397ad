//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the `ParcelStore` capability consumed by the lifecycle service.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every `ParcelStore` implementation enforces the `registered` gate for
//!   address updates itself, in one step with the write.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `NotFoundOrNotRegistered`) in addition to storage failures.

pub mod memory_store;
pub mod parcel_repo;
