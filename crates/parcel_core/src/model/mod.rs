//! Parcel domain model.
//!
//! # Responsibility
//! - Define the parcel record and its status state machine.
//!
//! # Invariants
//! - Status transitions are owned by `status`, never by callers.

pub mod parcel;
pub mod status;
