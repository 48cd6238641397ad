//! Parcel domain model.
//!
//! # Responsibility
//! - Define the canonical parcel record shared by storage and service layers.
//!
//! # Invariants
//! - `number` is assigned by storage and never changes afterwards.
//! - `created_at` is captured once at registration in UTC RFC 3339 form.

use crate::model::status::ParcelStatus;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Identifier of the client owning a parcel.
pub type ClientId = i64;

/// Trackable shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// `0` until the parcel has been persisted.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// UTC timestamp, e.g. `2024-05-01T12:30:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved `registered` parcel stamped with the current time.
    pub fn register(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: timestamp_now(),
        }
    }

    /// Returns whether the address may still change and the parcel be deleted.
    pub fn is_mutable(&self) -> bool {
        self.status.is_mutable()
    }
}

/// Formats the current UTC time the way `created_at` is stored.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
