//! Parcel status state machine.
//!
//! # Responsibility
//! - Define the closed set of parcel statuses and their textual forms.
//! - Own the single transition table `registered -> sent -> delivered -> empty`.
//!
//! # Invariants
//! - Every valid status has exactly one successor; no skipping or reverting.
//! - `Empty` is terminal: advancing it yields `Empty` again without error.
//! - Only `registered`, `sent` and `delivered` are valid persisted targets.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lifecycle status of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParcelStatus {
    /// Accepted into the system; address may still change.
    Registered,
    /// Handed over to delivery.
    Sent,
    /// Reached the recipient.
    Delivered,
    /// No further transition. Also stands for an absent status.
    Empty,
}

/// Raised when text does not name any known parcel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError(pub String);

impl Display for UnknownStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown parcel status: `{}`", self.0)
    }
}

impl Error for UnknownStatusError {}

impl ParcelStatus {
    /// Returns the stored textual form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Empty => "",
        }
    }

    /// Returns whether this status has an entry in the transition table.
    pub fn is_valid(self) -> bool {
        self.successor().is_some()
    }

    /// Returns the successor status.
    ///
    /// `Delivered` advances to `Empty`; `Empty` stays `Empty`.
    pub fn next(self) -> Self {
        self.successor().unwrap_or(Self::Empty)
    }

    /// Returns whether address edits and deletion are permitted.
    pub fn is_mutable(self) -> bool {
        self == Self::Registered
    }

    fn successor(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => Some(Self::Empty),
            Self::Empty => None,
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "" => Ok(Self::Empty),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ParcelStatus {
    type Error = UnknownStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParcelStatus> for String {
    fn from(value: ParcelStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Returns whether `value` names a status with a defined successor.
pub fn is_valid_status(value: &str) -> bool {
    value
        .parse::<ParcelStatus>()
        .is_ok_and(ParcelStatus::is_valid)
}

/// Computes the successor of a textual status.
///
/// # Errors
/// - Returns `UnknownStatusError` when `value` is not a known status.
///   The empty string is known and advances to `Empty`.
pub fn next_status(value: &str) -> Result<ParcelStatus, UnknownStatusError> {
    Ok(value.parse::<ParcelStatus>()?.next())
}
