//! In-memory parcel store.
//!
//! # Responsibility
//! - Provide a `ParcelStore` with no SQLite dependency for tests and demos.
//!
//! # Invariants
//! - Numbers start at 1, increase monotonically and are never reused.
//! - Gated updates and deletes follow the same contract as the SQLite store.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber};
use crate::model::status::ParcelStatus;
use crate::repo::parcel_repo::{ParcelStore, RepoError, RepoResult};
use std::collections::BTreeMap;

/// Single-threaded map-backed parcel store.
#[derive(Debug, Default)]
pub struct InMemoryParcelStore {
    parcels: BTreeMap<ParcelNumber, Parcel>,
    last_number: ParcelNumber,
}

impl InMemoryParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored parcels.
    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}

impl ParcelStore for InMemoryParcelStore {
    fn insert(&mut self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.last_number += 1;
        let number = self.last_number;
        self.parcels.insert(
            number,
            Parcel {
                number,
                ..parcel.clone()
            },
        );
        Ok(number)
    }

    fn find_by_id(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.parcels
            .get(&number)
            .cloned()
            .ok_or(RepoError::NotFound(number))
    }

    fn find_status(&self, number: ParcelNumber) -> RepoResult<String> {
        self.parcels
            .get(&number)
            .map(|parcel| parcel.status.as_str().to_string())
            .ok_or(RepoError::NotFound(number))
    }

    fn find_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        Ok(self
            .parcels
            .values()
            .filter(|parcel| parcel.client == client)
            .cloned()
            .collect())
    }

    fn update_status(&mut self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        if !status.is_valid() {
            return Err(RepoError::InvalidStatus(status.as_str().to_string()));
        }

        let parcel = self
            .parcels
            .get_mut(&number)
            .ok_or(RepoError::NotFound(number))?;
        parcel.status = status;
        Ok(())
    }

    fn update_address(&mut self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        match self.parcels.get_mut(&number) {
            Some(parcel) if parcel.status == ParcelStatus::Registered => {
                parcel.address = address.to_string();
                Ok(())
            }
            _ => Err(RepoError::NotFoundOrNotRegistered(number)),
        }
    }

    fn delete_conditional(
        &mut self,
        number: ParcelNumber,
        expected: Option<ParcelStatus>,
    ) -> RepoResult<()> {
        let matches = self
            .parcels
            .get(&number)
            .is_some_and(|parcel| match expected {
                Some(status) => parcel.status == status,
                None => true,
            });
        if matches {
            self.parcels.remove(&number);
        }
        Ok(())
    }
}
