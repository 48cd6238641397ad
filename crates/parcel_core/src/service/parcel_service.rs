//! Parcel lifecycle service.
//!
//! # Responsibility
//! - Provide register/change-address/advance/delete/list entry points.
//! - Apply the status state machine on top of any `ParcelStore`.
//!
//! # Invariants
//! - New parcels always start as `registered`.
//! - Advancing a terminal parcel never writes.
//! - The `registered` gate for address edits and deletes is re-checked by
//!   the store in the same statement as the mutation.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber};
use crate::model::status::ParcelStatus;
use crate::repo::parcel_repo::{ParcelStore, RepoResult};
use log::{debug, info, warn};

/// Use-case service for the parcel lifecycle.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel for `client`.
    ///
    /// # Contract
    /// - Status is forced to `registered`; `created_at` is the current UTC time.
    /// - Neither `client` nor `address` is validated.
    /// - Returns the persisted parcel including its assigned number.
    pub fn register(&mut self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let mut parcel = Parcel::register(client, address);
        parcel.number = self.store.insert(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Loads one parcel by number.
    pub fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.store.find_by_id(number)
    }

    /// Replaces the delivery address of a `registered` parcel.
    ///
    /// Fails with `NotFoundOrNotRegistered` when the parcel is absent or has
    /// already been sent; the two cases are not distinguished.
    pub fn change_address(&mut self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.store.update_address(number, address)?;
        info!("event=parcel_change_address module=service status=ok number={number}");
        Ok(())
    }

    /// Moves the parcel one step along `registered -> sent -> delivered`.
    ///
    /// A parcel whose successor is the terminal marker is left untouched and
    /// the call succeeds.
    ///
    /// # Errors
    /// - `NotFound` when the parcel does not exist.
    /// - `InvalidStatus` when the stored status is not recognized.
    pub fn advance_status(&mut self, number: ParcelNumber) -> RepoResult<()> {
        let current = self.store.find_by_id(number)?.status;
        let next = current.next();

        if next == ParcelStatus::Empty {
            debug!(
                "event=parcel_advance module=service status=skipped number={number} current={current}"
            );
            return Ok(());
        }

        self.store.update_status(number, next)?;
        info!(
            "event=parcel_advance module=service status=ok number={number} from={current} to={next}"
        );
        Ok(())
    }

    /// Deletes a parcel that is still `registered`.
    ///
    /// A parcel in any other status, including stored text the state machine
    /// does not recognize, is kept and the call still returns `Ok(())`.
    /// Callers that need to know whether the row was removed must look it up
    /// afterwards.
    ///
    /// # Errors
    /// - `NotFound` when the parcel does not exist at all.
    pub fn delete(&mut self, number: ParcelNumber) -> RepoResult<()> {
        let current = self.store.find_status(number)?;

        if current != ParcelStatus::Registered.as_str() {
            warn!(
                "event=parcel_delete module=service status=skipped number={number} current={current}"
            );
            return Ok(());
        }

        self.store
            .delete_conditional(number, Some(ParcelStatus::Registered))?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }

    /// Lists all parcels owned by `client` in storage order.
    ///
    /// An unknown client yields an empty list.
    pub fn list_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.store.find_by_client(client)
    }
}

#[cfg(test)]
mod tests {
    use super::ParcelService;
    use crate::model::status::ParcelStatus;
    use crate::repo::memory_store::InMemoryParcelStore;
    use crate::repo::parcel_repo::RepoError;

    #[test]
    fn advance_past_delivered_is_a_silent_noop() {
        let mut service = ParcelService::new(InMemoryParcelStore::new());
        let parcel = service.register(1, "A").unwrap();

        for _ in 0..5 {
            service.advance_status(parcel.number).unwrap();
        }

        assert_eq!(
            service.get(parcel.number).unwrap().status,
            ParcelStatus::Delivered
        );
    }

    #[test]
    fn delete_of_missing_parcel_is_an_error() {
        let mut service = ParcelService::new(InMemoryParcelStore::new());
        let err = service.delete(42).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(42)));
    }

    #[test]
    fn advance_of_missing_parcel_is_an_error() {
        let mut service = ParcelService::new(InMemoryParcelStore::new());
        let err = service.advance_status(9).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(9)));
    }
}
