use parcel_core::db::open_db_in_memory;
use parcel_core::{
    InMemoryParcelStore, Parcel, ParcelService, ParcelStatus, ParcelStore, RepoError,
    SqliteParcelRepository,
};

macro_rules! lifecycle_case {
    ($name:ident, $check:ident) => {
        mod $name {
            use super::*;

            #[test]
            fn sqlite() {
                let conn = open_db_in_memory().unwrap();
                let store = SqliteParcelRepository::try_new(&conn).unwrap();
                $check(ParcelService::new(store));
            }

            #[test]
            fn in_memory() {
                $check(ParcelService::new(InMemoryParcelStore::new()));
            }
        }
    };
}

lifecycle_case!(demo_scenario, check_demo_scenario);
lifecycle_case!(register_forces_registered, check_register_forces_registered);
lifecycle_case!(address_frozen_after_send, check_address_frozen_after_send);
lifecycle_case!(full_status_walk, check_full_status_walk);
lifecycle_case!(delete_only_while_registered, check_delete_only_while_registered);
lifecycle_case!(list_unknown_client, check_list_unknown_client);

fn check_demo_scenario<S: ParcelStore>(mut service: ParcelService<S>) {
    let first = service.register(1, "A").unwrap();
    assert_eq!(first.status, ParcelStatus::Registered);

    service.change_address(first.number, "B").unwrap();
    assert_eq!(service.get(first.number).unwrap().address, "B");

    service.advance_status(first.number).unwrap();
    assert_eq!(service.get(first.number).unwrap().status, ParcelStatus::Sent);

    service.delete(first.number).unwrap();
    let kept = service.get(first.number).unwrap();
    assert_eq!(kept.status, ParcelStatus::Sent);

    let second = service.register(1, "A").unwrap();
    assert_ne!(second.number, first.number);
    service.delete(second.number).unwrap();
    assert!(matches!(
        service.get(second.number),
        Err(RepoError::NotFound(n)) if n == second.number
    ));

    let listed = service.list_by_client(1).unwrap();
    assert_eq!(listed, vec![kept]);
}

fn check_register_forces_registered<S: ParcelStore>(mut service: ParcelService<S>) {
    let parcel = service.register(-3, "").unwrap();
    let stored = service.get(parcel.number).unwrap();

    assert_eq!(stored, parcel);
    assert_eq!(stored.status, ParcelStatus::Registered);
    assert!(stored.created_at.ends_with('Z'));
}

fn check_address_frozen_after_send<S: ParcelStore>(mut service: ParcelService<S>) {
    let parcel = service.register(2, "old").unwrap();
    service.advance_status(parcel.number).unwrap();

    let err = service.change_address(parcel.number, "new").unwrap_err();
    assert!(matches!(err, RepoError::NotFoundOrNotRegistered(n) if n == parcel.number));
    assert_eq!(service.get(parcel.number).unwrap().address, "old");

    let missing = service.change_address(parcel.number + 100, "new").unwrap_err();
    assert!(matches!(missing, RepoError::NotFoundOrNotRegistered(_)));
}

fn check_full_status_walk<S: ParcelStore>(mut service: ParcelService<S>) {
    let parcel = service.register(3, "walk").unwrap();
    let mut seen = Vec::new();

    for _ in 0..4 {
        service.advance_status(parcel.number).unwrap();
        seen.push(service.get(parcel.number).unwrap().status);
    }

    assert_eq!(
        seen,
        vec![
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
            ParcelStatus::Delivered,
            ParcelStatus::Delivered,
        ]
    );
}

fn check_delete_only_while_registered<S: ParcelStore>(mut service: ParcelService<S>) {
    let registered = service.register(4, "x").unwrap();
    let delivered = service.register(4, "y").unwrap();
    service.advance_status(delivered.number).unwrap();
    service.advance_status(delivered.number).unwrap();

    service.delete(registered.number).unwrap();
    service.delete(delivered.number).unwrap();

    assert!(service.get(registered.number).is_err());
    assert_eq!(
        service.get(delivered.number).unwrap().status,
        ParcelStatus::Delivered
    );

    assert!(matches!(
        service.delete(registered.number),
        Err(RepoError::NotFound(_))
    ));
}

fn check_list_unknown_client<S: ParcelStore>(mut service: ParcelService<S>) {
    service.register(10, "a").unwrap();
    assert!(service.list_by_client(11).unwrap().is_empty());
    assert_eq!(service.list_by_client(10).unwrap().len(), 1);
}

#[test]
fn advance_fails_on_unknown_stored_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelRepository::try_new(&conn).unwrap();
    let mut service = ParcelService::new(store);
    let parcel = service.register(1, "A").unwrap();

    conn.execute(
        "UPDATE parcel SET status = 'returned' WHERE number = ?1;",
        [parcel.number],
    )
    .unwrap();

    let err = service.advance_status(parcel.number).unwrap_err();
    assert!(matches!(err, RepoError::InvalidStatus(ref s) if s == "returned"));
}

#[test]
fn delete_keeps_parcel_with_unknown_stored_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelRepository::try_new(&conn).unwrap();
    let mut service = ParcelService::new(store);
    let parcel = service.register(1, "A").unwrap();

    conn.execute(
        "UPDATE parcel SET status = 'lost' WHERE number = ?1;",
        [parcel.number],
    )
    .unwrap();

    service.delete(parcel.number).unwrap();

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM parcel WHERE number = ?1;",
            [parcel.number],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 1);
}

#[test]
fn advance_of_empty_status_is_a_noop() {
    let mut store = InMemoryParcelStore::new();
    let mut parcel = Parcel::register(1, "A");
    parcel.status = ParcelStatus::Empty;
    let number = store.insert(&parcel).unwrap();

    let mut service = ParcelService::new(store);
    service.advance_status(number).unwrap();
    assert_eq!(service.get(number).unwrap().status, ParcelStatus::Empty);
}

#[test]
fn parcel_serializes_status_as_text() {
    let mut service = ParcelService::new(InMemoryParcelStore::new());
    let parcel = service.register(1, "A").unwrap();

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(json["status"], "registered");
    assert_eq!(json["number"], 1);

    let back: Parcel = serde_json::from_value(json).unwrap();
    assert_eq!(back, parcel);

    let bad = serde_json::json!({
        "number": 1,
        "client": 1,
        "status": "lost",
        "address": "A",
        "created_at": "2024-05-01T12:30:00Z",
    });
    assert!(serde_json::from_value::<Parcel>(bad).is_err());
}
