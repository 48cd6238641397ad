//! Human-readable parcel output.

use parcel_core::{ClientId, Parcel, ParcelNumber, RepoError, RepoResult};
use std::fmt::Write;

pub fn parcel_line(parcel: &Parcel) -> String {
    format!(
        "parcel {}: client {}, status {}, address {}, registered at {}",
        parcel.number, parcel.client, status_label(parcel), parcel.address, parcel.created_at
    )
}

pub fn client_parcels(client: ClientId, parcels: &[Parcel]) -> String {
    let mut out = format!("Parcels of client {client}:\n");
    if parcels.is_empty() {
        out.push_str("  (none)\n");
    }
    for parcel in parcels {
        let _ = writeln!(out, "  {}", parcel_line(parcel));
    }
    out
}

/// Describes what a delete left behind, given a lookup made right after it.
///
/// Only `NotFound` means the row is gone; any other lookup error is returned.
pub fn delete_outcome(number: ParcelNumber, lookup: RepoResult<Parcel>) -> RepoResult<String> {
    match lookup {
        Ok(parcel) => Ok(format!("kept: {}", parcel_line(&parcel))),
        Err(RepoError::NotFound(_)) => Ok(format!("deleted parcel {number}")),
        Err(err) => Err(err),
    }
}

fn status_label(parcel: &Parcel) -> &'static str {
    match parcel.status.as_str() {
        "" => "-",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::{client_parcels, delete_outcome, parcel_line};
    use parcel_core::{Parcel, ParcelStatus, RepoError};

    fn parcel(number: i64, status: ParcelStatus) -> Parcel {
        Parcel {
            number,
            client: 1,
            status,
            address: "B".to_string(),
            created_at: "2024-05-01T12:30:00Z".to_string(),
        }
    }

    #[test]
    fn line_shows_every_field() {
        let line = parcel_line(&parcel(3, ParcelStatus::Sent));
        assert_eq!(
            line,
            "parcel 3: client 1, status sent, address B, registered at 2024-05-01T12:30:00Z"
        );
    }

    #[test]
    fn empty_status_gets_a_placeholder() {
        assert!(parcel_line(&parcel(1, ParcelStatus::Empty)).contains("status -,"));
    }

    #[test]
    fn client_listing_marks_empty_result() {
        assert_eq!(client_parcels(9, &[]), "Parcels of client 9:\n  (none)\n");
        let listed = client_parcels(1, &[parcel(1, ParcelStatus::Registered)]);
        assert_eq!(listed.lines().count(), 2);
    }

    #[test]
    fn delete_outcome_reports_removed_and_kept_rows() {
        assert_eq!(
            delete_outcome(4, Err(RepoError::NotFound(4))).unwrap(),
            "deleted parcel 4"
        );
        let kept = delete_outcome(3, Ok(parcel(3, ParcelStatus::Sent))).unwrap();
        assert!(kept.starts_with("kept: parcel 3"));
    }

    #[test]
    fn delete_outcome_passes_other_lookup_errors_through() {
        let err = delete_outcome(5, Err(RepoError::InvalidStatus("lost".to_string()))).unwrap_err();
        assert!(matches!(err, RepoError::InvalidStatus(ref s) if s == "lost"));
    }
}
