//! Parcel store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the persistence capability the lifecycle service depends on.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Status-gated mutations are single conditional statements; the status
//!   check and the write never happen in separate round trips.
//! - Read paths reject unknown persisted statuses instead of masking them.
//! - Storage failures carry the operation name and parcel number.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::parcel::{ClientId, Parcel, ParcelNumber};
use crate::model::status::ParcelStatus;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARCEL_SELECT_SQL: &str = "SELECT
    number,
    client,
    status,
    address,
    created_at
FROM parcel";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for parcel persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// No parcel with this number exists.
    NotFound(ParcelNumber),
    /// Gated mutation matched nothing: the parcel is absent or has already
    /// left `registered`. The two causes are not told apart.
    NotFoundOrNotRegistered(ParcelNumber),
    /// Status outside the enumerated set, either requested or persisted.
    InvalidStatus(String),
    /// Underlying SQLite failure.
    Storage {
        operation: &'static str,
        number: Option<ParcelNumber>,
        source: DbError,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel with id {number} not found"),
            Self::NotFoundOrNotRegistered(number) => write!(
                f,
                "parcel with id {number} not found or not in registered status"
            ),
            Self::InvalidStatus(status) => write!(f, "invalid status: `{status}`"),
            Self::Storage {
                operation,
                number: Some(number),
                source,
            } => write!(f, "failed to {operation} parcel {number}: {source}"),
            Self::Storage {
                operation,
                number: None,
                source,
            } => write!(f, "failed to {operation}: {source}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "parcel repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "parcel repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Persistence capability required by the parcel lifecycle service.
///
/// Reads borrow the store; writes require exclusive access.
pub trait ParcelStore {
    /// Persists a new parcel and returns its assigned number.
    ///
    /// The incoming `number` field is ignored.
    fn insert(&mut self, parcel: &Parcel) -> RepoResult<ParcelNumber>;
    /// Loads one parcel; `NotFound` when absent.
    fn find_by_id(&self, number: ParcelNumber) -> RepoResult<Parcel>;
    /// Reads the stored status text without interpreting it.
    ///
    /// `NotFound` when absent. Unknown values are returned as-is.
    fn find_status(&self, number: ParcelNumber) -> RepoResult<String>;
    /// Lists all parcels of one client in storage order.
    fn find_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>>;
    /// Overwrites the status; rejects statuses with no transition entry.
    fn update_status(&mut self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()>;
    /// Overwrites the address only while the parcel is `registered`.
    fn update_address(&mut self, number: ParcelNumber, address: &str) -> RepoResult<()>;
    /// Deletes by number, and by status too when `expected` is given.
    ///
    /// Matching nothing is not an error.
    fn delete_conditional(
        &mut self,
        number: ParcelNumber,
        expected: Option<ParcelStatus>,
    ) -> RepoResult<()>;
}

/// SQLite-backed parcel store.
pub struct SqliteParcelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParcelRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `parcel` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_parcel_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ParcelStore for SqliteParcelRepository<'_> {
    fn insert(&mut self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.conn
            .execute(
                "INSERT INTO parcel (client, status, address, created_at)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    parcel.client,
                    parcel.status.as_str(),
                    parcel.address.as_str(),
                    parcel.created_at.as_str(),
                ],
            )
            .map_err(storage("insert", None))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        let row = self
            .conn
            .query_row(
                &format!("{PARCEL_SELECT_SQL} WHERE number = ?1;"),
                [number],
                read_parcel_row,
            )
            .optional()
            .map_err(storage("get", Some(number)))?;

        match row {
            Some(row) => row.into_parcel(),
            None => Err(RepoError::NotFound(number)),
        }
    }

    fn find_status(&self, number: ParcelNumber) -> RepoResult<String> {
        self.conn
            .query_row(
                "SELECT status FROM parcel WHERE number = ?1;",
                [number],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage("read status of", Some(number)))?
            .ok_or(RepoError::NotFound(number))
    }

    fn find_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        let rows = self
            .conn
            .prepare(&format!("{PARCEL_SELECT_SQL} WHERE client = ?1;"))
            .and_then(|mut stmt| {
                let rows = stmt
                    .query_map([client], read_parcel_row)?
                    .collect::<rusqlite::Result<Vec<_>>>();
                rows
            })
            .map_err(storage("list client", None))?;

        rows.into_iter().map(ParcelRow::into_parcel).collect()
    }

    fn update_status(&mut self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
        if !status.is_valid() {
            return Err(RepoError::InvalidStatus(status.as_str().to_string()));
        }

        let changed = self
            .conn
            .execute(
                "UPDATE parcel SET status = ?1 WHERE number = ?2;",
                params![status.as_str(), number],
            )
            .map_err(storage("update status of", Some(number)))?;

        if changed == 0 {
            return Err(RepoError::NotFound(number));
        }

        Ok(())
    }

    fn update_address(&mut self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE parcel
                 SET address = ?1
                 WHERE number = ?2
                   AND status = ?3;",
                params![address, number, ParcelStatus::Registered.as_str()],
            )
            .map_err(storage("update address of", Some(number)))?;

        if changed == 0 {
            return Err(RepoError::NotFoundOrNotRegistered(number));
        }

        Ok(())
    }

    fn delete_conditional(
        &mut self,
        number: ParcelNumber,
        expected: Option<ParcelStatus>,
    ) -> RepoResult<()> {
        let result = match expected {
            Some(status) => self.conn.execute(
                "DELETE FROM parcel WHERE number = ?1 AND status = ?2;",
                params![number, status.as_str()],
            ),
            None => self
                .conn
                .execute("DELETE FROM parcel WHERE number = ?1;", [number]),
        };

        result.map_err(storage("delete", Some(number)))?;
        Ok(())
    }
}

/// Raw row image; status is still unparsed text.
struct ParcelRow {
    number: ParcelNumber,
    client: ClientId,
    status: String,
    address: String,
    created_at: String,
}

impl ParcelRow {
    fn into_parcel(self) -> RepoResult<Parcel> {
        let status = self
            .status
            .parse::<ParcelStatus>()
            .map_err(|err| RepoError::InvalidStatus(err.0))?;

        Ok(Parcel {
            number: self.number,
            client: self.client,
            status,
            address: self.address,
            created_at: self.created_at,
        })
    }
}

fn read_parcel_row(row: &Row<'_>) -> rusqlite::Result<ParcelRow> {
    Ok(ParcelRow {
        number: row.get("number")?,
        client: row.get("client")?,
        status: row.get("status")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
    })
}

fn storage(
    operation: &'static str,
    number: Option<ParcelNumber>,
) -> impl FnOnce(rusqlite::Error) -> RepoError {
    move |err| RepoError::Storage {
        operation,
        number,
        source: DbError::Sqlite(err),
    }
}

fn ensure_parcel_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(storage("read schema version", None))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'parcel'
            );",
            [],
            |row| row.get(0),
        )
        .map_err(storage("inspect schema", None))?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("parcel"));
    }

    Ok(())
}
