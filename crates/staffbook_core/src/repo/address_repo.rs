//! Address store contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up and upsert addresses keyed by postal code.
//!
//! # Invariants
//! - `put_address` overwrites any existing row for the same postal code.
//! - There is no delete path; addresses outlive the employees referencing them.

use crate::model::address::Address;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    postal_code,
    street,
    complement,
    neighborhood,
    city,
    state
FROM addresses";

/// Repository interface for the address cache.
pub trait AddressRepository {
    /// Returns the stored address for `postal_code`, if any.
    fn get_address(&self, postal_code: &str) -> RepoResult<Option<Address>>;
    /// Inserts or overwrites the address keyed by its postal code and returns
    /// the stored record.
    fn put_address(&self, address: &Address) -> RepoResult<Address>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "addresses",
            &[
                "postal_code",
                "street",
                "complement",
                "neighborhood",
                "city",
                "state",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn get_address(&self, postal_code: &str) -> RepoResult<Option<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} WHERE postal_code = ?1;"))?;
        let mut rows = stmt.query([postal_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_address_row(row)?));
        }

        Ok(None)
    }

    fn put_address(&self, address: &Address) -> RepoResult<Address> {
        address.validate()?;

        self.conn.execute(
            "INSERT INTO addresses (
                postal_code,
                street,
                complement,
                neighborhood,
                city,
                state
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (postal_code) DO UPDATE SET
                street = excluded.street,
                complement = excluded.complement,
                neighborhood = excluded.neighborhood,
                city = excluded.city,
                state = excluded.state;",
            params![
                address.postal_code.as_str(),
                address.street.as_str(),
                address.complement.as_deref(),
                address.neighborhood.as_str(),
                address.city.as_str(),
                address.state.as_str(),
            ],
        )?;
        debug!("event=address_put module=repo status=ok");

        self.get_address(&address.postal_code)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "address `{}` missing right after upsert",
                address.postal_code
            ))
        })
    }
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    let address = Address {
        postal_code: row.get("postal_code")?,
        street: row.get("street")?,
        complement: row.get("complement")?,
        neighborhood: row.get("neighborhood")?,
        city: row.get("city")?,
        state: row.get("state")?,
    };
    address
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("address row: {err}")))?;
    Ok(address)
}
