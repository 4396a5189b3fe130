//! Employee store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `employees` plus lookup by personal code.
//! - Hydrate the referenced address on every read.
//!
//! # Invariants
//! - Identifiers are assigned by SQLite (`AUTOINCREMENT`) and never reused.
//! - `personal_code` uniqueness is enforced by a table constraint.
//! - The referenced address row must exist (foreign key); otherwise the write
//!   fails with `RepoError::MissingAddress`.
//! - `delete_employee` on an unknown id is a no-op.

use crate::model::address::Address;
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::{constraint_kind, ensure_connection_ready, ConstraintKind, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    e.id AS id,
    e.name AS name,
    e.personal_code AS personal_code,
    a.postal_code AS postal_code,
    a.street AS street,
    a.complement AS complement,
    a.neighborhood AS neighborhood,
    a.city AS city,
    a.state AS state
FROM employees e
INNER JOIN addresses a ON a.postal_code = e.postal_code";

/// Repository interface for employee records.
pub trait EmployeeRepository {
    /// Lists every stored employee.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Gets one employee by store identifier.
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Gets one employee by unique personal code.
    fn get_employee_by_personal_code(&self, personal_code: &str) -> RepoResult<Option<Employee>>;
    /// Inserts (`id == None`) or overwrites (`id == Some`) an employee and
    /// returns the stored record with its identifier set.
    fn put_employee(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Deletes by identifier. Unknown identifiers are ignored.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "employees",
            &["id", "name", "personal_code", "postal_code"],
        )?;
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, key: &dyn rusqlite::ToSql) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE {filter} = ?1;"))?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY e.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.query_one("e.id", &id)
    }

    fn get_employee_by_personal_code(&self, personal_code: &str) -> RepoResult<Option<Employee>> {
        self.query_one("e.personal_code", &personal_code)
    }

    fn put_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let written = match employee.id {
            None => self
                .conn
                .execute(
                    "INSERT INTO employees (name, personal_code, postal_code)
                     VALUES (?1, ?2, ?3);",
                    params![
                        employee.name.as_str(),
                        employee.personal_code.as_str(),
                        employee.postal_code(),
                    ],
                )
                .map(|_| self.conn.last_insert_rowid()),
            Some(id) => self
                .conn
                .execute(
                    "INSERT INTO employees (id, name, personal_code, postal_code)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT (id) DO UPDATE SET
                        name = excluded.name,
                        personal_code = excluded.personal_code,
                        postal_code = excluded.postal_code;",
                    params![
                        id,
                        employee.name.as_str(),
                        employee.personal_code.as_str(),
                        employee.postal_code(),
                    ],
                )
                .map(|_| id),
        };

        let id = written.map_err(|err| match constraint_kind(&err) {
            Some(ConstraintKind::Unique) => {
                RepoError::DuplicatePersonalCode(employee.personal_code.clone())
            }
            Some(ConstraintKind::ForeignKey) => {
                RepoError::MissingAddress(employee.postal_code().to_string())
            }
            None => RepoError::from(err),
        })?;
        debug!("event=employee_put module=repo status=ok employee_id={id}");

        self.get_employee(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("employee {id} missing right after save"))
        })
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        debug!("event=employee_delete module=repo status=ok employee_id={id} changed={changed}");
        Ok(())
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let employee = Employee {
        id: Some(id),
        name: row.get("name")?,
        personal_code: row.get("personal_code")?,
        address: Address {
            postal_code: row.get("postal_code")?,
            street: row.get("street")?,
            complement: row.get("complement")?,
            neighborhood: row.get("neighborhood")?,
            city: row.get("city")?,
            state: row.get("state")?,
        },
    };
    employee
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;
    Ok(employee)
}
