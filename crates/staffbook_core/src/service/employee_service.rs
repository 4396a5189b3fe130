//! Employee use-case service.
//!
//! # Responsibility
//! - Expose list/get/insert/update/delete over employees.
//! - Resolve an employee's address through the address cache, calling the
//!   postal lookup only on a miss.
//!
//! # Invariants
//! - After `insert_employee`/`update_employee` succeed, the employee's postal
//!   code has a stored address and the employee carries that address.
//! - A postal code already present in the address store never reaches the
//!   postal lookup.
//! - Lookup failures are returned unchanged; nothing is written in that case.
//! - Payloads are validated before address resolution; an invalid payload
//!   neither reaches the postal lookup nor writes an address.
//! - Cache check, lookup and write are separate store calls. Two concurrent
//!   saves with the same unseen postal code may both look it up; the last
//!   address write wins.

use crate::model::address::Address;
use crate::model::employee::{Employee, EmployeeId};
use crate::postal::{PostalLookup, PostalLookupError};
use crate::repo::address_repo::AddressRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoError;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, EmployeeServiceError>;

/// What `update_employee` does when the target id does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMissingPolicy {
    /// Do nothing and report success with no record.
    #[default]
    Ignore,
    /// Fail with `EmployeeServiceError::EmployeeNotFound`.
    Reject,
}

impl UpdateMissingPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Some(Self::Ignore),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        }
    }
}

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// No employee has this identifier.
    EmployeeNotFound(EmployeeId),
    /// No employee has this personal code.
    PersonalCodeNotFound(String),
    /// Postal lookup failed on an address cache miss.
    Lookup(PostalLookupError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl EmployeeServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EmployeeNotFound(_) | Self::PersonalCodeNotFound(_)
        )
    }
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::PersonalCodeNotFound(code) => {
                write!(f, "employee not found for personal code: {code}")
            }
            Self::Lookup(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PostalLookupError> for EmployeeServiceError {
    fn from(value: PostalLookupError) -> Self {
        Self::Lookup(value)
    }
}

/// Employee service over an employee store, an address store and a postal
/// lookup.
///
/// Built once at startup with its collaborators and handed to whatever serves
/// requests.
pub struct EmployeeService<E, A, P>
where
    E: EmployeeRepository,
    A: AddressRepository,
    P: PostalLookup,
{
    employees: E,
    addresses: A,
    postal: P,
    update_missing: UpdateMissingPolicy,
}

impl<E, A, P> EmployeeService<E, A, P>
where
    E: EmployeeRepository,
    A: AddressRepository,
    P: PostalLookup,
{
    /// Creates a service that ignores updates of missing employees.
    pub fn new(employees: E, addresses: A, postal: P) -> Self {
        Self {
            employees,
            addresses,
            postal,
            update_missing: UpdateMissingPolicy::default(),
        }
    }

    /// Builder: set the policy for `update_employee` on an unknown id.
    pub fn with_update_missing_policy(mut self, policy: UpdateMissingPolicy) -> Self {
        self.update_missing = policy;
        self
    }

    pub fn update_missing_policy(&self) -> UpdateMissingPolicy {
        self.update_missing
    }

    /// Lists every stored employee.
    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.list_employees()?)
    }

    /// Gets one employee by identifier.
    ///
    /// Absence is an error (`EmployeeNotFound`), not an empty result.
    pub fn get_employee(&self, id: EmployeeId) -> ServiceResult<Employee> {
        self.employees
            .get_employee(id)?
            .ok_or(EmployeeServiceError::EmployeeNotFound(id))
    }

    /// Gets one employee by personal code.
    ///
    /// Absence is an error (`PersonalCodeNotFound`), not an empty result.
    pub fn get_employee_by_personal_code(&self, personal_code: &str) -> ServiceResult<Employee> {
        self.employees
            .get_employee_by_personal_code(personal_code)?
            .ok_or_else(|| EmployeeServiceError::PersonalCodeNotFound(personal_code.to_string()))
    }

    /// Resolves the address and saves the employee without any existence
    /// check. A payload that already carries an id overwrites that record.
    pub fn insert_employee(&self, employee: Employee) -> ServiceResult<Employee> {
        let saved = self.save_with_resolved_address(employee)?;
        info!(
            "event=employee_insert module=service status=ok employee_id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Replaces the employee stored under `id` with `employee`.
    ///
    /// The payload's own `id` is ignored; the record is saved under `id`.
    /// The existing record is only used as an existence check.
    ///
    /// Returns `Ok(None)` when `id` is unknown and the policy is `Ignore`;
    /// nothing is written in that case.
    pub fn update_employee(
        &self,
        id: EmployeeId,
        mut employee: Employee,
    ) -> ServiceResult<Option<Employee>> {
        if self.employees.get_employee(id)?.is_none() {
            return match self.update_missing {
                UpdateMissingPolicy::Ignore => {
                    info!(
                        "event=employee_update module=service status=skipped employee_id={id} reason=not_found"
                    );
                    Ok(None)
                }
                UpdateMissingPolicy::Reject => Err(EmployeeServiceError::EmployeeNotFound(id)),
            };
        }

        employee.id = Some(id);
        let saved = self.save_with_resolved_address(employee)?;
        info!("event=employee_update module=service status=ok employee_id={id}");
        Ok(Some(saved))
    }

    /// Deletes by identifier. Unknown identifiers are not an error.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<()> {
        self.employees.delete_employee(id)?;
        info!("event=employee_delete module=service status=ok employee_id={id}");
        Ok(())
    }

    fn save_with_resolved_address(&self, mut employee: Employee) -> ServiceResult<Employee> {
        employee.validate().map_err(RepoError::Validation)?;
        employee.address = self.resolve_address(employee.postal_code())?;
        Ok(self.employees.put_employee(&employee)?)
    }

    fn resolve_address(&self, postal_code: &str) -> ServiceResult<Address> {
        if let Some(cached) = self.addresses.get_address(postal_code)? {
            debug!("event=address_resolve module=service status=ok cache=hit");
            return Ok(cached);
        }

        let fetched = self.postal.lookup(postal_code).map_err(|err| {
            warn!("event=address_resolve module=service status=error cache=miss error={err}");
            err
        })?;
        let stored = self.addresses.put_address(&fetched)?;
        debug!("event=address_resolve module=service status=ok cache=miss");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeServiceError, UpdateMissingPolicy};
    use crate::postal::PostalLookupError;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            UpdateMissingPolicy::parse(" Ignore "),
            Some(UpdateMissingPolicy::Ignore)
        );
        assert_eq!(
            UpdateMissingPolicy::parse("REJECT"),
            Some(UpdateMissingPolicy::Reject)
        );
        assert_eq!(UpdateMissingPolicy::parse("create"), None);
        assert_eq!(UpdateMissingPolicy::default().as_str(), "ignore");
    }

    #[test]
    fn not_found_classification() {
        assert!(EmployeeServiceError::EmployeeNotFound(7).is_not_found());
        assert!(EmployeeServiceError::PersonalCodeNotFound("111".into()).is_not_found());
        assert!(
            !EmployeeServiceError::Lookup(PostalLookupError::Status(500)).is_not_found()
        );
    }
}
