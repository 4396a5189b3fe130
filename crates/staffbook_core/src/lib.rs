//! Core domain logic for staffbook.
//!
//! Employees reference a postal address that is resolved once per postal code
//! through an external lookup and cached in the address store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod postal;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, PostalConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address::Address;
pub use model::employee::{Employee, EmployeeId};
pub use model::ValidationError;
pub use postal::{PostalLookup, PostalLookupError, ViaCepClient};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{RepoError, RepoResult};
pub use service::employee_service::{
    EmployeeService, EmployeeServiceError, ServiceResult, UpdateMissingPolicy,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
