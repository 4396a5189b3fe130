//! Employee model.
//!
//! # Invariants
//! - `id` is assigned by the employee store on first save and never reused.
//! - `personal_code` is unique across employees; the store enforces it.
//! - `address` is a non-owning reference; after a save it mirrors a stored
//!   address record.

use super::address::Address;
use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned numeric employee identifier.
pub type EmployeeId = i64;

const NAME_MAX_CHARS: usize = 256;
const PERSONAL_CODE_MAX_CHARS: usize = 32;

/// Employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// `None` until the store assigns an identifier.
    #[serde(default)]
    pub id: Option<EmployeeId>,
    pub name: String,
    /// Unique personal identifier code used for secondary lookup.
    pub personal_code: String,
    pub address: Address,
}

impl Employee {
    /// Creates an unsaved employee referencing an address by postal code.
    pub fn new(
        name: impl Into<String>,
        personal_code: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            personal_code: personal_code.into(),
            address: Address::with_postal_code(postal_code),
        }
    }

    /// Postal code of the referenced address.
    pub fn postal_code(&self) -> &str {
        &self.address.postal_code
    }

    /// Validates storage constraints before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_MAX_CHARS)?;
        require_text("personal_code", &self.personal_code, PERSONAL_CODE_MAX_CHARS)?;
        self.address.validate()
    }
}
