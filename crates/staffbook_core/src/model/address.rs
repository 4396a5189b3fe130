//! Address model keyed by postal code.
//!
//! # Invariants
//! - `postal_code` is the identity; two addresses with the same code are the
//!   same record.
//! - Addresses are never deleted by core code paths.

use super::{limit_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};

const POSTAL_CODE_MAX_CHARS: usize = 16;
const ADDRESS_FIELD_MAX_CHARS: usize = 256;

/// Postal address resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Store key. Kept exactly as the caller supplied it.
    pub postal_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl Address {
    /// Creates a reference-only address carrying just the postal code.
    ///
    /// This is the shape callers submit inside an employee payload; the
    /// remaining fields are filled by address resolution.
    pub fn with_postal_code(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
            ..Self::default()
        }
    }

    /// Validates storage constraints before persistence.
    ///
    /// Only the postal code is required; the other fields are whatever the
    /// postal service returned and may legitimately be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("postal_code", &self.postal_code, POSTAL_CODE_MAX_CHARS)?;
        limit_text("street", &self.street, ADDRESS_FIELD_MAX_CHARS)?;
        if let Some(complement) = self.complement.as_deref() {
            limit_text("complement", complement, ADDRESS_FIELD_MAX_CHARS)?;
        }
        limit_text("neighborhood", &self.neighborhood, ADDRESS_FIELD_MAX_CHARS)?;
        limit_text("city", &self.city, ADDRESS_FIELD_MAX_CHARS)?;
        limit_text("state", &self.state, ADDRESS_FIELD_MAX_CHARS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_address_only_carries_postal_code() {
        let address = Address::with_postal_code("20040-020");
        assert_eq!(address.postal_code, "20040-020");
        assert!(address.street.is_empty());
        assert!(address.complement.is_none());
        assert!(address.validate().is_ok());
    }

    #[test]
    fn blank_postal_code_is_rejected() {
        let address = Address::with_postal_code("   ");
        assert_eq!(
            address.validate(),
            Err(ValidationError::EmptyField("postal_code"))
        );
    }

    #[test]
    fn payload_without_details_deserializes() {
        let address: Address = serde_json::from_str(r#"{"postal_code":"01001-000"}"#).unwrap();
        assert_eq!(address, Address::with_postal_code("01001-000"));
    }
}
