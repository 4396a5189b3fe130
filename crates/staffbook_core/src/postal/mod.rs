//! Postal-code lookup boundary.
//!
//! # Responsibility
//! - Define the `PostalLookup` seam the employee service calls on an address
//!   cache miss.
//! - Provide the HTTP implementation backed by ViaCEP.
//!
//! # Invariants
//! - A successful lookup returns an address whose `postal_code` equals the
//!   requested code byte for byte.
//! - Failures are returned to the caller unchanged; nothing here retries.

mod viacep;

pub use viacep::{postal_code_digits, ViaCepClient};

use crate::model::address::Address;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by a postal lookup implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalLookupError {
    /// Code is not eight digits (after dropping `-` and spaces).
    InvalidPostalCode(String),
    /// Service answered but does not know the code.
    UnknownPostalCode(String),
    /// Service answered with a non-success HTTP status.
    Status(u16),
    /// Connection, TLS or timeout failure.
    Transport(String),
    /// Response body could not be decoded.
    Decode(String),
}

impl Display for PostalLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPostalCode(code) => write!(f, "invalid postal code: `{code}`"),
            Self::UnknownPostalCode(code) => write!(f, "unknown postal code: `{code}`"),
            Self::Status(status) => write!(f, "postal service returned http status {status}"),
            Self::Transport(message) => write!(f, "postal service transport error: {message}"),
            Self::Decode(message) => write!(f, "postal service response is malformed: {message}"),
        }
    }
}

impl Error for PostalLookupError {}

/// Resolves a postal code into a fully populated address.
pub trait PostalLookup {
    fn lookup(&self, postal_code: &str) -> Result<Address, PostalLookupError>;
}

impl<T: PostalLookup + ?Sized> PostalLookup for &T {
    fn lookup(&self, postal_code: &str) -> Result<Address, PostalLookupError> {
        (**self).lookup(postal_code)
    }
}

impl<T: PostalLookup + ?Sized> PostalLookup for Box<T> {
    fn lookup(&self, postal_code: &str) -> Result<Address, PostalLookupError> {
        (**self).lookup(postal_code)
    }
}
