//! Session key: the `(source address, client id)` pair identifying one viewer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DomainError, DomainResult};

// Patterns are compile-time constants; `None` only if the regex crate rejects them.
static IPV4_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").ok());

static CLIENT_ID_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{5,10}$").ok());

/// Returns true if `s` looks like a dotted-quad IPv4 address.
///
/// This is a shape check only; octets are not range checked.
#[must_use]
pub fn is_dotted_quad(s: &str) -> bool {
    IPV4_PATTERN.as_ref().is_some_and(|re| re.is_match(s))
}

/// Returns true if `s` is a 5-10 digit numeric client identifier.
#[must_use]
pub fn is_client_id(s: &str) -> bool {
    CLIENT_ID_PATTERN.as_ref().is_some_and(|re| re.is_match(s))
}

/// Identifies one tracked viewer session.
///
/// Ordering is lexicographic on the address string, then the client id,
/// which matches sorting the rendered `"address client"` string. It is not
/// numeric IP ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub address: String,
    pub client_id: String,
}

impl SessionKey {
    pub fn new(address: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            client_id: client_id.into(),
        }
    }

    /// Checks the key-format invariant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` or `InvalidClientId` for the first field
    /// that does not match its expected shape.
    pub fn validate(&self) -> DomainResult<()> {
        if !is_dotted_quad(&self.address) {
            return Err(DomainError::InvalidAddress {
                key: self.to_string(),
                address: self.address.clone(),
            });
        }
        if !is_client_id(&self.client_id) {
            return Err(DomainError::InvalidClientId {
                key: self.to_string(),
                client_id: self.client_id.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.client_id)
    }
}
