//! The client-facing application identifier scheme.
//!
//! The document store assigns every application an opaque storage key. The
//! key is never exposed directly: clients only ever see the external form,
//! which is the key prefixed with [`APPLICATION_ID_PREFIX`]. Parsing is the
//! exact inverse of formatting, and a malformed external id is rejected
//! before any store access happens.

use crate::error::Error;

/// Prefix carried by every externally-visible application id.
pub const APPLICATION_ID_PREFIX: &str = "app_";

/// A well-formed, client-facing application identifier.
///
/// Holds the full external form (`app_<storage key>`). Construction is only
/// possible through [`ApplicationId::from_key`] (formatting) or
/// [`ApplicationId::parse`] (validated parsing), so holding a value of this
/// type implies the prefix invariant.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Formats a storage key into its external form.
    pub fn from_key(storage_key: &str) -> Self {
        Self(format!("{APPLICATION_ID_PREFIX}{storage_key}"))
    }

    /// Parses a client-supplied external id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidApplicationId`] if the id does not carry the
    /// expected prefix or carries nothing after it.
    pub fn parse(external: &str) -> Result<Self, Error> {
        match external.strip_prefix(APPLICATION_ID_PREFIX) {
            Some(key) if !key.is_empty() => Ok(Self(external.to_string())),
            Some(_) => Err(Error::InvalidApplicationId {
                reason: "empty storage key".to_string(),
            }),
            None => Err(Error::InvalidApplicationId {
                reason: format!("missing `{APPLICATION_ID_PREFIX}` prefix"),
            }),
        }
    }

    /// The internal storage key this id refers to.
    pub fn key(&self) -> &str {
        // Invariant: constructed with the prefix present.
        &self.0[APPLICATION_ID_PREFIX.len()..]
    }

    /// The full external form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
