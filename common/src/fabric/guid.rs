//! # Device GUID
//!
//! InfiniBand nodes are named by a 64-bit GUID printed as `0x` followed by hex digits.
//! Tools disagree on letter case, so every GUID is stored in lowercase and compared
//! in that canonical form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a hexadecimal GUID")]
pub struct GuidError(pub String);

/// A canonical (lowercase) device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(String);

impl Guid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercases `raw` without validating it.
    ///
    /// Lookup helpers use this so callers may pass GUIDs in any case.
    pub fn canonical(raw: &str) -> String {
        raw.trim().to_ascii_lowercase()
    }
}

impl FromStr for Guid {
    type Err = GuidError;

    /// Accepts `0x` (or `0X`) followed by at least one hex digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = Self::canonical(s);
        let digits = canonical
            .strip_prefix("0x")
            .ok_or_else(|| GuidError(s.to_string()))?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GuidError(s.to_string()));
        }

        Ok(Guid(canonical))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
