//! Identifier newtypes: filing-source CIKs and reproducibility hashes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SEC Central Index Key, the filing-source identifier for a ticker.
///
/// Rendered zero-padded to 10 digits, the form the filing API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cik(pub u64);

impl Cik {
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CIK{}", self.padded())
    }
}

/// 8-hex-digit reproducibility hash of a scoring input projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputHash(pub String);

impl InputHash {
    pub fn from_u32(value: u32) -> Self {
        Self(format!("{value:08x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cik_is_zero_padded() {
        assert_eq!(Cik(320193).padded(), "0000320193");
        assert_eq!(Cik(320193).to_string(), "CIK0000320193");
    }

    #[test]
    fn input_hash_is_eight_hex_digits() {
        assert_eq!(InputHash::from_u32(0xab).as_str(), "000000ab");
        assert_eq!(InputHash::from_u32(u32::MAX).as_str(), "ffffffff");
    }
}
