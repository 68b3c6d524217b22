//! Type-safe auction identifier.
//!
//! [`AuctionId`] is a newtype over the backend's integer auction key so that
//! auction ids cannot be confused with server notification ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of an auction as assigned by the marketplace backend.
///
/// Unique across snapshots: the same auction keeps the same id in every
/// poll cycle, which is what makes snapshot diffing possible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AuctionId(i64);

impl AuctionId {
    /// Wraps a raw backend id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw backend id.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AuctionId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<AuctionId> for i64 {
    fn from(id: AuctionId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&AuctionId::new(42)).unwrap_or_default();
        assert_eq!(json, "42");
    }

    #[test]
    fn deserializes_from_bare_integer() {
        let Ok(id) = serde_json::from_str::<AuctionId>("7") else {
            panic!("deserialization failed");
        };
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn display_matches_raw() {
        assert_eq!(AuctionId::new(-3).to_string(), "-3");
    }

    #[test]
    fn usable_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(AuctionId::new(1), "one");
        assert_eq!(map.get(&AuctionId::from(1)), Some(&"one"));
    }
}
