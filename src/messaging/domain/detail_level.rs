//! Introspection detail level, carried on the wire as a small integer.

use dashmap::DashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::LazyLock;

use crate::messaging::error::CodecError;

/// How much detail an inspect request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailLevel {
    /// Basic information (`0`).
    Standard,
    /// Extended information (`1`).
    Detailed,
}

static DETAIL_LEVEL_CACHE: LazyLock<DashMap<i64, DetailLevel>> = LazyLock::new(DashMap::new);

impl DetailLevel {
    const ALL: [Self; 2] = [Self::Standard, Self::Detailed];

    /// Returns the wire integer for this level.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Detailed => 1,
        }
    }

    /// Resolves a wire integer through the shared reverse-lookup cache.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownDetailLevel`] for unmapped integers.
    pub fn from_level(level: i64) -> Result<Self, CodecError> {
        if let Some(cached) = DETAIL_LEVEL_CACHE.get(&level) {
            return Ok(*cached);
        }
        let resolved = Self::ALL
            .iter()
            .copied()
            .find(|candidate| i64::from(candidate.level()) == level)
            .ok_or(CodecError::UnknownDetailLevel(level))?;
        Ok(*DETAIL_LEVEL_CACHE.entry(level).or_insert(resolved).value())
    }
}

impl Serialize for DetailLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for DetailLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = i64::deserialize(deserializer)?;
        Self::from_level(level).map_err(serde::de::Error::custom)
    }
}
