//! Cache Namespace Module
//!
//! Logical partitions of the backing store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Cache Namespace ==
/// Selects a partition of the backing store.
///
/// The discriminants are the partition indexes used on the wire (Redis logical
/// database numbers). They are persisted state: never renumber a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheNamespace {
    /// Token cache blobs
    Authentication = 0,
    /// Memoized API responses and other general-purpose objects
    DataStructures = 1,
}

impl CacheNamespace {
    /// Every namespace, in index order.
    pub const ALL: [CacheNamespace; 2] = [CacheNamespace::Authentication, CacheNamespace::DataStructures];

    /// Stable partition index.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Lowercase name used in URLs and logs.
    pub fn name(self) -> &'static str {
        match self {
            CacheNamespace::Authentication => "authentication",
            CacheNamespace::DataStructures => "data-structures",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheNamespace {
    type Err = CacheError;

    /// Accepts the lowercase name or the numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheNamespace::ALL
            .into_iter()
            .find(|ns| ns.name().eq_ignore_ascii_case(s) || ns.index().to_string() == s)
            .ok_or_else(|| CacheError::invalid(format!("Unknown cache namespace: {}", s)))
    }
}
