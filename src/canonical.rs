//! Canonical serialization for deterministic fingerprints.
//!
//! Options and reconciliation results are fingerprinted so a reported
//! agreement figure can be traced back to the exact configuration and output
//! that produced it.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order
//! - Maps in hashed data are `BTreeMap`/`BTreeSet`, never `HashMap`

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Only used with crate types whose `Serialize` impls cannot fail (no
/// non-string map keys, no fallible custom serializers).
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut attrs = BTreeMap::new();
        attrs.insert("certainty", "high");
        attrs.insert("temporality", "current");

        assert_eq!(canonical_hash(&attrs), canonical_hash(&attrs.clone()));
    }

    #[test]
    fn test_hex_width() {
        assert_eq!(canonical_hash_hex(&"doc_1").len(), 16);
    }
}
