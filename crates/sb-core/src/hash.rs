//! Fast hash map and hash set type aliases.
//!
//! This module provides type aliases for [`FxHashMap`] and [`FxHashSet`] from
//! the `rustc-hash` crate. The Fx hash algorithm is approximately 2x faster
//! than the standard library's default hasher for the short string keys this
//! codebase deals in (file paths, field names, provider labels), and
//! denial-of-service resistance is not required for internal bookkeeping.

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// The hasher used by [`FxHashMap`] and [`FxHashSet`].
pub type FxBuildHasher = rustc_hash::FxBuildHasher;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_basic() {
        let mut map: FxHashMap<String, u32> = FxHashMap::default();
        map.insert("email".to_owned(), 1);
        assert_eq!(map.get("email"), Some(&1));
    }

    #[test]
    fn test_fx_hash_set_basic() {
        let mut set: FxHashSet<&str> = FxHashSet::default();
        set.insert("plan");
        assert!(set.contains("plan"));
        assert!(!set.contains("other"));
    }
}
