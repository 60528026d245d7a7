//! # Common Types

/// Type alias for hash maps in this crate.
pub type PMHashMap<K, V> = ahash::AHashMap<K, V>;

/// Corpus occurrence counts.
pub type Count = u64;
