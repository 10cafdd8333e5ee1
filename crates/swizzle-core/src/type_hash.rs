//! Deterministic hash-based identity for classes, protocols and methods.
//!
//! [`TypeHash`] is a 64-bit hash computed from names, so the same name always
//! produces the same identity. This is what makes synthetic classes
//! idempotent by construction: the class derived for a given
//! (actual class, template class) pair always hashes to the same value.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants so that a class and a
//! protocol sharing a name (the usual template/tag arrangement) never collide.
//!
//! # Examples
//!
//! ```
//! use swizzle_core::TypeHash;
//!
//! let class = TypeHash::from_name("Flavor");
//! let tag = TypeHash::from_protocol("Flavor");
//! assert_eq!(class, TypeHash::from_name("Flavor"));
//! assert_ne!(class, tag);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for class hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for protocol (capability tag) hashes
    pub const PROTOCOL: u64 = 0x6b1e2d9f40c3a857;

    /// Domain marker for owner-independent selector hashes
    pub const SELECTOR: u64 = 0x1a095090689d4647;

    /// Domain marker for method implementation hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a class, protocol, selector or method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a class hash from a class name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a protocol hash from a protocol name.
    ///
    /// Protocols live in their own domain, so a template class and its
    /// same-named capability tag have distinct hashes.
    #[inline]
    pub fn from_protocol(name: &str) -> Self {
        TypeHash(hash_constants::PROTOCOL ^ xxh64(name.as_bytes(), 0))
    }

    /// Create an owner-independent selector hash.
    ///
    /// Two classes implementing `describe` share the selector hash but not
    /// the method hash.
    #[inline]
    pub fn from_selector(selector: &str) -> Self {
        TypeHash(hash_constants::SELECTOR ^ xxh64(selector.as_bytes(), 0))
    }

    /// Create a method hash from the owning class and selector.
    ///
    /// # Examples
    ///
    /// ```
    /// use swizzle_core::TypeHash;
    ///
    /// let a = TypeHash::from_method(TypeHash::from_name("Base"), "describe");
    /// let b = TypeHash::from_method(TypeHash::from_name("Flavor"), "describe");
    /// assert_ne!(a, b);
    /// ```
    #[inline]
    pub fn from_method(owner: TypeHash, selector: &str) -> Self {
        let hash = hash_constants::METHOD ^ xxh64(selector.as_bytes(), 0);
        // wrapping_mul keeps (owner, selector) from commuting
        TypeHash(hash.wrapping_mul(hash_constants::TYPE).wrapping_add(owner.0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
