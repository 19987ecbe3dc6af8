//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a qualified type name, or from
//! an owner plus a member name and parameter types. The same input always
//! yields the same hash, so registries can key on it without depending on
//! registration order.
//!
//! # Examples
//!
//! ```
//! use skeleton_key_core::TypeHash;
//!
//! let a = TypeHash::from_name("House");
//! let b = TypeHash::from_name("House");
//! assert_eq!(a, b);
//!
//! let m1 = TypeHash::from_member(a, "open", &[TypeHash::from_name("Key")]);
//! let m2 = TypeHash::from_member(a, "open", &[]);
//! assert_ne!(m1, m2);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
///
/// Types and members get distinct domain markers so a type and a member
/// sharing a name never collide.
pub mod hash_constants {
    /// Separator constant for parameter mixing.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for member (field, method, constructor) hashes.
    pub const MEMBER: u64 = 0x7d3c8b4a92e15f6d;

    /// Parameter position mixing constants.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type or a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a member hash from its owner, name and parameter type hashes.
    ///
    /// Parameter order matters: `(int, bool)` and `(bool, int)` differ.
    #[inline]
    pub fn from_member(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::MEMBER ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the mix order-sensitive
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
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
