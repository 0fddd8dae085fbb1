//! Identity hashing — the address-based hash/equality contract.
//!
//! Everything in this crate compares and hashes by *referent address*. There
//! is no `BuildHasher` seam on purpose: identity hashing is wired into every
//! table operation, which is what distinguishes an identity map from a
//! content-hashed map with a custom equality functor.

use std::rc::Rc;
use std::sync::Arc;

/// The identity contract: a key (or value) that names a referent by address.
///
/// `addr` must be stable for as long as the implementor is stored in a map,
/// and must be independent of logical content. Two handles are
/// identity-equal exactly when their `addr` values coincide.
///
/// Blanket implementations cover the usual owning and borrowing handles
/// (`&T`, `Box<T>`, `Rc<T>`, `Arc<T>`, raw pointers). The trait is public so
/// that callers — and tests that need deterministic probe collisions — can
/// supply their own identity source.
///
/// # Caveats
///
/// Address identity inherits the platform's aliasing rules: references to
/// zero-sized values, or to interned/deduplicated statics such as equal
/// string literals, may share an address and therefore collapse to a single
/// identity. Heap allocations of non-zero-sized values are always distinct
/// while alive.
pub trait RefKey {
    /// Returns the referent address.
    fn addr(&self) -> usize;
}

impl<'a, T: ?Sized> RefKey for &'a T {
    #[inline(always)]
    fn addr(&self) -> usize {
        (*self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> RefKey for Box<T> {
    #[inline(always)]
    fn addr(&self) -> usize {
        (&**self as *const T).cast::<()>() as usize
    }
}

impl<T: ?Sized> RefKey for Rc<T> {
    #[inline(always)]
    fn addr(&self) -> usize {
        Rc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> RefKey for Arc<T> {
    #[inline(always)]
    fn addr(&self) -> usize {
        Arc::as_ptr(self).cast::<()>() as usize
    }
}

impl<T: ?Sized> RefKey for *const T {
    #[inline(always)]
    fn addr(&self) -> usize {
        (*self).cast::<()>() as usize
    }
}

impl<T: ?Sized> RefKey for *mut T {
    #[inline(always)]
    fn addr(&self) -> usize {
        (*self).cast_const().cast::<()>() as usize
    }
}

/// Returns `true` iff `a` and `b` name the same referent.
#[inline(always)]
pub fn identity_eq<K: RefKey + ?Sized>(a: &K, b: &K) -> bool {
    a.addr() == b.addr()
}

/// Fibonacci multiplicative constant, `2^64 / φ`.
const SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Spreads an address so that masking to a power-of-two capacity keeps
/// entropy. Heap addresses share low-bit alignment patterns, so the mix
/// folds the high product bits back down before the mask is applied.
#[inline(always)]
pub(crate) fn spread(addr: usize) -> u64 {
    let h = (addr as u64).wrapping_mul(SPREAD);
    h ^ (h >> 32)
}

/// Maps an address to its natural probe-start slot for a table of
/// `mask + 1` slots (`mask + 1` a power of two).
#[inline(always)]
pub(crate) fn slot_index(addr: usize, mask: usize) -> usize {
    (spread(addr) as usize) & mask
}
