//! # `refmap` — an identity-semantics hash map
//!
//! A key-value store whose membership, lookup and equality are decided by
//! *reference identity* (referent address), never by the logical `Eq`/`Hash`
//! of keys or values — the Rust counterpart of an identity dictionary such
//! as `java.util.IdentityHashMap`. Two equal strings behind distinct
//! allocations are two distinct keys; two `Rc` clones of one allocation are
//! one key.
//!
//! This cannot be obtained by handing a custom hasher to a generic map:
//! identity comparison and identity hashing are wired into every internal
//! operation, including the derived view collections.
//!
//! ## Design
//!
//! - **Open addressing**: all entries live in one flat slot array (no
//!   per-entry allocation, no chaining), linear probing, power-of-two
//!   capacity, load factor bounded at two thirds.
//! - **Tombstone-free deletion**: removal closes the gap by relocating
//!   displaced entries backward along their probe sequences (Knuth's
//!   Algorithm R), so every remaining key stays reachable.
//! - **Identity views**: [`IdentityMap::key_view`], [`IdentityMap::value_view`]
//!   and [`IdentityMap::entry_view`] are live windows over the same table;
//!   removing through any view mutates the map, and removing a
//!   logically-equal-but-distinct referent is always a silent no-op.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use refmap::IdentityMap;
//!
//! let k1 = Rc::new(String::from("config"));
//! let k2 = Rc::new(String::from("config")); // equal content, distinct referent
//!
//! let mut map = IdentityMap::new();
//! map.insert(Rc::clone(&k1), 1);
//! map.insert(Rc::clone(&k2), 2);
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&k1), Some(&1));
//! assert!(!map.contains_key(&Rc::new(String::from("config"))));
//! ```
//!
//! ## Concurrency
//!
//! Instances are single-threaded by contract: there is no internal locking,
//! and sharing one across threads requires external mutual exclusion. The
//! borrow checker already rules out iterating a map while structurally
//! mutating it, so no fail-fast iterator machinery exists.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod identity;
pub mod map;
mod table;
pub mod view;

pub use identity::{identity_eq, RefKey};
pub use map::IdentityMap;
pub use view::{
    EntryView, IntoIter, Iter, IterMut, KeyView, Keys, ValueView, Values, ValuesMut,
};
