//! `IdentityMap` — the public identity-semantics associative map.
//!
//! Membership, lookup and equality are decided by referent address (via
//! [`RefKey`]), never by `Eq`/`Hash` of the key or value contents. Two
//! logically equal keys held behind distinct allocations are two different
//! keys; cloning an `Rc` yields the same key.
//!
//! All operations are synchronous and single-threaded by contract; instances
//! shared across threads need external synchronization, exactly as with any
//! `&mut`-mutated structure.

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::identity::RefKey;
use crate::table::IdentityTable;
use crate::view::{EntryView, IntoIter, Iter, IterMut, KeyView, Keys, ValueView, Values, ValuesMut};

/// A hash map keyed by reference identity.
///
/// Absence is encoded as `None` throughout; "not found" is a normal result,
/// never an error. The conditional-update family (`compute*`, `merge`)
/// mirrors the classic `Map` contracts of identity dictionaries (cf.
/// `java.util.IdentityHashMap`), with closures in place of nullable function
/// objects.
///
/// ```
/// use std::rc::Rc;
/// use refmap::IdentityMap;
///
/// let k1 = Rc::new(String::from("config"));
/// let k2 = Rc::new(String::from("config")); // logically equal, distinct referent
///
/// let mut map = IdentityMap::new();
/// map.insert(Rc::clone(&k1), 1);
/// map.insert(Rc::clone(&k2), 2);
///
/// assert_eq!(map.len(), 2); // no aliasing between equal contents
/// assert_eq!(map.get(&k1), Some(&1));
/// assert_eq!(map.get(&k2), Some(&2));
///
/// let probe = Rc::new(String::from("config"));
/// assert!(!map.contains_key(&probe)); // content equality is never consulted
/// ```
pub struct IdentityMap<K, V> {
    pub(crate) table: IdentityTable<K, V>,
}

impl<K, V> IdentityMap<K, V> {
    /// Creates an empty map with the minimum capacity.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: IdentityTable::new(),
        }
    }

    /// Creates an empty map sized so that `expected` entries fit without a
    /// resize. Only the initial capacity is affected, never behavior.
    #[inline]
    #[must_use]
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            table: IdentityTable::with_expected(expected),
        }
    }

    /// Returns the number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Returns the current slot capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Iterates over `(&key, &value)` pairs in arbitrary (storage) order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.raw_slots(), self.table.len())
    }

    /// Iterates over `(&key, &mut value)` pairs in arbitrary order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.table.len();
        IterMut::new(self.table.raw_slots_mut(), len)
    }

    /// Iterates over keys in arbitrary order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterates over values in arbitrary order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Iterates over mutable values in arbitrary order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        let len = self.table.len();
        ValuesMut::new(self.table.raw_slots_mut(), len)
    }

    /// Calls `f` on every entry exactly once, in arbitrary order.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Rewrites every value in place as `f(key, value)`.
    ///
    /// This is a value-only rewrite: no entry is removed or relocated, so
    /// probe chains are untouched even when `f` returns values equal (or
    /// identical) to other keys' values.
    pub fn replace_all(&mut self, f: impl FnMut(&K, V) -> V) {
        self.table.replace_values(f);
    }
}

impl<K: RefKey, V> IdentityMap<K, V> {
    /// Returns `true` if `key`'s referent is a key of this map.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.find(key.addr()).is_ok()
    }

    /// Returns the value mapped to `key`'s referent.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key.addr())
    }

    /// Returns the value mapped to `key`'s referent, mutably.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key.addr())
    }

    /// Returns the mapped value, or `default` when absent. Never mutates.
    pub fn get_or<'s>(&'s self, key: &K, default: &'s V) -> &'s V {
        self.get(key).unwrap_or(default)
    }

    /// Maps `key` to `value`, returning the previous value on overwrite.
    ///
    /// On overwrite the originally stored key handle is kept and the offered
    /// one is dropped; the two are indistinguishable by identity.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Inserts only when absent. Returns the existing value when present (in
    /// which case the offered value is dropped), `None` after inserting.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        let addr = key.addr();
        match self.table.find(addr) {
            Ok(_) => self.table.get(addr),
            Err(_) => {
                self.table.insert(key, value);
                None
            }
        }
    }

    /// Removes `key`'s entry, returning its value. Triggers the gap-closing
    /// delete; removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key.addr()).map(|(_, v)| v)
    }

    /// Removes `key`'s entry, returning the stored key handle and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove(key.addr())
    }

    /// Returns the mapping for `key`, computing one with `f` when absent.
    ///
    /// `f` is not invoked when the key is present. A `None` result from `f`
    /// leaves the map unchanged and returns `None`.
    pub fn compute_if_absent(
        &mut self,
        key: K,
        f: impl FnOnce(&K) -> Option<V>,
    ) -> Option<&V> {
        let addr = key.addr();
        if self.table.find(addr).is_err() {
            match f(&key) {
                Some(value) => {
                    self.table.insert(key, value);
                }
                None => return None,
            }
        }
        self.table.get(addr)
    }

    /// Remaps `key`'s value with `f` when present.
    ///
    /// `f` is not invoked when the key is absent. A `None` result deletes the
    /// entry (gap-closing); `Some` overwrites in place.
    pub fn compute_if_present(
        &mut self,
        key: &K,
        f: impl FnOnce(&K, V) -> Option<V>,
    ) -> Option<&V> {
        let addr = key.addr();
        let slot = self.table.find(addr).ok()?;
        let (stored_key, value) = self.table.take_at(slot)?;
        match f(&stored_key, value) {
            Some(value) => {
                self.table.put_at(slot, stored_key, value);
                self.table.get(addr)
            }
            None => {
                self.table.close_gap(slot);
                None
            }
        }
    }

    /// Remaps `key` unconditionally: `f` sees the current value (or `None`)
    /// and its result becomes the new mapping (`None` deletes, or is a no-op
    /// when nothing was mapped).
    pub fn compute(
        &mut self,
        key: K,
        f: impl FnOnce(&K, Option<V>) -> Option<V>,
    ) -> Option<&V> {
        let addr = key.addr();
        match self.table.find(addr) {
            Ok(slot) => {
                let (stored_key, value) = self.table.take_at(slot)?;
                match f(&stored_key, Some(value)) {
                    Some(value) => {
                        self.table.put_at(slot, stored_key, value);
                        self.table.get(addr)
                    }
                    None => {
                        self.table.close_gap(slot);
                        None
                    }
                }
            }
            Err(_) => match f(&key, None) {
                Some(value) => {
                    self.table.insert(key, value);
                    self.table.get(addr)
                }
                None => None,
            },
        }
    }

    /// Merges `value` into `key`'s mapping.
    ///
    /// When absent, inserts `value` directly without invoking `f`. When
    /// present, `f(old, value)` decides: `Some` overwrites, `None` deletes.
    pub fn merge(
        &mut self,
        key: K,
        value: V,
        f: impl FnOnce(V, V) -> Option<V>,
    ) -> Option<&V> {
        let addr = key.addr();
        match self.table.find(addr) {
            Ok(slot) => {
                let (stored_key, old) = self.table.take_at(slot)?;
                match f(old, value) {
                    Some(value) => {
                        self.table.put_at(slot, stored_key, value);
                        self.table.get(addr)
                    }
                    None => {
                        self.table.close_gap(slot);
                        None
                    }
                }
            }
            Err(_) => {
                self.table.insert(key, value);
                self.table.get(addr)
            }
        }
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// A mutating view over the keys; removals delegate to the table's
    /// gap-closing delete.
    pub fn key_view(&mut self) -> KeyView<'_, K, V> {
        KeyView::new(self)
    }

}

impl<K: RefKey, V: RefKey> IdentityMap<K, V> {
    /// A mutating view over the entries; `contains`/`remove` require key and
    /// value to match by identity at the same slot.
    pub fn entry_view(&mut self) -> EntryView<'_, K, V> {
        EntryView::new(self)
    }

    /// Returns `true` if some entry's value is `value`'s referent. Full
    /// storage-order scan; values are not indexed.
    pub fn contains_value(&self, value: &V) -> bool {
        self.table.position_of_value(value.addr()).is_some()
    }

    /// A mutating view over the values; `remove` deletes the first entry
    /// whose value matches by identity (values need not be unique).
    pub fn value_view(&mut self) -> ValueView<'_, K, V> {
        ValueView::new(self)
    }

    /// Order-independent identity hash: the wrapping sum over all entries of
    /// `addr(key) ^ addr(value)`. Equal maps hash equally regardless of
    /// insertion order or resize history.
    pub fn identity_hash(&self) -> u64 {
        self.iter().fold(0_u64, |acc, (k, v)| {
            acc.wrapping_add((k.addr() as u64) ^ (v.addr() as u64))
        })
    }
}

impl<K: RefKey, V: RefKey> PartialEq for IdentityMap<K, V> {
    /// Two maps are equal iff they have the same size and every entry of one
    /// maps the identical key referent to the identical value referent in
    /// the other.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| matches!(other.table.get(k.addr()), Some(ov) if ov.addr() == v.addr()))
    }
}

impl<K: RefKey, V: RefKey> Eq for IdentityMap<K, V> {}

impl<K: RefKey, V: RefKey> Hash for IdentityMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

impl<K, V> Default for IdentityMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RefKey + fmt::Debug, V: fmt::Debug> fmt::Debug for IdentityMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: RefKey, V> Extend<(K, V)> for IdentityMap<K, V> {
    /// Applies `insert` per source pair, in source-iteration order.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: RefKey, V> FromIterator<(K, V)> for IdentityMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut map = Self::with_capacity(lower);
        map.extend(iter);
        map
    }
}

impl<K: RefKey + Clone, V: Clone> IdentityMap<K, V> {
    /// Copies every entry of `other` into `self`, overwriting on identity
    /// collisions, in `other`'s iteration order.
    pub fn put_all(&mut self, other: &Self) {
        self.reserve(other.len());
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone());
        }
    }
}

impl<'a, K, V> IntoIterator for &'a IdentityMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut IdentityMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for IdentityMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let (slots, len) = self.table.into_parts();
        IntoIter::new(slots, len)
    }
}
