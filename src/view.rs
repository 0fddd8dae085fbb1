//! Iterators and mutating views over an [`IdentityMap`].
//!
//! The read iterators yield transient snapshots of current slot contents in
//! storage order. The three view handles (`KeyView`, `ValueView`,
//! `EntryView`) hold no data of their own: each borrows the map mutably and
//! delegates every membership test and removal to the same backing table, so
//! the map and its views can never desynchronize. A fresh handle is created
//! per call; all handles over one map are windows onto one table.

use core::iter::FusedIterator;

use crate::identity::RefKey;
use crate::map::IdentityMap;

/// Iterator over `(&K, &V)` pairs, arbitrary order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Option<(K, V)>], remaining: usize) -> Self {
        Self {
            slots: slots.iter(),
            remaining,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` pairs, arbitrary order.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut [Option<(K, V)>], remaining: usize) -> Self {
        Self {
            slots: slots.iter_mut(),
            remaining,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((&*k, v));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Iterator over keys, arbitrary order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over values, arbitrary order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Iterator over mutable values, arbitrary order.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut [Option<(K, V)>], remaining: usize) -> Self {
        Self {
            inner: IterMut::new(slots, remaining),
        }
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Consuming iterator over `(K, V)` pairs, arbitrary order.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Option<(K, V)>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(slots: Box<[Option<(K, V)>]>, remaining: usize) -> Self {
        Self {
            slots: slots.into_vec().into_iter(),
            remaining,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Some(pair) = slot {
                self.remaining -= 1;
                return Some(pair);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Mutating key-set view; membership and removal by key identity.
pub struct KeyView<'m, K, V> {
    map: &'m mut IdentityMap<K, V>,
}

impl<'m, K: RefKey, V> KeyView<'m, K, V> {
    pub(crate) fn new(map: &'m mut IdentityMap<K, V>) -> Self {
        Self { map }
    }

    /// Number of keys (always the map's size).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the backing map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Membership by identity: a logically equal but distinct referent is
    /// not contained.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Removes `key`'s entry from the backing map. Returns `false` — with no
    /// other effect — when the referent is not a key.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Iterates over the keys.
    pub fn iter(&self) -> Keys<'_, K, V> {
        self.map.keys()
    }
}

/// Mutating value-collection view; membership and removal by value identity.
pub struct ValueView<'m, K, V> {
    map: &'m mut IdentityMap<K, V>,
}

impl<'m, K: RefKey, V: RefKey> ValueView<'m, K, V> {
    pub(crate) fn new(map: &'m mut IdentityMap<K, V>) -> Self {
        Self { map }
    }

    /// Number of values (always the map's size; values need not be unique).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the backing map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Membership by identity, via a full occupied-slot scan.
    pub fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }

    /// Removes the first entry (in storage order) whose value is `value`'s
    /// referent. Other entries holding the same value referent stay.
    pub fn remove(&mut self, value: &V) -> bool {
        match self.map.table.position_of_value(value.addr()) {
            Some(slot) => self.map.table.remove_at(slot).is_some(),
            None => false,
        }
    }

    /// Iterates over the values.
    pub fn iter(&self) -> Values<'_, K, V> {
        self.map.values()
    }
}

/// Mutating entry-set view; both key and value must match by identity at the
/// same slot.
pub struct EntryView<'m, K, V> {
    map: &'m mut IdentityMap<K, V>,
}

impl<'m, K: RefKey, V: RefKey> EntryView<'m, K, V> {
    pub(crate) fn new(map: &'m mut IdentityMap<K, V>) -> Self {
        Self { map }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the backing map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` iff `key`'s referent maps to exactly `value`'s
    /// referent.
    pub fn contains(&self, key: &K, value: &V) -> bool {
        match self.map.table.find(key.addr()) {
            Ok(slot) => {
                matches!(self.map.table.value_at(slot), Some(v) if v.addr() == value.addr())
            }
            Err(_) => false,
        }
    }

    /// Removes the entry only when both key and value match by identity; any
    /// mismatch is a no-op returning `false`.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        match self.map.table.find(key.addr()) {
            Ok(slot)
                if matches!(self.map.table.value_at(slot), Some(v) if v.addr() == value.addr()) =>
            {
                self.map.table.remove_at(slot).is_some()
            }
            _ => false,
        }
    }

    /// Iterates over `(&K, &V)` entry snapshots.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.map.iter()
    }
}
