//! Open-addressing table with identity probing and gap-closing deletion.
//!
//! Storage is a single flat `Box<[Option<(K, V)>]>` whose length is always a
//! power of two. `None` is the empty-slot sentinel; because it is not a value
//! of type `K` or `V`, no caller-visible key or value can ever collide with
//! it. Collisions are resolved by linear probing with stride 1, wrapping via
//! the capacity mask.
//!
//! Deletion is tombstone-free. Emptying a slot directly would cut every probe
//! sequence that passed through it, so `close_gap` relocates displaced
//! entries backward into the hole (Knuth's Algorithm R) until an empty slot
//! terminates the scan.

use core::mem;

use crate::identity::{slot_index, RefKey};

/// Smallest slot count ever allocated.
const MIN_CAPACITY: usize = 8;

/// The flat identity-probed table backing [`IdentityMap`](crate::IdentityMap).
///
/// Invariants:
/// - slot count is a power of two, at least `MIN_CAPACITY`;
/// - no two occupied slots hold keys with the same address;
/// - `len` equals the number of occupied slots;
/// - occupied slots never exceed two thirds of capacity, so at least one
///   empty slot always terminates a probe.
pub(crate) struct IdentityTable<K, V> {
    slots: Box<[Option<(K, V)>]>,
    len: usize,
}

/// Allocates an all-empty slot array. `(K, V)` need not be `Clone`, so this
/// cannot be a `vec![]` literal.
fn empty_slots<K, V>(capacity: usize) -> Box<[Option<(K, V)>]> {
    let mut slots = Vec::new();
    slots.resize_with(capacity, || None);
    slots.into_boxed_slice()
}

/// Rounds an expected entry count up to a capacity that holds it below the
/// two-thirds load factor.
fn capacity_for(expected: usize) -> usize {
    (expected.saturating_mul(3) / 2 + 1)
        .next_power_of_two()
        .max(MIN_CAPACITY)
}

impl<K, V> IdentityTable<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_expected(0)
    }

    /// Creates a table sized so `expected` entries fit without a resize.
    pub(crate) fn with_expected(expected: usize) -> Self {
        Self {
            slots: empty_slots(capacity_for(expected)),
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Empties every slot in place, keeping the current capacity.
    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    pub(crate) fn raw_slots(&self) -> &[Option<(K, V)>] {
        &self.slots
    }

    pub(crate) fn raw_slots_mut(&mut self) -> &mut [Option<(K, V)>] {
        &mut self.slots
    }

    pub(crate) fn into_parts(self) -> (Box<[Option<(K, V)>]>, usize) {
        (self.slots, self.len)
    }

    pub(crate) fn value_at(&self, slot: usize) -> Option<&V> {
        self.slots[slot].as_ref().map(|(_, v)| v)
    }

    /// Takes the pair out of an occupied slot, leaving a hole the caller must
    /// resolve — either `put_at` the same slot or `close_gap` it.
    pub(crate) fn take_at(&mut self, slot: usize) -> Option<(K, V)> {
        let pair = self.slots[slot].take()?;
        self.len -= 1;
        Some(pair)
    }

    /// Refills the hole left by `take_at`.
    pub(crate) fn put_at(&mut self, slot: usize, key: K, value: V) {
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some((key, value));
        self.len += 1;
    }

    /// Rewrites every value in place via `f`. Entries are never relocated, so
    /// this can never trigger the deletion compaction.
    pub(crate) fn replace_values(&mut self, mut f: impl FnMut(&K, V) -> V) {
        for slot in self.slots.iter_mut() {
            if let Some((key, value)) = slot.take() {
                let value = f(&key, value);
                *slot = Some((key, value));
            }
        }
    }
}

impl<K: RefKey, V> IdentityTable<K, V> {
    /// Probes for `addr` from its natural slot. `Ok(slot)` holds the key,
    /// `Err(slot)` is the first empty slot on its probe sequence.
    ///
    /// The search never passes a gap: the first empty slot means "absent",
    /// which is exactly why deletion must close gaps rather than leave them.
    #[inline]
    pub(crate) fn find(&self, addr: usize) -> Result<usize, usize> {
        let mask = self.mask();
        let mut i = slot_index(addr, mask);
        loop {
            // SAFETY: `i` is masked to the power-of-two slot count.
            match unsafe { self.slots.get_unchecked(i) } {
                None => return Err(i),
                Some((k, _)) if k.addr() == addr => return Ok(i),
                Some(_) => i = (i + 1) & mask,
            }
        }
    }

    pub(crate) fn get(&self, addr: usize) -> Option<&V> {
        match self.find(addr) {
            Ok(i) => self.slots[i].as_ref().map(|(_, v)| v),
            Err(_) => None,
        }
    }

    pub(crate) fn get_mut(&mut self, addr: usize) -> Option<&mut V> {
        match self.find(addr) {
            Ok(i) => self.slots[i].as_mut().map(|(_, v)| v),
            Err(_) => None,
        }
    }

    /// Inserts or overwrites, returning the previous value on overwrite.
    ///
    /// On a fresh insert the stored key is the caller's handle; on overwrite
    /// the originally stored key handle is kept and only the value changes.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let addr = key.addr();
        let mask = self.mask();
        let mut i = slot_index(addr, mask);
        loop {
            // SAFETY: `i` is masked to the power-of-two slot count.
            match unsafe { self.slots.get_unchecked_mut(i) } {
                slot @ None => {
                    *slot = Some((key, value));
                    self.len += 1;
                    self.maybe_grow();
                    return None;
                }
                Some((k, v)) if k.addr() == addr => {
                    return Some(mem::replace(v, value));
                }
                Some(_) => i = (i + 1) & mask,
            }
        }
    }

    /// Deletes by address. Absent keys are a no-op, not an error.
    pub(crate) fn remove(&mut self, addr: usize) -> Option<(K, V)> {
        match self.find(addr) {
            Ok(i) => self.remove_at(i),
            Err(_) => None,
        }
    }

    /// Empties an occupied slot and restores probe reachability.
    pub(crate) fn remove_at(&mut self, slot: usize) -> Option<(K, V)> {
        let pair = self.take_at(slot)?;
        self.close_gap(slot);
        Some(pair)
    }

    /// Algorithm R: closes the hole at `gap` so that every remaining key
    /// stays reachable by forward probing from its natural slot.
    ///
    /// Scans forward from the gap; an occupied slot at `i` whose natural slot
    /// `r` cyclically precedes the gap `d` (i.e. the gap sits on its probe
    /// path before `i`) is relocated into the gap, which then advances to
    /// `i`. The first empty slot ends the scan: nothing past it can have
    /// probed through the gap.
    pub(crate) fn close_gap(&mut self, gap: usize) {
        let mask = self.mask();
        let mut d = gap;
        let mut i = (d + 1) & mask;
        loop {
            let r = match &self.slots[i] {
                None => break,
                Some((k, _)) => slot_index(k.addr(), mask),
            };
            // Cyclic "gap lies in [r, i)" test; the three-way split handles
            // wrap-around of either interval endpoint.
            if (i < r && (r <= d || d <= i)) || (r <= d && d <= i) {
                self.slots[d] = self.slots[i].take();
                d = i;
            }
            i = (i + 1) & mask;
        }
    }

    /// Ensures `additional` more entries fit without exceeding the load
    /// factor.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = self.len.saturating_add(additional);
        if needed * 3 > self.capacity() * 2 {
            self.resize(capacity_for(needed));
        }
    }

    #[inline]
    fn maybe_grow(&mut self) {
        // Load factor two thirds: identity hashes are uniform after the
        // spread, which keeps expected probe lengths short at this bound.
        if self.len * 3 > self.capacity() * 2 {
            self.resize(self.capacity() * 2);
        }
    }

    /// Discards the old array and re-probes every occupied pair into a fresh
    /// one. Identity hash codes are position-independent, so a full rehash is
    /// the only correct resize; no deletion logic is involved.
    fn resize(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        debug_assert!(new_capacity * 2 >= self.len * 3);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            from = self.capacity(),
            to = new_capacity,
            len = self.len,
            "identity table resize"
        );

        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        let mask = new_capacity - 1;
        for slot in old.into_vec() {
            if let Some((key, value)) = slot {
                // Keys are pairwise distinct, so probing to the first empty
                // slot is a complete insert.
                let mut i = slot_index(key.addr(), mask);
                // SAFETY: `i` is masked to the power-of-two slot count.
                while unsafe { self.slots.get_unchecked(i) }.is_some() {
                    i = (i + 1) & mask;
                }
                self.slots[i] = Some((key, value));
            }
        }
    }
}

impl<K, V: RefKey> IdentityTable<K, V> {
    /// Storage-order scan for the first slot whose value has this address.
    /// Values are not indexed and need not be unique.
    pub(crate) fn position_of_value(&self, addr: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some((_, v)) if v.addr() == addr))
    }
}
