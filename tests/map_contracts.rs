//! Equality/hash contracts, conditional-update call discipline, and the
//! bulk-rewrite operations.

use std::rc::Rc;

use refmap::IdentityMap;

type RcMap = IdentityMap<Rc<String>, Rc<u32>>;

fn sample_refs(n: usize) -> (Vec<Rc<String>>, Vec<Rc<u32>>) {
    let keys = (0..n).map(|i| Rc::new(format!("k{i}"))).collect();
    let values = (0..n).map(|i| Rc::new(i as u32)).collect();
    (keys, values)
}

#[test]
fn same_references_same_map_regardless_of_insert_order() {
    let (keys, values) = sample_refs(8);

    let mut forward = RcMap::new();
    for (k, v) in keys.iter().zip(&values) {
        forward.insert(Rc::clone(k), Rc::clone(v));
    }
    let mut backward = RcMap::with_capacity(64);
    for (k, v) in keys.iter().zip(&values).rev() {
        backward.insert(Rc::clone(k), Rc::clone(v));
    }

    assert_eq!(forward, backward);
    assert_eq!(backward, forward);
    assert_eq!(forward.identity_hash(), backward.identity_hash());
}

#[test]
fn equal_but_distinct_key_breaks_equality_both_ways() {
    let (keys, values) = sample_refs(4);
    let mut a = RcMap::new();
    let mut b = RcMap::new();
    for (k, v) in keys.iter().zip(&values) {
        a.insert(Rc::clone(k), Rc::clone(v));
        b.insert(Rc::clone(k), Rc::clone(v));
    }
    assert_eq!(a, b);

    // Swap one key in `b` for an equal-content distinct referent.
    let replacement = Rc::new(format!("k{}", 0));
    assert_eq!(*replacement, *keys[0]);
    b.remove(&keys[0]);
    b.insert(replacement, Rc::clone(&values[0]));

    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
    assert_ne!(b, a);
}

#[test]
fn equal_but_distinct_value_breaks_equality_both_ways() {
    let (keys, values) = sample_refs(4);
    let mut a = RcMap::new();
    let mut b = RcMap::new();
    for (k, v) in keys.iter().zip(&values) {
        a.insert(Rc::clone(k), Rc::clone(v));
        b.insert(Rc::clone(k), Rc::clone(v));
    }

    let replacement = Rc::new(*values[0]);
    b.insert(Rc::clone(&keys[0]), replacement);

    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
    assert_ne!(b, a);
}

#[test]
fn compute_if_absent_never_invokes_when_present() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();
    map.insert(Rc::clone(&k), 5);

    let mut invoked = false;
    let out = map.compute_if_absent(Rc::clone(&k), |_| {
        invoked = true;
        Some(0)
    });
    assert_eq!(out, Some(&5));
    assert!(!invoked);
}

#[test]
fn compute_if_absent_inserts_or_declines() {
    let k1 = Rc::new(1_u8);
    let k2 = Rc::new(2_u8);
    let mut map = IdentityMap::new();

    assert_eq!(map.compute_if_absent(Rc::clone(&k1), |_| Some(10)), Some(&10));
    assert_eq!(map.get(&k1), Some(&10));

    // A declining function leaves the map untouched.
    assert_eq!(map.compute_if_absent(Rc::clone(&k2), |_| None), None);
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key(&k2));
}

#[test]
fn compute_if_present_never_invokes_when_absent() {
    let k = Rc::new(1_u8);
    let mut map: IdentityMap<Rc<u8>, u32> = IdentityMap::new();

    let mut invoked = false;
    let out = map.compute_if_present(&k, |_, v| {
        invoked = true;
        Some(v)
    });
    assert_eq!(out, None);
    assert!(!invoked);
    assert!(map.is_empty());
}

#[test]
fn compute_if_present_overwrites_or_deletes() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();
    map.insert(Rc::clone(&k), 3_u32);

    assert_eq!(map.compute_if_present(&k, |_, v| Some(v * 2)), Some(&6));
    assert_eq!(map.get(&k), Some(&6));

    assert_eq!(map.compute_if_present(&k, |_, _| None), None);
    assert!(!map.contains_key(&k));
    assert!(map.is_empty());
}

#[test]
fn compute_covers_all_four_transitions() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();

    // absent -> absent: no-op.
    assert_eq!(map.compute(Rc::clone(&k), |_, v| {
        assert_eq!(v, None);
        None
    }), None);
    assert!(map.is_empty());

    // absent -> present: insert.
    assert_eq!(map.compute(Rc::clone(&k), |_, _| Some(1_u32)), Some(&1));

    // present -> present: overwrite, seeing the current value.
    assert_eq!(map.compute(Rc::clone(&k), |_, v| {
        assert_eq!(v, Some(1));
        Some(2)
    }), Some(&2));

    // present -> absent: delete.
    assert_eq!(map.compute(Rc::clone(&k), |_, _| None), None);
    assert!(map.is_empty());
}

#[test]
fn merge_does_not_invoke_on_absent_key() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();

    let mut invoked = false;
    let out = map.merge(Rc::clone(&k), 4_u32, |_, _| {
        invoked = true;
        None
    });
    assert_eq!(out, Some(&4));
    assert!(!invoked);
    assert_eq!(map.get(&k), Some(&4));
}

#[test]
fn merge_combines_or_deletes_when_present() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();
    map.insert(Rc::clone(&k), 4_u32);

    assert_eq!(map.merge(Rc::clone(&k), 6, |old, new| Some(old + new)), Some(&10));
    assert_eq!(map.get(&k), Some(&10));

    assert_eq!(map.merge(Rc::clone(&k), 1, |_, _| None), None);
    assert!(!map.contains_key(&k));
}

#[test]
fn insert_if_absent_prefers_existing() {
    let k = Rc::new(1_u8);
    let mut map = IdentityMap::new();

    assert_eq!(map.insert_if_absent(Rc::clone(&k), 1), None);
    assert_eq!(map.insert_if_absent(Rc::clone(&k), 2), Some(&1));
    assert_eq!(map.get(&k), Some(&1));
    assert_eq!(map.len(), 1);
}

#[test]
fn replace_all_rewrites_every_value_in_place() {
    let keys: Vec<Rc<u32>> = (0..30).map(Rc::new).collect();
    let mut map: IdentityMap<_, _> = keys.iter().map(|k| (Rc::clone(k), **k)).collect();

    map.replace_all(|k, v| v + **k);

    assert_eq!(map.len(), 30);
    for k in &keys {
        assert_eq!(map.get(k), Some(&(**k * 2)));
    }
}

#[test]
fn for_each_visits_every_entry_once() {
    let keys: Vec<Rc<u32>> = (0..12).map(Rc::new).collect();
    let map: IdentityMap<_, _> = keys.iter().map(|k| (Rc::clone(k), 1_u32)).collect();

    let mut visits = 0;
    let mut sum = 0;
    map.for_each(|k, v| {
        visits += 1;
        sum += **k * v;
    });
    assert_eq!(visits, 12);
    assert_eq!(sum, (0..12).sum::<u32>());
}

#[test]
fn put_all_applies_source_entries_with_overwrite() {
    let shared = Rc::new(String::from("shared"));
    let (keys, values) = sample_refs(3);

    let mut dst = RcMap::new();
    dst.insert(Rc::clone(&shared), Rc::new(1));
    dst.insert(Rc::clone(&keys[0]), Rc::clone(&values[0]));

    let mut src = RcMap::new();
    src.insert(Rc::clone(&shared), Rc::new(2));
    src.insert(Rc::clone(&keys[1]), Rc::clone(&values[1]));

    dst.put_all(&src);

    assert_eq!(dst.len(), 3);
    assert_eq!(**dst.get(&shared).unwrap(), 2); // source wins on collision
    assert!(dst.contains_key(&keys[0]));
    assert!(dst.contains_key(&keys[1]));
}

#[test]
fn clear_empties_but_keeps_working() {
    let (keys, values) = sample_refs(10);
    let mut map = RcMap::new();
    for (k, v) in keys.iter().zip(&values) {
        map.insert(Rc::clone(k), Rc::clone(v));
    }

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
    for k in &keys {
        assert!(!map.contains_key(k));
    }

    map.insert(Rc::clone(&keys[0]), Rc::clone(&values[0]));
    assert_eq!(map.len(), 1);
}
