//! HashMap: buckets of entries keyed by the raw `hash_code` of their keys.
//!
//! Layout
//! - `buckets`: a `SlotMap` of buckets, one per distinct hash code seen.
//!   Each bucket is a `Vec` of entries in insertion order. Buckets are only
//!   dropped by `clear`, which replaces the whole slot map, so slot order is
//!   the order in which hash codes were first seen.
//! - `index`: a `hashbrown::HashTable` from hash code to bucket slot. The
//!   build hasher `S` only places codes inside this index; the code itself is
//!   the bucket identity, with no modulo folding.
//!
//! Inside a bucket, lookups are a linear scan with [`equals`], stored key
//! first. A constant hash function therefore degrades to a single bucket and
//! a linear search, never to wrong answers.

use crate::hash_eq::{equals, HashEq};
use crate::reentrancy::ReentrancyCheck;
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use hashbrown::hash_table::{Entry as TableEntry, HashTable};
use slotmap::{new_key_type, SlotMap};
use std::collections::hash_map::RandomState;

new_key_type! {
    struct BucketKey;
}

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

#[derive(Clone, Debug)]
struct Bucket<K, V> {
    code: i64,
    entries: Vec<Entry<K, V>>,
}

/// Associative container whose key identity is `HashEq`, not `Eq`/`Hash`.
///
/// `len` is kept alongside the buckets and always equals the sum of their
/// lengths. Replacing the value of an existing key leaves it untouched.
///
/// Cloning copies every bucket, so a clone never aliases the original.
pub struct HashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<BucketKey>,
    buckets: SlotMap<BucketKey, Bucket<K, V>>,
    len: usize,
    reentrancy: ReentrancyCheck,
}

impl<K, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// `capacity` pre-sizes the bucket index, i.e. the number of distinct
    /// hash codes expected.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            buckets: SlotMap::with_capacity_and_key(capacity),
            len: 0,
            reentrancy: ReentrancyCheck::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every bucket; later insertions start a fresh bucket order.
    pub fn clear(&mut self) {
        self.index.clear();
        self.buckets = SlotMap::with_key();
        self.len = 0;
    }

    /// Entries grouped by bucket, buckets in the order their hash code was
    /// first inserted, entries in insertion order within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.values(),
            entries: Default::default(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: self.buckets.values_mut(),
            entries: Default::default(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Visit every entry once, in iteration order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Sum of `code * bucket_len` over non-empty buckets.
    fn bucket_hash_sum(&self) -> i64 {
        self.buckets
            .values()
            .filter(|b| !b.entries.is_empty())
            .fold(0i64, |h, b| {
                h.wrapping_add(b.code.wrapping_mul(b.entries.len() as i64))
            })
    }

    #[inline]
    fn debug_check_len(&self) {
        debug_assert_eq!(
            self.len,
            self.buckets.values().map(|b| b.entries.len()).sum::<usize>(),
            "running count diverged from bucket contents"
        );
    }

    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    pub(crate) fn entries_in_buckets(&self) -> usize {
        self.buckets.values().map(|b| b.entries.len()).sum()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: HashEq,
    S: BuildHasher,
{
    fn find_bucket(&self, code: i64) -> Option<BucketKey> {
        let hash = self.hasher.hash_one(code);
        self.index
            .find(hash, |&k| {
                self.buckets
                    .get(k)
                    .map(|b| b.code == code)
                    .unwrap_or(false)
            })
            .copied()
    }

    fn find_entry(&self, key: &K) -> Option<(BucketKey, usize)> {
        let slot = self.find_bucket(key.hash_code())?;
        let pos = self
            .buckets
            .get(slot)?
            .entries
            .iter()
            .position(|e| equals(&e.key, key))?;
        Some((slot, pos))
    }

    /// Insert or replace. Returns the previous value when `key` was already
    /// present; the count only changes when it was not.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter_exclusive();
        let code = key.hash_code();
        let hash = self.hasher.hash_one(code);
        let slot = match self.index.entry(
            hash,
            |&k| {
                self.buckets
                    .get(k)
                    .map(|b| b.code == code)
                    .unwrap_or(false)
            },
            |&k| {
                self.buckets
                    .get(k)
                    .map(|b| self.hasher.hash_one(b.code))
                    .unwrap_or(0)
            },
        ) {
            TableEntry::Occupied(o) => *o.get(),
            TableEntry::Vacant(v) => {
                let k = self.buckets.insert(Bucket {
                    code,
                    entries: Vec::new(),
                });
                let _ = v.insert(k);
                k
            }
        };

        let entries = &mut self.buckets[slot].entries;
        if let Some(entry) = entries.iter_mut().find(|e| equals(&e.key, &key)) {
            return Some(core::mem::replace(&mut entry.value, value));
        }
        entries.push(Entry { key, value });
        self.len += 1;
        self.debug_check_len();
        None
    }

    /// Insert only when `key` is absent. Returns the value already stored
    /// for `key`, or `None` if this call inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        let found = {
            let _g = self.reentrancy.enter_exclusive();
            self.find_entry(&key)
        };
        match found {
            Some((slot, pos)) => Some(&self.buckets[slot].entries[pos].value),
            None => {
                self.put(key, value);
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let _g = self.reentrancy.enter_shared();
        let (slot, pos) = self.find_entry(key)?;
        self.buckets.get(slot).map(|b| &b.entries[pos].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let _g = self.reentrancy.enter_exclusive();
        let (slot, pos) = self.find_entry(key)?;
        self.buckets.get_mut(slot).map(|b| &mut b.entries[pos].value)
    }

    pub fn get_or_default<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let _g = self.reentrancy.enter_shared();
        self.find_entry(key).is_some()
    }

    /// Removes the entry for `key`. An emptied bucket stays in place and
    /// keeps its iteration position.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let _g = self.reentrancy.enter_exclusive();
        let (slot, pos) = self.find_entry(key)?;
        let entry = self.buckets[slot].entries.remove(pos);
        self.len -= 1;
        self.debug_check_len();
        Some(entry.value)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    V: HashEq,
{
    /// Scans every bucket; stored value first in the comparison.
    pub fn contains_value(&self, value: &V) -> bool {
        let _g = self.reentrancy.enter_shared();
        self.buckets
            .values()
            .any(|b| b.entries.iter().any(|e| equals(&e.value, value)))
    }
}

/// `hash_code` is the weak bucket aggregate `sum(code * bucket_len)`.
/// `equals` holds when both maps have the same size and every entry of
/// `self` is found in `other` with an equal value. With asymmetric key or
/// value predicates it need not be symmetric.
impl<K, V, S> HashEq for HashMap<K, V, S>
where
    K: HashEq,
    V: HashEq,
    S: BuildHasher,
{
    fn hash_code(&self) -> i64 {
        self.bucket_hash_sum()
    }

    fn equals(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).map_or(false, |ov| equals(v, ov)))
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            index: self.index.clone(),
            buckets: self.buckets.clone(),
            len: self.len,
            reentrancy: ReentrancyCheck::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: HashEq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: HashEq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

/// Borrowing iterator over `(key, value)` pairs.
pub struct Iter<'a, K, V> {
    buckets: slotmap::basic::Values<'a, BucketKey, Bucket<K, V>>,
    entries: core::slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.entries = self.buckets.next()?.entries.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator with mutable access to values. Keys stay immutable.
pub struct IterMut<'a, K, V> {
    buckets: slotmap::basic::ValuesMut<'a, BucketKey, Bucket<K, V>>,
    entries: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((&e.key, &mut e.value));
            }
            self.entries = self.buckets.next()?.entries.iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator, same order as [`HashMap::iter`].
pub struct IntoIter<K, V> {
    buckets: slotmap::basic::IntoIter<BucketKey, Bucket<K, V>>,
    entries: std::vec::IntoIter<Entry<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.next() {
                self.remaining -= 1;
                return Some((e.key, e.value));
            }
            let (_, bucket) = self.buckets.next()?;
            self.entries = bucket.entries.into_iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            entries: Vec::new().into_iter(),
            remaining: self.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hashed;

    fn collide(value: &'static str, code: i64) -> Hashed<&'static str> {
        Hashed::with_hash_fn(value, move |_| code)
    }

    /// Invariant: `put` of a new key returns `None` and bumps `len`; `put` of an
    /// existing key returns the old value and leaves `len` alone.
    #[test]
    fn put_returns_previous_value() {
        let mut m: HashMap<String, i32> = HashMap::new();
        assert_eq!(m.put("a".to_string(), 1), None);
        assert_eq!(m.len(), 1);
        assert_eq!(m.put("a".to_string(), 2), Some(1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&"a".to_string()), Some(&2));
    }

    /// Invariant: an emptied bucket contributes nothing to the aggregate hash.
    #[test]
    fn hash_code_ignores_empty_buckets() {
        let mut m: HashMap<i64, &str> = HashMap::new();
        m.put(1, "a");
        assert_eq!(m.hash_code(), 1);

        m.put(2, "b");
        assert_eq!(m.remove(&2), Some("b"));
        assert_eq!(m.bucket_count(), 2, "bucket for 2 is kept, just empty");
        assert_eq!(m.hash_code(), 1);
    }

    /// Invariant: the aggregate is `code * bucket_len`, so colliding keys
    /// multiply their shared code.
    #[test]
    fn hash_code_weights_by_bucket_len() {
        let mut m = HashMap::new();
        m.put(collide("a", 5), 0);
        m.put(collide("b", 5), 0);
        m.put(collide("c", 7), 0);
        assert_eq!(m.hash_code(), 5 * 2 + 7);
    }

    /// Invariant: iteration groups entries by bucket in first-seen order of
    /// the hash code, not in numeric order.
    #[test]
    fn iteration_order_is_bucket_insertion_order() {
        let mut m = HashMap::new();
        m.put(collide("a", 9), 1);
        m.put(collide("b", 1), 2);
        m.put(collide("c", 9), 3);
        m.put(collide("d", 4), 4);

        let order: Vec<&str> = m.keys().map(|k| *k.value()).collect();
        assert_eq!(order, ["a", "c", "b", "d"]);

        let mut visited = Vec::new();
        m.for_each(|k, v| visited.push((*k.value(), *v)));
        assert_eq!(visited, [("a", 1), ("c", 3), ("b", 2), ("d", 4)]);
    }

    /// Invariant: `clear` forgets bucket order as well as entries.
    #[test]
    fn clear_resets_everything() {
        let mut m: HashMap<i32, i32> = HashMap::new();
        for i in 0..10 {
            m.put(i, i * i);
        }
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.bucket_count(), 0);
        assert_eq!(m.get(&3), None);

        m.put(7, 0);
        m.put(2, 0);
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), [7, 2]);
    }

    /// Invariant: many keys in one bucket are still told apart by `equals`.
    #[test]
    fn constant_hash_degrades_to_linear_scan() {
        let mut m = HashMap::new();
        for (i, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
            m.put(collide(name, 0), i);
        }
        assert_eq!(m.bucket_count(), 1);
        assert_eq!(m.get(&collide("c", 0)), Some(&2));
        assert_eq!(m.remove(&collide("b", 0)), Some(1));
        assert_eq!(m.get(&collide("d", 0)), Some(&3));
        assert_eq!(m.len(), 3);
        assert_eq!(m.entries_in_buckets(), 3);
    }

    /// Invariant: the stored key's predicate is the one consulted.
    #[test]
    fn stored_key_predicate_is_consulted() {
        let mut m = HashMap::new();
        m.put(Hashed::new("stored", |_| 1, |_, _| true), "v");
        let probe = Hashed::new("probe", |_| 1, |_, _| false);
        assert_eq!(m.get(&probe), Some(&"v"));
    }

    /// Invariant: `put_if_absent` never overwrites and reports the live value.
    #[test]
    fn put_if_absent_keeps_existing() {
        let mut m: HashMap<&str, i32> = HashMap::new();
        assert_eq!(m.put_if_absent("k", 1), None);
        assert_eq!(m.put_if_absent("k", 2), Some(&1));
        assert_eq!(m.get(&"k"), Some(&1));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: values reached through `get_mut`/`iter_mut` are written in
    /// place without touching `len`.
    #[test]
    fn mutable_access_updates_in_place() {
        let mut m: HashMap<i32, i32> = (0..4).map(|i| (i, i)).collect();
        *m.get_mut(&2).unwrap() += 100;
        for (_, v) in m.iter_mut() {
            *v += 1;
        }
        assert_eq!(m.get(&2), Some(&103));
        assert_eq!(m.get(&0), Some(&1));
        assert_eq!(m.len(), 4);
    }

    /// Invariant: a clone owns its own buckets.
    #[test]
    fn clone_does_not_alias_buckets() {
        let mut original: HashMap<i32, &str> = HashMap::new();
        original.put(1, "one");
        let mut copy = original.clone();
        copy.put(1, "uno");
        copy.put(2, "dos");
        copy.remove(&1);
        assert_eq!(original.get(&1), Some(&"one"));
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 1);
    }

    /// Invariant: the owning iterator yields the same sequence as `iter`.
    #[test]
    fn into_iter_matches_iter() {
        let mut m = HashMap::new();
        m.put(collide("x", 3), 'x');
        m.put(collide("y", 2), 'y');
        m.put(collide("z", 3), 'z');
        let borrowed: Vec<char> = m.values().copied().collect();
        let iter = m.into_iter();
        assert_eq!(iter.len(), 3);
        let owned: Vec<char> = iter.map(|(_, v)| v).collect();
        assert_eq!(borrowed, owned);
        assert_eq!(owned, ['x', 'z', 'y']);
    }

    /// Invariant: the index hasher is the one supplied at construction and
    /// survives a clone.
    #[test]
    fn hasher_is_the_configured_one() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::BuildHasherDefault;

        type Fixed = BuildHasherDefault<DefaultHasher>;
        let mut m: HashMap<i32, i32, Fixed> = HashMap::with_hasher(Fixed::default());
        m.put(1, 1);
        let expected = Fixed::default().hash_one(42i64);
        assert_eq!(m.hasher().hash_one(42i64), expected);
        assert_eq!(m.clone().hasher().hash_one(42i64), expected);
    }

    /// Invariant: a predicate may read the map it is being probed from;
    /// shared lookups nest without tripping the reentrancy check.
    #[test]
    fn nested_read_from_equals_is_allowed() {
        use std::cell::{Cell, RefCell};
        use std::rc::{Rc, Weak};

        type Map = HashMap<Hashed<i32>, i32>;
        let slot: Rc<RefCell<Weak<RefCell<Map>>>> = Rc::new(RefCell::new(Weak::new()));
        let reads = Rc::new(Cell::new(0));
        let (cb_slot, cb_reads) = (Rc::clone(&slot), Rc::clone(&reads));
        let key = Hashed::factory(
            |_: &i32| 3,
            move |a: &i32, b: &i32| {
                if let Some(map) = cb_slot.borrow().upgrade() {
                    // 99 has no bucket, so this lookup runs no predicate.
                    let found = map.borrow().contains_key(&Hashed::with_hash_fn(*b, |_| 99));
                    assert!(!found);
                    cb_reads.set(cb_reads.get() + 1);
                }
                a == b
            },
        );

        let map = Rc::new(RefCell::new(Map::new()));
        map.borrow_mut().put(key(1), 10);
        *slot.borrow_mut() = Rc::downgrade(&map);

        let got = map.borrow().get(&key(1)).copied();
        assert_eq!(got, Some(10));
        assert!(map.borrow().contains_key(&key(1)));
        assert!(reads.get() >= 2, "the predicate ran its nested reads");
    }

    /// Invariant (debug-only): an `equals` callback that reads the map while
    /// `put` is updating it panics instead of observing a half-finished
    /// operation.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_panics_from_equals_during_put() {
        use std::cell::Cell;
        use std::rc::Rc;

        type Map = HashMap<Hashed<&'static str>, i32>;
        let target: Rc<Cell<*const Map>> = Rc::new(Cell::new(core::ptr::null()));
        let cb_target = Rc::clone(&target);
        let key = Hashed::factory(
            |_: &&'static str| 7,
            move |a: &&'static str, b: &&'static str| {
                let m = cb_target.get();
                if !m.is_null() {
                    // Reaching back into the map from inside its own mutation.
                    let m = unsafe { &*m };
                    let _ = m.contains_key(&Hashed::with_hash_fn(*b, |_| 8));
                }
                a == b
            },
        );

        let mut m: Map = HashMap::new();
        m.put(key("a"), 1);
        target.set(&m as *const Map);

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.put(key("b"), 2);
        }));
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");

        target.set(core::ptr::null());
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&key("a")), Some(&1), "map is usable after the panic");
        assert_eq!(m.get(&key("b")), None);
    }
}
