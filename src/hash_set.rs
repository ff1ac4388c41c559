//! HashSet: a [`HashMap`] whose values are a private `Present` marker.

use crate::hash_eq::HashEq;
use crate::hash_map::{self, HashMap};
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// Value stored for every element of a set.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Present;

/// Set of elements unique under [`HashEq`]. All storage, ordering and
/// counting come from the backing map.
pub struct HashSet<T, S = RandomState> {
    map: HashMap<T, Present, S>,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }
}

impl<T, S: Default> Default for HashSet<T, S> {
    fn default() -> Self {
        Self {
            map: HashMap::default(),
        }
    }
}

impl<T, S> HashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Elements in the backing map's key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            keys: self.map.keys(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: HashEq,
    S: BuildHasher,
{
    /// Returns `true` if `value` was not already present. An equal element
    /// already in the set is kept as is.
    pub fn add(&mut self, value: T) -> bool {
        self.map.put(value, Present).is_none()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value) == Some(Present)
    }
}

/// `hash_code` is the wrapping sum of element hash codes. `equals` holds
/// when both sets have the same size and `other` contains every element of
/// `self`.
impl<T, S> HashEq for HashSet<T, S>
where
    T: HashEq,
    S: BuildHasher,
{
    fn hash_code(&self) -> i64 {
        self.iter()
            .fold(0i64, |h, x| h.wrapping_add(x.hash_code()))
    }

    fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|x| other.contains(x))
    }
}

impl<T: Clone, S: Clone> Clone for HashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: HashEq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: HashEq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

pub struct Iter<'a, T> {
    keys: hash_map::Keys<'a, T, Present>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

pub struct IntoIter<T> {
    inner: hash_map::IntoIter<T, Present>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hashed;

    #[test]
    fn add_reports_new_elements() {
        let mut s: HashSet<&str> = HashSet::new();
        assert!(s.add("a"));
        assert!(!s.add("a"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn add_keeps_the_first_equal_element() {
        let mut s = HashSet::new();
        let case_insensitive = Hashed::factory(
            |v: &&str| crate::string_hash_code(&v.to_lowercase()),
            |a: &&str, b: &&str| a.eq_ignore_ascii_case(b),
        );
        assert!(s.add(case_insensitive("Rust")));
        assert!(!s.add(case_insensitive("RUST")));
        let stored: Vec<&str> = s.iter().map(|h| *h.value()).collect();
        assert_eq!(stored, ["Rust"]);
    }

    #[test]
    fn remove_only_reports_present_elements() {
        let mut s: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert!(s.remove(&2));
        assert!(!s.remove(&2));
        assert!(!s.contains(&2));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn hash_code_sums_elements() {
        let s: HashSet<i64> = [3, 4, 10].into_iter().collect();
        assert_eq!(s.hash_code(), 17);
        assert_eq!(HashSet::<i64>::new().hash_code(), 0);
    }

    /// Regression guard: a full successful containment scan means equal.
    #[test]
    fn equal_sets_compare_equal() {
        let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let b: HashSet<i32> = [3, 2, 1].into_iter().collect();
        assert!(a.equals(&b));
        assert!(b.equals(&a));

        let c: HashSet<i32> = [1, 2, 4].into_iter().collect();
        assert!(!a.equals(&c));
        let d: HashSet<i32> = [1, 2].into_iter().collect();
        assert!(!a.equals(&d));
    }
}
