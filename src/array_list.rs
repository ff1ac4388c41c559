//! ArrayList: an ordered, index-addressable sequence searched with [`equals`].
//!
//! Index policy: positional writes are checked. `set` needs `index < len`,
//! the insertion methods need `index <= len`; otherwise they return
//! [`IndexOutOfBounds`] and leave the list untouched. `remove_at_index` on a
//! bad index is a silent no-op.

use crate::error::IndexOutOfBounds;
use crate::hash_eq::{equals, iterable_equals, iterable_hash_code, HashEq};
use core::fmt;

/// Growable list whose search and removal use the `HashEq` convention.
/// Duplicates are allowed.
#[derive(Clone)]
pub struct ArrayList<T> {
    elements: Vec<T>,
}

impl<T> ArrayList<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, value: T) {
        self.elements.push(value);
    }

    /// Appends in iteration order.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.elements.extend(values);
    }

    /// Inserts `value` at `index`, shifting later elements right.
    pub fn add_at_index(&mut self, index: usize, value: T) -> Result<(), IndexOutOfBounds> {
        self.check_insert_index(index)?;
        self.elements.insert(index, value);
        Ok(())
    }

    /// Inserts `values` starting at `index`, keeping their order.
    pub fn add_all_at_index<I: IntoIterator<Item = T>>(
        &mut self,
        index: usize,
        values: I,
    ) -> Result<(), IndexOutOfBounds> {
        self.check_insert_index(index)?;
        self.elements.splice(index..index, values);
        Ok(())
    }

    fn check_insert_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index > self.elements.len() {
            return Err(IndexOutOfBounds {
                index,
                len: self.elements.len(),
            });
        }
        Ok(())
    }

    pub fn remove_at_index(&mut self, index: usize) -> Option<T> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    /// Removes every element the predicate accepts. `predicate` sees each
    /// element once, with its index from before any removal.
    pub fn remove_if<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&T, usize) -> bool,
    {
        let mut index = 0;
        self.elements.retain(|e| {
            let remove = predicate(e, index);
            index += 1;
            !remove
        });
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.elements.get_mut(index)
    }

    /// Replaces the element at `index` and returns the old one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexOutOfBounds> {
        let len = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, value)),
            None => Err(IndexOutOfBounds { index, len }),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Walks the current contents; every call starts from the live list.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HashEq> ArrayList<T> {
    /// First index whose element equals `value`; the element is the
    /// receiver of the comparison.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.elements.iter().position(|e| equals(e, value))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes the first element equal to `value`.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.index_of(value) {
            Some(i) => {
                self.elements.remove(i);
                true
            }
            None => false,
        }
    }
}

/// `hash_code` is `h = 31 * h + e.list_hash_code()` from `h = 1`, so text
/// elements count by their numeric reading; `equals` is same length and
/// element-wise equal in order.
impl<T: HashEq> HashEq for ArrayList<T> {
    fn hash_code(&self) -> i64 {
        iterable_hash_code(&self.elements)
    }

    fn equals(&self, other: &Self) -> bool {
        iterable_equals(&self.elements, &other.elements)
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<T> From<Vec<T>> for ArrayList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T> From<ArrayList<T>> for Vec<T> {
    fn from(list: ArrayList<T>) -> Self {
        list.elements
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for ArrayList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ArrayList<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for ArrayList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
