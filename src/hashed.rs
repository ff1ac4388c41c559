//! `Hashed<T>`: attach a hash function and an equality predicate to any value.
//!
//! The hash is computed once, when the wrapper is built. The predicate is
//! shared between wrappers made by the same [`Hashed::factory`].

use crate::hash_eq::HashEq;
use core::fmt;
use std::rc::Rc;

type EqualsFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// A value carrying its own `hash_code`/`equals` contract.
///
/// Comparing two wrappers runs the predicate of the left-hand one on the two
/// wrapped values.
pub struct Hashed<T> {
    value: T,
    hash: i64,
    equals_fn: EqualsFn<T>,
}

impl<T> Hashed<T> {
    pub fn new<H, E>(value: T, hash_fn: H, equals_fn: E) -> Self
    where
        H: FnOnce(&T) -> i64,
        E: Fn(&T, &T) -> bool + 'static,
    {
        Self::from_parts(value, hash_fn, Rc::new(equals_fn))
    }

    fn from_parts<H>(value: T, hash_fn: H, equals_fn: EqualsFn<T>) -> Self
    where
        H: FnOnce(&T) -> i64,
    {
        let hash = hash_fn(&value);
        Self {
            value,
            hash,
            equals_fn,
        }
    }

    /// Build a wrapping closure: every value it wraps shares `hash_fn` and
    /// `equals_fn`.
    pub fn factory<H, E>(hash_fn: H, equals_fn: E) -> impl Fn(T) -> Hashed<T>
    where
        H: Fn(&T) -> i64,
        E: Fn(&T, &T) -> bool + 'static,
    {
        let equals_fn: EqualsFn<T> = Rc::new(equals_fn);
        move |value| Hashed::from_parts(value, &hash_fn, Rc::clone(&equals_fn))
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: PartialEq + 'static> Hashed<T> {
    /// Custom hash, plain `==` equality.
    pub fn with_hash_fn<H>(value: T, hash_fn: H) -> Self
    where
        H: FnOnce(&T) -> i64,
    {
        Self::new(value, hash_fn, |a: &T, b: &T| a == b)
    }
}

impl<T> HashEq for Hashed<T> {
    #[inline]
    fn hash_code(&self) -> i64 {
        self.hash
    }

    fn equals(&self, other: &Self) -> bool {
        (self.equals_fn)(&self.value, &other.value)
    }
}

impl<T: Clone> Clone for Hashed<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            hash: self.hash,
            equals_fn: Rc::clone(&self.equals_fn),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Hashed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hashed")
            .field("value", &self.value)
            .field("hash", &self.hash)
            .finish()
    }
}
