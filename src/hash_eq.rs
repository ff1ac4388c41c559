//! The equality capability every key, value and element carries.
//!
//! Containers never use `Eq`/`Hash`. They ask a value for its
//! `hash_code` and compare values with [`equals`], which is identity OR the
//! value's own predicate. Two variants implement the trait:
//!
//! - plain values (numbers, strings, bools, ...) where the value itself is
//!   the hash code and equality is `==`;
//! - custom-equality values, i.e. [`crate::Hashed`], which carry their own
//!   hash function and predicate.
//!
//! Hash codes are `i64` and every aggregate is computed with wrapping
//! arithmetic.

use std::rc::Rc;

/// A value that exposes a hash code and an equality predicate.
///
/// Implementations must keep `a.equals(b) => a.hash_code() == b.hash_code()`
/// or lookups in [`crate::HashMap`] will miss. The predicate is not required
/// to be symmetric; containers always call it on the stored value first.
pub trait HashEq {
    fn hash_code(&self) -> i64;
    fn equals(&self, other: &Self) -> bool;

    /// What this value adds to an enclosing list hash
    /// ([`iterable_hash_code`]). Values with a hash of their own contribute
    /// it; text contributes its numeric reading, or 0 when it has none.
    #[inline]
    fn list_hash_code(&self) -> i64 {
        self.hash_code()
    }
}

/// The equality convention: `a` is the same object as `b`, or `a`'s
/// predicate accepts `b`.
#[inline]
pub fn equals<T: HashEq + ?Sized>(a: &T, b: &T) -> bool {
    core::ptr::eq(a, b) || a.equals(b)
}

/// Java-style string hash: `h = 31 * h + code_point`, starting from 0.
pub fn string_hash_code(s: &str) -> i64 {
    s.chars()
        .fold(0i64, |h, c| h.wrapping_mul(31).wrapping_add(c as i64))
}

/// Java-style list hash: `h = 31 * h + e.list_hash_code()`, starting from 1.
pub fn iterable_hash_code<'a, T, I>(items: I) -> i64
where
    T: HashEq + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .fold(1i64, |h, e| h.wrapping_mul(31).wrapping_add(e.list_hash_code()))
}

/// Numeric reading of a string: surrounding whitespace is ignored, blank
/// text reads as 0, and anything that is not a finite number reads as 0.
fn numeric_text_code(s: &str) -> i64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => float_hash_code(x),
        _ => 0,
    }
}

/// Same length and pairwise [`equals`] in order.
pub fn iterable_equals<'a, T, A, B>(a: A, b: B) -> bool
where
    T: HashEq + ?Sized + 'a,
    A: IntoIterator<Item = &'a T>,
    B: IntoIterator<Item = &'a T>,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if equals(x, y) => {}
            _ => return false,
        }
    }
}

macro_rules! impl_hash_eq_int {
    ($($t:ty),*) => {
        $(
            impl HashEq for $t {
                #[inline]
                fn hash_code(&self) -> i64 {
                    *self as i64
                }
                #[inline]
                fn equals(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_hash_eq_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn float_hash_code(x: f64) -> i64 {
    // Integral values collide with the matching integer; the rest hash by bits.
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        x as i64
    } else {
        x.to_bits() as i64
    }
}

impl HashEq for f64 {
    fn hash_code(&self) -> i64 {
        float_hash_code(*self)
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

impl HashEq for f32 {
    fn hash_code(&self) -> i64 {
        float_hash_code(f64::from(*self))
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

impl HashEq for bool {
    fn hash_code(&self) -> i64 {
        i64::from(*self)
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

impl HashEq for char {
    fn hash_code(&self) -> i64 {
        i64::from(u32::from(*self))
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
    fn list_hash_code(&self) -> i64 {
        self.to_digit(10).map_or(0, i64::from)
    }
}

impl HashEq for () {
    fn hash_code(&self) -> i64 {
        0
    }
    fn equals(&self, _other: &Self) -> bool {
        true
    }
}

impl HashEq for str {
    fn hash_code(&self) -> i64 {
        string_hash_code(self)
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
    fn list_hash_code(&self) -> i64 {
        numeric_text_code(self)
    }
}

impl HashEq for String {
    fn hash_code(&self) -> i64 {
        string_hash_code(self)
    }
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
    fn list_hash_code(&self) -> i64 {
        numeric_text_code(self)
    }
}

impl<T: HashEq + ?Sized> HashEq for &T {
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }
    fn list_hash_code(&self) -> i64 {
        (**self).list_hash_code()
    }
    fn equals(&self, other: &Self) -> bool {
        equals(*self, *other)
    }
}

impl<T: HashEq + ?Sized> HashEq for Box<T> {
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }
    fn list_hash_code(&self) -> i64 {
        (**self).list_hash_code()
    }
    fn equals(&self, other: &Self) -> bool {
        equals(&**self, &**other)
    }
}

/// Two handles to the same allocation are the same object.
impl<T: HashEq + ?Sized> HashEq for Rc<T> {
    fn hash_code(&self) -> i64 {
        (**self).hash_code()
    }
    fn list_hash_code(&self) -> i64 {
        (**self).list_hash_code()
    }
    fn equals(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other) || (**self).equals(other)
    }
}

impl<T: HashEq> HashEq for Option<T> {
    fn hash_code(&self) -> i64 {
        self.as_ref().map_or(0, HashEq::hash_code)
    }
    fn list_hash_code(&self) -> i64 {
        self.as_ref().map_or(0, HashEq::list_hash_code)
    }
    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => equals(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: HashEq> HashEq for [T] {
    fn hash_code(&self) -> i64 {
        iterable_hash_code(self)
    }
    fn equals(&self, other: &Self) -> bool {
        iterable_equals(self, other)
    }
}

impl<T: HashEq> HashEq for Vec<T> {
    fn hash_code(&self) -> i64 {
        iterable_hash_code(self)
    }
    fn equals(&self, other: &Self) -> bool {
        iterable_equals(self, other)
    }
}

impl<A: HashEq, B: HashEq> HashEq for (A, B) {
    fn hash_code(&self) -> i64 {
        31i64
            .wrapping_add(self.0.hash_code())
            .wrapping_mul(31)
            .wrapping_add(self.1.hash_code())
    }
    fn equals(&self, other: &Self) -> bool {
        equals(&self.0, &other.0) && equals(&self.1, &other.1)
    }
}
