//! hashed-collections: HashMap, HashSet and ArrayList whose notion of
//! "same element" is a pluggable `hash_code`/`equals` contract rather than
//! `Eq`/`Hash`.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: collections with reference-language semantics. Two values are the
//!   same key when they are the same object, or when the stored value's
//!   predicate says so. The hash code groups candidates; it is never trusted
//!   on its own.
//! - Layers:
//!   - `HashEq`: the capability trait. Plain values (numbers, strings, ...)
//!     implement it with `==` and their own value as hash; `Hashed<T>`
//!     implements it with user-supplied functions.
//!   - `HashMap<K, V, S>`: buckets keyed by the raw hash code, linear scan
//!     inside a bucket. Bucket slots live in a `SlotMap`, located through a
//!     `hashbrown::HashTable`; a debug-only reentrancy check guards the
//!     probing that calls into user code.
//!   - `HashSet<T, S>`: `HashMap<T, Present>`.
//!   - `ArrayList<T>`: a `Vec` searched with the same convention.
//!
//! Constraints
//! - Single-threaded. `Hashed` keeps its predicate in an `Rc`, so containers
//!   holding one are `!Send`/`!Sync`; the maps themselves carry a `!Send`
//!   marker. Callers that share a container across threads must wrap it
//!   themselves.
//! - No resizing policy beyond what the bucket index and `Vec` do on their
//!   own; a poor hash function degrades to linear search, never to wrong
//!   answers.
//! - Absent results are `None`. Only checked positional writes on
//!   `ArrayList` return an error ([`IndexOutOfBounds`]).
//!
//! Ordering
//! - Map and set iteration visits buckets in the order their hash code was
//!   first inserted and entries within a bucket in insertion order. Removing
//!   the last entry of a bucket keeps the (empty) bucket in place; `clear`
//!   drops all buckets.
//! - `ArrayList` iterates its live contents in index order.
//!
//! Hash codes
//! - `i64` everywhere; all aggregates use wrapping arithmetic.
//! - Map: `sum(bucket_code * bucket_len)` over non-empty buckets.
//! - Set: sum of element codes.
//! - List: `h = 1; h = 31 * h + e.list_hash_code()`. That is the element's
//!   own code, except text, which counts by its numeric reading (0 if none).
//!
//! Notes and non-goals
//! - Map `equals` checks that every entry of `self` is in `other`; with
//!   asymmetric predicates it is not symmetric, and it is not `PartialEq`.
//! - Hashing or comparing a container that contains itself is not
//!   supported.

mod array_list;
mod error;
pub mod hash_eq;
pub mod hash_map;
mod hash_map_proptest;
pub mod hash_set;
mod hashed;
mod reentrancy;

// Public surface
pub use array_list::ArrayList;
pub use error::IndexOutOfBounds;
pub use hash_eq::{equals, iterable_equals, iterable_hash_code, string_hash_code, HashEq};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hashed::Hashed;
