//! Errors for positional operations on `ArrayList`.

use thiserror::Error;

/// Returned by `ArrayList::set` and `ArrayList::add_at_index` when the index
/// lies outside the range the operation accepts. The list is left unchanged.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
#[error("index {index} out of bounds for length {len}")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}
