//! Vertical strategy: itemsets are grown by intersecting per-item
//! transaction bitsets, or, for wide data, by intersecting per-transaction
//! item bitsets.

pub mod bitset;
pub mod eclat;
pub mod transposed;

pub use bitset::TidSet;
pub use eclat::{eclat, VerticalIndex};
pub use transposed::{expand_closed, TransposedIndex};

#[cfg(test)]
mod tests;
