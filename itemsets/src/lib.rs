//! Frequent, closed and maximal itemset mining.
//!
//! Two search strategies share one result pipeline:
//!
//! - [`fp`]: the transactions are compressed into an FP-tree and mined
//!   recursively through conditional trees.
//! - [`vertical`]: every item carries the bitset of transactions containing
//!   it, and itemsets grow by intersecting those bitsets.
//!
//! Top-level items are mined in parallel on a rayon pool; all candidates go
//! through a [`result::ResultCollector`] and a single subsumption pass.
//!
//! ```
//! use itemsets::{mine_maximal, IncidenceMatrix};
//!
//! let store = IncidenceMatrix::from_transactions(&[
//!     vec!["a", "b"],
//!     vec!["a", "b", "c"],
//!     vec!["a", "c"],
//! ]);
//! let maximal = mine_maximal(&store, 2).unwrap();
//! assert_eq!(maximal.support(&[0, 1]), Some(2));
//! assert_eq!(maximal.support(&[0, 2]), Some(2));
//! assert_eq!(maximal.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod fp;
pub mod miner;
pub mod result;
pub mod storage;
pub mod store;
pub mod support;
pub mod vertical;

#[cfg(feature = "python")]
mod python;

pub use config::{MiningConfig, Mode, Strategy};
pub use error::{MiningError, Result};
pub use fp::{FPTree, FPTreeBuilder};
pub use miner::Miner;
pub use result::{Itemset, ItemsetRecord, MinedItemsets};
pub use storage::FrequentLevel;
pub use store::{IncidenceMatrix, TransactionStore};
pub use support::MinSupport;

/// All itemsets whose support reaches `min_support`.
pub fn mine_frequent<S>(store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
where
    S: TransactionStore + ?Sized,
{
    Miner::default().frequent(store, min_support)
}

/// Frequent itemsets without an equal-support proper superset.
pub fn mine_closed<S>(store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
where
    S: TransactionStore + ?Sized,
{
    Miner::default().closed(store, min_support)
}

/// Frequent itemsets without a frequent proper superset.
pub fn mine_maximal<S>(store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
where
    S: TransactionStore + ?Sized,
{
    Miner::default().maximal(store, min_support)
}

/// Mines a pre-built FP-tree in place of a store.
pub fn mine_tree(fp_tree: &FPTree, mode: Mode, min_support: impl Into<MinSupport>) -> Result<MinedItemsets> {
    Miner::default().mine_tree(fp_tree, mode, min_support)
}
