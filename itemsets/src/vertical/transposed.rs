//! Transposed search for wide data (many more items than transactions).
//!
//! Instead of growing itemsets, the search grows sets of transactions. Every
//! closed itemset is the intersection of the transactions that contain it, so
//! enumerating closed transaction sets enumerates closed itemsets. Extensions
//! are prefix-preserving: a transaction set is expanded only by a larger
//! transaction index, and a closure that pulls in a smaller index not already
//! present is discarded because another branch owns it. Each closed set is
//! therefore produced exactly once.

use super::bitset::TidSet;
use crate::error::Result;
use crate::result::{Itemset, ResultCollector};
use crate::store::TransactionStore;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// Each transaction as a bitset over the frequent items.
#[derive(Debug, Clone)]
pub struct TransposedIndex {
    rows: Vec<TidSet>,
    frequent: TidSet,
}

impl TransposedIndex {
    pub fn build<S: TransactionStore + ?Sized>(store: &S, min_count: usize) -> Self {
        let num_items = store.num_items();
        let frequent = TidSet::from_indices(
            num_items,
            (0..num_items).filter(|&item| store.item_support(item) >= min_count),
        );

        let rows: Vec<TidSet> = (0..store.num_transactions())
            .into_par_iter()
            .map(|tx| {
                TidSet::from_indices(
                    num_items,
                    store
                        .transaction_items(tx)
                        .into_iter()
                        .filter(|&item| frequent.contains(item)),
                )
            })
            .collect();

        debug!(
            "built transposed index: {} transactions, {} frequent items",
            rows.len(),
            frequent.count()
        );
        Self { rows, frequent }
    }

    pub fn num_transactions(&self) -> usize {
        self.rows.len()
    }

    /// Transactions containing every item of `items`.
    fn cover(&self, items: &TidSet) -> TidSet {
        TidSet::from_indices(
            self.rows.len(),
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| items.is_subset_of(row))
                .map(|(tx, _)| tx),
        )
    }

    /// Feeds every closed itemset with support of at least `min_count` to `sink`.
    pub fn mine_closed(&self, min_count: usize, sink: &ResultCollector) -> Result<()> {
        if self.frequent.is_empty() {
            return Ok(());
        }

        let root_rows = self.cover(&self.frequent);
        let root_support = root_rows.count();
        if root_support >= min_count && root_support > 0 {
            sink.insert(self.frequent.iter().collect(), root_support)?;
        }

        let candidates = self.extension_rows(&root_rows, &self.frequent, 0);
        let viable = viable_prefix(root_support, candidates.len(), min_count);
        candidates[..viable].par_iter().try_for_each(|&tx| {
            debug!("transposed: expanding transaction {}", tx);
            self.extend_with(&root_rows, &self.frequent, tx, min_count, sink)
        })
    }

    /// Rows from `start` on that lie outside `rows` and share an item with
    /// `items`, ascending. Only these can join a descendant of `rows`.
    fn extension_rows(&self, rows: &TidSet, items: &TidSet, start: usize) -> Vec<usize> {
        (start..self.rows.len())
            .filter(|&tx| !rows.contains(tx) && self.rows[tx].intersection_count(items) > 0)
            .collect()
    }

    fn extend_with(&self, rows: &TidSet, items: &TidSet, tx: usize, min_count: usize, sink: &ResultCollector) -> Result<()> {
        let shared = items.intersect(&self.rows[tx]);
        if shared.is_empty() {
            return Ok(());
        }

        let closure = self.cover(&shared);
        if !closure.agrees_below(rows, tx) {
            return Ok(());
        }

        let support = closure.count();
        if support >= min_count {
            sink.insert(shared.iter().collect(), support)?;
        }

        let candidates = self.extension_rows(&closure, &shared, tx + 1);
        let viable = viable_prefix(support, candidates.len(), min_count);
        for &next in &candidates[..viable] {
            self.extend_with(&closure, &shared, next, min_count, sink)?;
        }
        Ok(())
    }
}

/// Number of leading candidate rows worth expanding. A descendant expanded
/// from candidate `k` keeps the current rows below it and can only add
/// candidates from `k` on, so its support is at most `support + len - k`.
fn viable_prefix(support: usize, num_candidates: usize, min_count: usize) -> usize {
    let needed = min_count.saturating_sub(support);
    (num_candidates + 1).saturating_sub(needed.max(1))
}

/// Recovers every frequent itemset from the closed ones: a subset's support
/// is the largest support among the closed itemsets containing it.
pub fn expand_closed(closed: HashMap<Itemset, usize>) -> HashMap<Itemset, usize> {
    let mut frequent: HashMap<Itemset, usize> = HashMap::new();
    for (itemset, support) in closed {
        for_each_subset(&itemset, 0, &mut Vec::new(), &mut |subset| {
            let entry = frequent.entry(subset.to_vec()).or_insert(0);
            *entry = (*entry).max(support);
        });
    }
    frequent
}

fn for_each_subset<F: FnMut(&[usize])>(items: &[usize], start: usize, current: &mut Vec<usize>, visit: &mut F) {
    for i in start..items.len() {
        current.push(items[i]);
        visit(current.as_slice());
        for_each_subset(items, i + 1, current, visit);
        current.pop();
    }
}
