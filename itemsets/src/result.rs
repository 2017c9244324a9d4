//! Collection and final filtering of mined itemsets.
//!
//! Workers push `(itemset, support)` pairs into a [`ResultCollector`] while the
//! search runs. Once every worker has finished, [`filter_subsumed`] runs a
//! single pass that drops candidates failing closedness or maximality against
//! the rest of the set, and the survivors are handed out as [`MinedItemsets`].

use crate::config::Mode;
use crate::error::{MiningError, Result};
use crate::storage::FrequentLevel;
use crate::store::TransactionStore;
use log::debug;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Mutex;

/// Ascending, duplicate-free list of item indices.
pub type Itemset = Vec<usize>;

/// Thread-safe sink shared by all mining workers.
///
/// The lock is held for a single map insert only.
#[derive(Debug, Default)]
pub struct ResultCollector {
    entries: Mutex<HashMap<Itemset, usize>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an itemset; a repeated key overwrites the previous support.
    pub fn insert(&self, mut itemset: Itemset, support: usize) -> Result<()> {
        itemset.sort_unstable();
        itemset.dedup();
        let mut entries = self.entries.lock().map_err(|_| MiningError::LockPoisoned)?;
        entries.insert(itemset, support);
        Ok(())
    }

    pub fn into_inner(self) -> Result<HashMap<Itemset, usize>> {
        self.entries.into_inner().map_err(|_| MiningError::LockPoisoned)
    }
}

/// Whether sorted `small` is a subset of sorted `large`.
pub fn is_subset(small: &[usize], large: &[usize]) -> bool {
    if small.len() > large.len() {
        return false;
    }
    let mut rest = large.iter();
    small.iter().all(|item| rest.by_ref().any(|other| other == item))
}

/// Removes every candidate subsumed by another candidate.
///
/// Closed mode drops itemsets with an equal-support proper superset; maximal
/// mode drops itemsets with any proper superset. Frequent mode keeps everything.
///
/// Closed candidates are only compared within their support bucket.
pub fn filter_subsumed(candidates: HashMap<Itemset, usize>, mode: Mode) -> HashMap<Itemset, usize> {
    if mode == Mode::Frequent {
        return candidates;
    }

    let entries: Vec<(Itemset, usize)> = candidates
        .into_iter()
        .filter(|(itemset, _)| !itemset.is_empty())
        .collect();

    let mut buckets: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, (_, support)) in entries.iter().enumerate() {
        let key = if mode == Mode::Closed { *support } else { 0 };
        buckets.entry(key).or_default().push(idx);
    }

    let mut keep = vec![false; entries.len()];
    let kept: Vec<usize> = buckets
        .into_values()
        .flat_map(|bucket| unsubsumed(&entries, bucket))
        .collect();
    for idx in kept {
        keep[idx] = true;
    }

    let before = entries.len();
    let survivors: HashMap<Itemset, usize> = entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, kept)| kept.then_some(entry))
        .collect();

    debug!(
        "subsumption filter ({}): {} candidates -> {} survivors",
        mode,
        before,
        survivors.len()
    );
    survivors
}

/// Members of `bucket` without a proper superset in the bucket.
///
/// Longest itemsets go first, so every possible superset of a candidate has
/// already been decided when the candidate is checked. Only survivors are
/// indexed: a superset that was itself subsumed has a surviving superset too.
fn unsubsumed(entries: &[(Itemset, usize)], mut bucket: Vec<usize>) -> Vec<usize> {
    bucket.sort_unstable_by_key(|&idx| Reverse(entries[idx].0.len()));

    let mut postings: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut kept = Vec::new();
    for idx in bucket {
        let itemset = &entries[idx].0;
        let subsumed = itemset
            .iter()
            .map(|item| postings.get(item))
            .collect::<Option<Vec<&Vec<usize>>>>()
            .and_then(|lists| lists.into_iter().min_by_key(|list| list.len()))
            .is_some_and(|list| list.iter().any(|&other| is_subset(itemset, &entries[other].0)));

        if !subsumed {
            for &item in itemset {
                postings.entry(item).or_default().push(idx);
            }
            kept.push(idx);
        }
    }
    kept
}

/// One mined itemset resolved against the store's item names.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsetRecord {
    pub items: Vec<String>,
    pub support: usize,
    pub relative_support: f64,
    pub length: usize,
}

/// Final mapping from itemset to absolute support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinedItemsets {
    itemsets: HashMap<Itemset, usize>,
    num_transactions: usize,
}

impl MinedItemsets {
    pub fn new(itemsets: HashMap<Itemset, usize>, num_transactions: usize) -> Self {
        Self {
            itemsets,
            num_transactions,
        }
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    /// Support of an itemset given in any order, if it was reported.
    pub fn support(&self, itemset: &[usize]) -> Option<usize> {
        let mut key = itemset.to_vec();
        key.sort_unstable();
        self.itemsets.get(&key).copied()
    }

    pub fn contains(&self, itemset: &[usize]) -> bool {
        self.support(itemset).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, usize)> {
        self.itemsets.iter().map(|(itemset, &support)| (itemset, support))
    }

    pub fn as_map(&self) -> &HashMap<Itemset, usize> {
        &self.itemsets
    }

    pub fn into_map(self) -> HashMap<Itemset, usize> {
        self.itemsets
    }

    /// Entries ordered by length, then lexicographically.
    pub fn sorted(&self) -> Vec<(Itemset, usize)> {
        let mut entries: Vec<(Itemset, usize)> = self
            .itemsets
            .iter()
            .map(|(itemset, &support)| (itemset.clone(), support))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Groups the itemsets by length; level `k - 1` holds the `k`-itemsets.
    pub fn into_levels(self) -> Vec<FrequentLevel> {
        let mut levels: Vec<FrequentLevel> = Vec::new();
        for (itemset, support) in self.sorted() {
            let size = itemset.len();
            while levels.len() < size {
                levels.push(FrequentLevel::new(levels.len() + 1));
            }
            levels[size - 1].add_itemset(&itemset, support);
        }
        levels
    }

    /// Resolves item names and annotates relative support and length.
    pub fn records<S: TransactionStore + ?Sized>(&self, store: &S) -> Vec<ItemsetRecord> {
        let total = self.num_transactions.max(1) as f64;
        self.sorted()
            .into_iter()
            .map(|(itemset, support)| ItemsetRecord {
                items: itemset
                    .iter()
                    .map(|&item| store.item_name(item).to_owned())
                    .collect(),
                support,
                relative_support: support as f64 / total,
                length: itemset.len(),
            })
            .collect()
    }
}
