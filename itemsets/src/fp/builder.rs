use super::tree::FPTree;
use crate::store::TransactionStore;
use log::debug;
use std::collections::HashMap;

/// Orders `(item, support)` pairs meeting `min_count` by descending support,
/// ties by ascending item index.
pub fn rank_items(counts: impl IntoIterator<Item = (usize, usize)>, min_count: usize) -> Vec<usize> {
    let mut frequent_items: Vec<(usize, usize)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .collect();

    frequent_items.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    frequent_items.into_iter().map(|(item, _)| item).collect()
}

/// Item -> position in a ranked item list.
pub(crate) fn rank_map(ordered_items: &[usize]) -> HashMap<usize, usize> {
    ordered_items
        .iter()
        .enumerate()
        .map(|(rank, &item)| (item, rank))
        .collect()
}

/// Projects a transaction onto the ranked items, in rank order.
pub(crate) fn project(items: impl IntoIterator<Item = usize>, ranks: &HashMap<usize, usize>) -> Vec<usize> {
    let mut projected: Vec<(usize, usize)> = items
        .into_iter()
        .filter_map(|item| ranks.get(&item).map(|&rank| (item, rank)))
        .collect();
    projected.sort_unstable_by_key(|&(_, rank)| rank);
    projected.into_iter().map(|(item, _)| item).collect()
}

/// Builds the initial tree over every transaction of the store, keeping only
/// items with support of at least `min_count`.
pub fn build_fp_tree<S: TransactionStore + ?Sized>(store: &S, min_count: usize) -> FPTree {
    let num_transactions = store.num_transactions();
    let ordered_items = rank_items(
        (0..store.num_items()).map(|item| (item, store.item_support(item))),
        min_count,
    );
    let ranks = rank_map(&ordered_items);

    let mut fp_tree = FPTree::new(min_count, num_transactions);
    for tx_idx in 0..num_transactions {
        let tx_items = project(store.transaction_items(tx_idx), &ranks);
        if !tx_items.is_empty() {
            fp_tree.insert_transaction(&tx_items, 1);
        }
    }

    debug!(
        "built fp-tree: {} transactions, {} frequent items, {} nodes",
        num_transactions,
        ordered_items.len(),
        fp_tree.num_nodes()
    );
    fp_tree
}

/// Aggregated support of every item on the prefix paths of `item`.
fn prefix_counts(prefix_paths: &[(Vec<usize>, usize)]) -> HashMap<usize, usize> {
    let mut item_counts: HashMap<usize, usize> = HashMap::new();
    for (path, count) in prefix_paths {
        for &item in path {
            *item_counts.entry(item).or_insert(0) += count;
        }
    }
    item_counts
}

fn rebuild(prefix_paths: &[(Vec<usize>, usize)], ordered_items: &[usize], min_count: usize, num_transactions: usize) -> FPTree {
    let ranks = rank_map(ordered_items);
    let mut conditional_tree = FPTree::new(min_count, num_transactions);

    for (path, count) in prefix_paths {
        let filtered_path = project(path.iter().copied(), &ranks);
        if !filtered_path.is_empty() {
            conditional_tree.insert_transaction(&filtered_path, *count);
        }
    }
    conditional_tree
}

/// Conditional tree of `item`: the transactions containing it, restricted to
/// the items above it that stay frequent within that projection.
pub fn build_conditional_fp_tree(tree: &FPTree, item: usize, min_count: usize) -> FPTree {
    let prefix_paths = tree.get_prefix_paths(item);
    let ordered_items = rank_items(prefix_counts(&prefix_paths), min_count);
    rebuild(&prefix_paths, &ordered_items, min_count, tree.item_support(item))
}

/// Like [`build_conditional_fp_tree`], but items present in every projected
/// transaction are removed from the tree and returned separately: they belong
/// to the closure of the current itemset.
pub fn build_closed_conditional_tree(tree: &FPTree, item: usize, min_count: usize) -> (FPTree, Vec<usize>) {
    let prefix_paths = tree.get_prefix_paths(item);
    let support = tree.item_support(item);
    let counts = prefix_counts(&prefix_paths);

    let mut folded: Vec<usize> = counts
        .iter()
        .filter(|&(_, &count)| count == support)
        .map(|(&item, _)| item)
        .collect();
    folded.sort_unstable();

    let ordered_items = rank_items(
        counts.into_iter().filter(|&(_, count)| count != support),
        min_count,
    );
    let conditional = rebuild(&prefix_paths, &ordered_items, min_count, support);
    (conditional, folded)
}
