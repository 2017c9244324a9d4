use super::builder::build_conditional_fp_tree;
use super::tree::FPTree;
use crate::error::Result;
use crate::result::{is_subset, ResultCollector};
use log::debug;
use rayon::prelude::*;

/// Outcome of expanding one itemset, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// At least one frequent extension exists below this itemset.
    Extended,
    /// No frequent extension exists; the itemset is a maximal candidate.
    Terminal,
}

/// Maximal candidates accepted so far by one worker, used to skip subtrees
/// that cannot produce anything new.
#[derive(Debug, Default)]
struct LocalMaximals {
    itemsets: Vec<Vec<usize>>,
}

impl LocalMaximals {
    fn covers(&self, itemset: &[usize]) -> bool {
        self.itemsets.iter().any(|known| is_subset(itemset, known))
    }

    fn accept(&mut self, mut itemset: Vec<usize>, support: usize, sink: &ResultCollector) -> Result<()> {
        itemset.sort_unstable();
        self.itemsets.push(itemset.clone());
        sink.insert(itemset, support)
    }
}

/// Maximal-itemset search. Items are processed from highest to lowest
/// support; an itemset becomes a candidate only when its conditional tree
/// offers no frequent extension.
pub fn fp_max(fp_tree: &FPTree, min_count: usize, sink: &ResultCollector) -> Result<()> {
    fp_tree.items().par_iter().try_for_each(|&item| {
        debug!("fp-max: expanding item {}", item);
        let mut local = LocalMaximals::default();
        max_item(fp_tree, item, &[], min_count, sink, &mut local)
    })
}

fn fp_max_recursive(
    fp_tree: &FPTree,
    head: &[usize],
    min_count: usize,
    sink: &ResultCollector,
    local: &mut LocalMaximals,
) -> Result<Extension> {
    if fp_tree.is_empty() {
        return Ok(Extension::Terminal);
    }

    if fp_tree.has_single_path() {
        let path = fp_tree.get_single_path();
        if let Some(&(_, support)) = path.last() {
            let mut candidate = head.to_vec();
            candidate.extend(path.iter().map(|&(item, _)| item));
            local.accept(candidate, support, sink)?;
        }
        return Ok(Extension::Extended);
    }

    for item in fp_tree.items() {
        max_item(fp_tree, item, head, min_count, sink, local)?;
    }
    Ok(Extension::Extended)
}

fn max_item(
    fp_tree: &FPTree,
    item: usize,
    head: &[usize],
    min_count: usize,
    sink: &ResultCollector,
    local: &mut LocalMaximals,
) -> Result<()> {
    let support = fp_tree.item_support(item);
    if support < min_count {
        return Ok(());
    }

    let mut candidate = head.to_vec();
    candidate.push(item);
    let conditional_tree = build_conditional_fp_tree(fp_tree, item, min_count);

    let mut head_with_tail = candidate.clone();
    head_with_tail.extend(conditional_tree.items());
    head_with_tail.sort_unstable();
    if local.covers(&head_with_tail) {
        return Ok(());
    }

    match fp_max_recursive(&conditional_tree, &candidate, min_count, sink, local)? {
        Extension::Terminal => local.accept(candidate, support, sink),
        Extension::Extended => Ok(()),
    }
}
