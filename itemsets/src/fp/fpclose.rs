use super::builder::build_closed_conditional_tree;
use super::combinations::closed_prefixes_of_path;
use super::tree::FPTree;
use crate::error::Result;
use crate::result::ResultCollector;
use log::debug;
use rayon::prelude::*;

/// Closed-itemset search over conditional trees.
///
/// Items that occur in every transaction of a projection share the current
/// itemset's support; they are folded into the itemset rather than branched on.
/// Candidates can still be subsumed by an equal-support superset found in
/// another branch, which the final subsumption pass removes.
pub fn fp_close(fp_tree: &FPTree, min_count: usize, sink: &ResultCollector) -> Result<()> {
    fp_tree.items().par_iter().try_for_each(|&item| {
        debug!("fp-close: expanding item {}", item);
        close_item(fp_tree, item, &[], min_count, sink)
    })
}

fn close_item(fp_tree: &FPTree, item: usize, alpha: &[usize], min_count: usize, sink: &ResultCollector) -> Result<()> {
    let support = fp_tree.item_support(item);
    if support < min_count {
        return Ok(());
    }

    let (conditional_tree, folded) = build_closed_conditional_tree(fp_tree, item, min_count);
    let mut closed = alpha.to_vec();
    closed.push(item);
    closed.extend(folded);
    sink.insert(closed.clone(), support)?;

    if conditional_tree.is_empty() {
        return Ok(());
    }

    if conditional_tree.has_single_path() {
        for (prefix, count) in closed_prefixes_of_path(&conditional_tree.get_single_path()) {
            if count < min_count {
                break;
            }
            let mut pattern = closed.clone();
            pattern.extend(prefix);
            sink.insert(pattern, count)?;
        }
        return Ok(());
    }

    for next in conditional_tree.items() {
        close_item(&conditional_tree, next, &closed, min_count, sink)?;
    }
    Ok(())
}
