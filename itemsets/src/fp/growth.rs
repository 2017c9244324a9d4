use super::builder::build_conditional_fp_tree;
use super::combinations::generate_combinations_from_path;
use super::tree::FPTree;
use crate::error::Result;
use crate::result::ResultCollector;
use log::debug;
use rayon::prelude::*;

/// Frequent-itemset growth: one parallel task per top-level item, sequential
/// descent through conditional trees below it.
pub fn fp_growth(fp_tree: &FPTree, min_count: usize, sink: &ResultCollector) -> Result<()> {
    fp_tree.items().par_iter().try_for_each(|&item| {
        debug!("fp-growth: expanding item {}", item);
        grow_item(fp_tree, item, &[], min_count, sink)
    })
}

fn fp_growth_recursive(fp_tree: &FPTree, alpha: &[usize], min_count: usize, sink: &ResultCollector) -> Result<()> {
    if fp_tree.has_single_path() {
        let path: Vec<(usize, usize)> = fp_tree
            .get_single_path()
            .into_iter()
            .take_while(|&(_, count)| count >= min_count)
            .collect();
        return generate_combinations_from_path(&path, alpha, |pattern, support| sink.insert(pattern, support));
    }

    for item in fp_tree.items() {
        grow_item(fp_tree, item, alpha, min_count, sink)?;
    }
    Ok(())
}

fn grow_item(fp_tree: &FPTree, item: usize, alpha: &[usize], min_count: usize, sink: &ResultCollector) -> Result<()> {
    let support = fp_tree.item_support(item);
    if support < min_count {
        return Ok(());
    }

    let mut new_pattern = alpha.to_vec();
    new_pattern.push(item);
    sink.insert(new_pattern.clone(), support)?;

    let conditional_tree = build_conditional_fp_tree(fp_tree, item, min_count);
    if conditional_tree.is_empty() {
        return Ok(());
    }
    fp_growth_recursive(&conditional_tree, &new_pattern, min_count, sink)
}
