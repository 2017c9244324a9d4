use super::builder::{project, rank_items, rank_map};
use super::tree::FPTree;
use crate::error::{MiningError, Result};
use crate::support::MinSupport;
use log::debug;
use ndarray::{ArrayView2, Axis};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Counting,
    Building,
    Finished,
}

impl BuildPhase {
    fn name(self) -> &'static str {
        match self {
            BuildPhase::Counting => "Counting",
            BuildPhase::Building => "Building",
            BuildPhase::Finished => "Finished",
        }
    }
}

/// Two-pass FP-tree construction over chunks of a boolean incidence matrix.
///
/// The first pass counts item supports, the second inserts the projected
/// transactions. Both passes must see the same chunks.
#[derive(Debug)]
pub struct FPTreeBuilder {
    item_counts: Vec<usize>,
    num_items: Option<usize>,
    num_transactions: usize,
    built_transactions: usize,
    item_ranks: HashMap<usize, usize>,
    frequent_items: Vec<usize>,
    min_count: usize,
    fp_tree: Option<FPTree>,
    phase: BuildPhase,
}

impl Default for FPTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FPTreeBuilder {
    pub fn new() -> Self {
        Self {
            item_counts: Vec::new(),
            num_items: None,
            num_transactions: 0,
            built_transactions: 0,
            item_ranks: HashMap::new(),
            frequent_items: Vec::new(),
            min_count: 0,
            fp_tree: None,
            phase: BuildPhase::Counting,
        }
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    fn expect_phase(&self, expected: BuildPhase, operation: &'static str) -> Result<()> {
        if self.phase != expected {
            return Err(MiningError::InvalidPhase {
                operation,
                phase: self.phase.name(),
            });
        }
        Ok(())
    }

    fn check_width(&mut self, chunk: &ArrayView2<bool>) -> Result<()> {
        let width = chunk.ncols();
        match self.num_items {
            Some(expected) if expected != width => Err(MiningError::ShapeMismatch {
                expected,
                found: width,
            }),
            Some(_) => Ok(()),
            None => {
                self.num_items = Some(width);
                self.item_counts = vec![0; width];
                Ok(())
            }
        }
    }

    /// Accumulates per-item support from one chunk.
    pub fn count_pass(&mut self, chunk: ArrayView2<bool>) -> Result<()> {
        self.expect_phase(BuildPhase::Counting, "count")?;
        self.check_width(&chunk)?;

        self.num_transactions += chunk.nrows();
        for row in chunk.axis_iter(Axis(0)) {
            for (item, &present) in row.iter().enumerate() {
                if present {
                    self.item_counts[item] += 1;
                }
            }
        }
        Ok(())
    }

    /// Fixes the absolute threshold and the frequent item order.
    ///
    /// Returns the frequent items, highest support first.
    pub fn finalize_counts(&mut self, min_support: impl Into<MinSupport>) -> Result<Vec<usize>> {
        self.expect_phase(BuildPhase::Counting, "finalize counts")?;

        self.min_count = min_support.into().to_count(self.num_transactions)?;
        self.frequent_items = rank_items(self.item_counts.iter().copied().enumerate(), self.min_count);
        self.item_ranks = rank_map(&self.frequent_items);
        self.fp_tree = Some(FPTree::new(self.min_count, self.num_transactions));
        self.phase = BuildPhase::Building;

        debug!(
            "streaming builder: {} transactions counted, {} frequent items at min_count {}",
            self.num_transactions,
            self.frequent_items.len(),
            self.min_count
        );
        Ok(self.frequent_items.clone())
    }

    /// Inserts the transactions of one chunk into the tree.
    pub fn build_pass(&mut self, chunk: ArrayView2<bool>) -> Result<()> {
        self.expect_phase(BuildPhase::Building, "build")?;
        self.check_width(&chunk)?;

        let fp_tree = self.fp_tree.as_mut().ok_or(MiningError::InvalidPhase {
            operation: "build",
            phase: BuildPhase::Counting.name(),
        })?;

        for row in chunk.axis_iter(Axis(0)) {
            let present = row
                .iter()
                .enumerate()
                .filter_map(|(item, &present)| present.then_some(item));
            let sorted_items = project(present, &self.item_ranks);
            if !sorted_items.is_empty() {
                fp_tree.insert_transaction(&sorted_items, 1);
            }
        }
        self.built_transactions += chunk.nrows();
        Ok(())
    }

    /// Completes the build. The second pass must have covered exactly the
    /// transactions counted in the first.
    pub fn finish(&mut self) -> Result<FPTree> {
        self.expect_phase(BuildPhase::Building, "finish")?;
        if self.built_transactions != self.num_transactions {
            return Err(MiningError::ShapeMismatch {
                expected: self.num_transactions,
                found: self.built_transactions,
            });
        }

        let fp_tree = self.fp_tree.take().ok_or(MiningError::InvalidPhase {
            operation: "finish",
            phase: BuildPhase::Counting.name(),
        })?;
        self.phase = BuildPhase::Finished;
        debug!("streaming builder: finished with {} nodes", fp_tree.num_nodes());
        Ok(fp_tree)
    }
}
