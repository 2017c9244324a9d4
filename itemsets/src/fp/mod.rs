//! Tree strategy: FP-tree construction and growth-based search.

pub mod builder;
pub mod combinations;
pub mod fpclose;
pub mod fpmax;
pub mod growth;
pub mod streaming;
pub mod tree;

pub use builder::{build_closed_conditional_tree, build_conditional_fp_tree, build_fp_tree};
pub use fpmax::Extension;
pub use streaming::{BuildPhase, FPTreeBuilder};
pub use tree::{FPNode, FPTree};

use crate::config::Mode;
use crate::error::Result;
use crate::result::ResultCollector;

/// Runs the search for `mode` over a built tree, feeding candidates to `sink`.
pub fn mine_tree(fp_tree: &FPTree, mode: Mode, min_count: usize, sink: &ResultCollector) -> Result<()> {
    match mode {
        Mode::Frequent => growth::fp_growth(fp_tree, min_count, sink),
        Mode::Closed => fpclose::fp_close(fp_tree, min_count, sink),
        Mode::Maximal => fpmax::fp_max(fp_tree, min_count, sink),
    }
}
