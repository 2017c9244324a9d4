use crate::config::{MiningConfig, Mode, Strategy};
use crate::error::{MiningError, Result};
use crate::fp::{self, FPTree};
use crate::result::{filter_subsumed, Itemset, MinedItemsets, ResultCollector};
use crate::store::TransactionStore;
use crate::support::MinSupport;
use crate::vertical::{self, TransposedIndex, VerticalIndex};
use log::info;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Entry point for a mining call: resolves the threshold, runs the chosen
/// search on a dedicated worker pool, then filters the candidates once.
#[derive(Debug, Clone, Default)]
pub struct Miner {
    config: MiningConfig,
}

impl Miner {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn frequent<S>(&self, store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
    where
        S: TransactionStore + ?Sized,
    {
        self.mine(store, Mode::Frequent, min_support)
    }

    pub fn closed<S>(&self, store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
    where
        S: TransactionStore + ?Sized,
    {
        self.mine(store, Mode::Closed, min_support)
    }

    pub fn maximal<S>(&self, store: &S, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
    where
        S: TransactionStore + ?Sized,
    {
        self.mine(store, Mode::Maximal, min_support)
    }

    pub fn mine<S>(&self, store: &S, mode: Mode, min_support: impl Into<MinSupport>) -> Result<MinedItemsets>
    where
        S: TransactionStore + ?Sized,
    {
        let num_transactions = store.num_transactions();
        let min_count = min_support.into().to_count(num_transactions)?;
        let strategy = self
            .config
            .resolve_strategy(mode, num_transactions, store.num_items());

        info!(
            "mining {} itemsets: strategy={}, min_count={}, transactions={}, items={}",
            mode,
            strategy,
            min_count,
            num_transactions,
            store.num_items()
        );

        let closure_extension = self.config.closure_extension;
        let candidates = self.run(|sink| match strategy {
            Strategy::Auto | Strategy::FpTree => {
                let fp_tree = fp::build_fp_tree(store, min_count);
                fp::mine_tree(&fp_tree, mode, min_count, sink)
            }
            Strategy::Vertical => {
                let index = VerticalIndex::build(store, min_count);
                vertical::eclat(&index, mode, min_count, closure_extension, sink)
            }
            Strategy::Transposed => {
                let index = TransposedIndex::build(store, min_count);
                index.mine_closed(min_count, sink)
            }
        })?;

        let candidates = if strategy == Strategy::Transposed && mode == Mode::Frequent {
            vertical::expand_closed(candidates)
        } else {
            candidates
        };
        Ok(finish(candidates, mode, num_transactions))
    }

    /// Mines a pre-built tree instead of a store. The tree must have been
    /// built with a threshold no higher than the requested one.
    pub fn mine_tree(&self, fp_tree: &FPTree, mode: Mode, min_support: impl Into<MinSupport>) -> Result<MinedItemsets> {
        let num_transactions = fp_tree.num_transactions();
        let min_count = min_support.into().to_count(num_transactions)?;
        if fp_tree.min_count() > min_count {
            return Err(MiningError::TreeThresholdTooHigh {
                tree: fp_tree.min_count(),
                requested: min_count,
            });
        }

        info!(
            "mining {} itemsets from pre-built tree: min_count={}, transactions={}, nodes={}",
            mode,
            min_count,
            num_transactions,
            fp_tree.num_nodes()
        );

        let candidates = self.run(|sink| fp::mine_tree(fp_tree, mode, min_count, sink))?;
        Ok(finish(candidates, mode, num_transactions))
    }

    fn run<F>(&self, job: F) -> Result<HashMap<Itemset, usize>>
    where
        F: FnOnce(&ResultCollector) -> Result<()> + Send,
    {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.config.num_threads {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder.build()?;

        let sink = ResultCollector::new();
        panic::catch_unwind(AssertUnwindSafe(|| pool.install(|| job(&sink))))
            .map_err(|payload| MiningError::WorkerPanicked(panic_message(payload.as_ref())))??;
        sink.into_inner()
    }
}

fn finish(candidates: HashMap<Itemset, usize>, mode: Mode, num_transactions: usize) -> MinedItemsets {
    let candidate_count = candidates.len();
    let survivors = filter_subsumed(candidates, mode);
    info!(
        "mined {} {} itemsets from {} candidates",
        survivors.len(),
        mode,
        candidate_count
    );
    MinedItemsets::new(survivors, num_transactions)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
