use crate::error::MiningError;
use std::fmt;
use std::str::FromStr;

/// Which itemsets a mining call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every itemset meeting the threshold.
    Frequent,
    /// Frequent itemsets with no equal-support proper superset.
    Closed,
    /// Frequent itemsets with no frequent proper superset.
    Maximal,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Frequent => write!(f, "frequent"),
            Mode::Closed => write!(f, "closed"),
            Mode::Maximal => write!(f, "maximal"),
        }
    }
}

impl FromStr for Mode {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frequent" | "all" => Ok(Mode::Frequent),
            "closed" => Ok(Mode::Closed),
            "maximal" | "max" => Ok(Mode::Maximal),
            _ => Err(MiningError::UnknownName {
                kind: "mode",
                name: s.to_string(),
            }),
        }
    }
}

/// Search strategy used to enumerate the itemset lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// `Transposed` for closed/maximal mining on wide data, `FpTree` otherwise.
    #[default]
    Auto,
    /// Prefix-tree growth over conditional trees.
    FpTree,
    /// Depth-first intersection of per-item transaction bitsets.
    Vertical,
    /// Enumeration of transaction sets, for data with far more items than transactions.
    Transposed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Auto => write!(f, "auto"),
            Strategy::FpTree => write!(f, "fp"),
            Strategy::Vertical => write!(f, "vertical"),
            Strategy::Transposed => write!(f, "transposed"),
        }
    }
}

impl FromStr for Strategy {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "fp" | "fp-tree" | "fptree" | "tree" => Ok(Strategy::FpTree),
            "vertical" | "eclat" | "bitset" => Ok(Strategy::Vertical),
            "transposed" | "rows" => Ok(Strategy::Transposed),
            _ => Err(MiningError::UnknownName {
                kind: "strategy",
                name: s.to_string(),
            }),
        }
    }
}

/// Tuning knobs for a mining call.
#[derive(Debug, Clone)]
pub struct MiningConfig {
    pub strategy: Strategy,
    /// Worker threads; `None` defers to rayon's default.
    pub num_threads: Option<usize>,
    /// Fold equal-support items into the current itemset during vertical search.
    pub closure_extension: bool,
    /// `Auto` switches to the transposed search once items outnumber
    /// transactions by this factor.
    pub transpose_ratio: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            num_threads: None,
            closure_extension: true,
            transpose_ratio: 4,
        }
    }
}

impl MiningConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads.max(1));
        self
    }

    pub fn with_closure_extension(mut self, enabled: bool) -> Self {
        self.closure_extension = enabled;
        self
    }

    pub fn with_transpose_ratio(mut self, ratio: usize) -> Self {
        self.transpose_ratio = ratio.max(1);
        self
    }

    /// Resolves `Auto` against the shape of the data and the requested mode.
    pub fn resolve_strategy(&self, mode: Mode, num_transactions: usize, num_items: usize) -> Strategy {
        match self.strategy {
            Strategy::Auto => {
                let wide = num_transactions > 0
                    && num_items >= self.transpose_ratio.saturating_mul(num_transactions);
                if wide && mode != Mode::Frequent {
                    Strategy::Transposed
                } else {
                    Strategy::FpTree
                }
            }
            explicit => explicit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("fp".parse::<Strategy>().unwrap(), Strategy::FpTree);
        assert_eq!("Vertical".parse::<Strategy>().unwrap(), Strategy::Vertical);
        assert_eq!("transposed".parse::<Strategy>().unwrap(), Strategy::Transposed);
        assert!(matches!(
            "apriori".parse::<Strategy>(),
            Err(MiningError::UnknownName { kind: "strategy", .. })
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("closed".parse::<Mode>().unwrap(), Mode::Closed);
        assert_eq!("MAX".parse::<Mode>().unwrap(), Mode::Maximal);
        assert_eq!(Mode::Frequent.to_string().parse::<Mode>().unwrap(), Mode::Frequent);
        match "rare".parse::<Mode>() {
            Err(err @ MiningError::UnknownName { kind: "mode", .. }) => {
                assert_eq!(err.to_string(), "Unknown mode 'rare'");
            }
            other => panic!("expected UnknownName, got {:?}", other),
        }
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in [Strategy::Auto, Strategy::FpTree, Strategy::Vertical, Strategy::Transposed] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_auto_resolution() {
        let config = MiningConfig::default();
        assert_eq!(config.resolve_strategy(Mode::Closed, 10, 20), Strategy::FpTree);
        assert_eq!(config.resolve_strategy(Mode::Closed, 10, 40), Strategy::Transposed);
        assert_eq!(config.resolve_strategy(Mode::Maximal, 10, 400), Strategy::Transposed);
        assert_eq!(config.resolve_strategy(Mode::Frequent, 10, 400), Strategy::FpTree);

        let explicit = MiningConfig::new(Strategy::Vertical);
        assert_eq!(explicit.resolve_strategy(Mode::Closed, 10, 400), Strategy::Vertical);
    }

    #[test]
    fn test_builder() {
        let config = MiningConfig::default()
            .with_threads(0)
            .with_closure_extension(false)
            .with_transpose_ratio(8);
        assert_eq!(config.num_threads, Some(1));
        assert!(!config.closure_extension);
        assert_eq!(config.transpose_ratio, 8);
    }
}
