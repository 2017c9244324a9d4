use itemsets::{IncidenceMatrix, Miner, MiningConfig, Mode, Strategy as SearchStrategy};
use ndarray::Array2;
use proptest::prelude::*;
use std::collections::HashMap;

type Mapping = HashMap<Vec<usize>, usize>;

/// Exhaustive reference results over the power set of the items.
struct Oracle {
    frequent: Mapping,
    closed: Mapping,
    maximal: Mapping,
}

impl Oracle {
    fn new(rows: &[Vec<bool>], num_items: usize, min_count: usize) -> Self {
        let mut frequent = Mapping::new();
        for mask in 1u32..(1 << num_items) {
            let itemset: Vec<usize> = (0..num_items).filter(|&item| mask & (1 << item) != 0).collect();
            let support = rows
                .iter()
                .filter(|row| itemset.iter().all(|&item| row[item]))
                .count();
            if support >= min_count {
                frequent.insert(itemset, support);
            }
        }

        let supersets = |itemset: &Vec<usize>| {
            frequent
                .iter()
                .filter(move |(other, _)| other.len() > itemset.len() && is_subset(itemset, other))
                .map(|(_, &support)| support)
                .collect::<Vec<usize>>()
        };

        let closed = frequent
            .iter()
            .filter(|(itemset, &support)| !supersets(itemset).contains(&support))
            .map(|(itemset, &support)| (itemset.clone(), support))
            .collect();
        let maximal = frequent
            .iter()
            .filter(|(itemset, _)| supersets(itemset).is_empty())
            .map(|(itemset, &support)| (itemset.clone(), support))
            .collect();

        Self {
            frequent,
            closed,
            maximal,
        }
    }

    fn expected(&self, mode: Mode) -> &Mapping {
        match mode {
            Mode::Frequent => &self.frequent,
            Mode::Closed => &self.closed,
            Mode::Maximal => &self.maximal,
        }
    }
}

fn is_subset(small: &[usize], large: &[usize]) -> bool {
    small.iter().all(|item| large.contains(item))
}

fn to_store(rows: &[Vec<bool>], num_items: usize) -> IncidenceMatrix {
    let cells: Vec<bool> = rows.iter().flatten().copied().collect();
    IncidenceMatrix::new(Array2::from_shape_vec((rows.len(), num_items), cells).unwrap())
}

fn mine(store: &IncidenceMatrix, config: MiningConfig, mode: Mode, min_count: usize) -> Mapping {
    Miner::new(config).mine(store, mode, min_count).unwrap().into_map()
}

fn incidence() -> impl Strategy<Value = (Vec<Vec<bool>>, usize, usize)> {
    (1usize..7).prop_flat_map(|num_items| {
        (
            prop::collection::vec(prop::collection::vec(any::<bool>(), num_items), 1..12),
            Just(num_items),
            1usize..4,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_strategy_matches_oracle((rows, num_items, min_count) in incidence()) {
        let store = to_store(&rows, num_items);
        let oracle = Oracle::new(&rows, num_items, min_count);

        for strategy in [SearchStrategy::FpTree, SearchStrategy::Vertical, SearchStrategy::Transposed] {
            for closure_extension in [true, false] {
                let config = MiningConfig::new(strategy).with_closure_extension(closure_extension);
                for mode in [Mode::Frequent, Mode::Closed, Mode::Maximal] {
                    let mined = mine(&store, config.clone(), mode, min_count);
                    prop_assert_eq!(
                        &mined,
                        oracle.expected(mode),
                        "{} {} closure_extension={}",
                        strategy,
                        mode,
                        closure_extension
                    );
                }
            }
        }
    }

    #[test]
    fn frequent_results_are_anti_monotone((rows, num_items, min_count) in incidence()) {
        let store = to_store(&rows, num_items);
        let frequent = mine(&store, MiningConfig::default(), Mode::Frequent, min_count);

        for (itemset, &support) in &frequent {
            prop_assert!(support >= min_count);
            for skip in 0..itemset.len() {
                let subset: Vec<usize> = itemset
                    .iter()
                    .enumerate()
                    .filter(|&(idx, _)| idx != skip)
                    .map(|(_, &item)| item)
                    .collect();
                if subset.is_empty() {
                    continue;
                }
                let subset_support = frequent.get(&subset);
                prop_assert!(subset_support.is_some(), "{:?} missing below {:?}", subset, itemset);
                prop_assert!(subset_support.copied().unwrap_or(0) >= support);
            }
        }
    }

    #[test]
    fn closed_and_maximal_recover_frequent((rows, num_items, min_count) in incidence()) {
        let store = to_store(&rows, num_items);
        let config = MiningConfig::new(SearchStrategy::Vertical);
        let frequent = mine(&store, config.clone(), Mode::Frequent, min_count);
        let closed = mine(&store, config.clone(), Mode::Closed, min_count);
        let maximal = mine(&store, config, Mode::Maximal, min_count);

        for (itemset, &support) in &frequent {
            let recovered = closed
                .iter()
                .filter(|(other, _)| is_subset(itemset, other))
                .map(|(_, &other_support)| other_support)
                .max();
            prop_assert_eq!(recovered, Some(support), "closure of {:?}", itemset);
            prop_assert!(
                maximal.keys().any(|other| is_subset(itemset, other)),
                "{:?} not below any maximal itemset",
                itemset
            );
        }
        for itemset in maximal.keys() {
            prop_assert!(closed.contains_key(itemset));
        }
    }

    #[test]
    fn worker_count_does_not_change_results((rows, num_items, min_count) in incidence()) {
        let store = to_store(&rows, num_items);
        for strategy in [SearchStrategy::FpTree, SearchStrategy::Vertical, SearchStrategy::Transposed] {
            for mode in [Mode::Frequent, Mode::Closed, Mode::Maximal] {
                let single = mine(&store, MiningConfig::new(strategy).with_threads(1), mode, min_count);
                let many = mine(&store, MiningConfig::new(strategy).with_threads(3), mode, min_count);
                prop_assert_eq!(single, many, "{} {}", strategy, mode);
            }
        }
    }
}
