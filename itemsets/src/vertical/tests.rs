use super::*;
use crate::config::Mode;
use crate::result::{filter_subsumed, Itemset, ResultCollector};
use crate::store::IncidenceMatrix;
use ndarray::array;
use std::collections::HashMap;
use test_log::test;

fn sample_store() -> IncidenceMatrix {
    // t0 {0,1}, t1 {0,1,2}, t2 {0,2}, t3 {1,2,3}, t4 {0}
    IncidenceMatrix::new(array![
        [true, true, false, false],
        [true, true, true, false],
        [true, false, true, false],
        [false, true, true, true],
        [true, false, false, false],
    ])
}

fn itemsets(entries: Vec<(Itemset, usize)>) -> HashMap<Itemset, usize> {
    entries.into_iter().collect()
}

fn closed_at_one() -> HashMap<Itemset, usize> {
    itemsets(vec![
        (vec![0], 4),
        (vec![1], 3),
        (vec![2], 3),
        (vec![0, 1], 2),
        (vec![0, 2], 2),
        (vec![1, 2], 2),
        (vec![0, 1, 2], 1),
        (vec![1, 2, 3], 1),
    ])
}

fn frequent_at_one() -> HashMap<Itemset, usize> {
    let mut frequent = closed_at_one();
    frequent.extend(itemsets(vec![(vec![3], 1), (vec![1, 3], 1), (vec![2, 3], 1)]));
    frequent
}

fn run_eclat(store: &IncidenceMatrix, mode: Mode, min_count: usize, closure_extension: bool) -> HashMap<Itemset, usize> {
    let index = VerticalIndex::build(store, min_count);
    let sink = ResultCollector::new();
    eclat(&index, mode, min_count, closure_extension, &sink).unwrap();
    filter_subsumed(sink.into_inner().unwrap(), mode)
}

fn run_transposed(store: &IncidenceMatrix, min_count: usize) -> HashMap<Itemset, usize> {
    let index = TransposedIndex::build(store, min_count);
    let sink = ResultCollector::new();
    index.mine_closed(min_count, &sink).unwrap();
    sink.into_inner().unwrap()
}

#[test]
fn test_vertical_index_support() {
    let store = sample_store();
    let index = VerticalIndex::build(&store, 2);

    assert_eq!(index.items(), &[0, 1, 2]);
    assert_eq!(index.tidset(0).unwrap().iter().collect::<Vec<_>>(), vec![0, 1, 2, 4]);
    assert!(index.tidset(3).is_none());

    assert_eq!(index.support(&[0, 1]), 2);
    assert_eq!(index.support(&[0, 1, 2]), 1);
    assert_eq!(index.support(&[1, 3]), 0);
    assert_eq!(index.support(&[]), 5);
}

#[test]
fn test_eclat_frequent() {
    let store = sample_store();
    assert_eq!(run_eclat(&store, Mode::Frequent, 1, true), frequent_at_one());

    let at_two = run_eclat(&store, Mode::Frequent, 2, false);
    assert_eq!(at_two.len(), 6);
    assert!(at_two.values().all(|&support| support >= 2));
}

#[test]
fn test_eclat_closed_with_and_without_folding() {
    let store = sample_store();
    assert_eq!(run_eclat(&store, Mode::Closed, 1, true), closed_at_one());
    assert_eq!(run_eclat(&store, Mode::Closed, 1, false), closed_at_one());
}

#[test]
fn test_eclat_maximal_with_and_without_folding() {
    let store = sample_store();
    let expected = itemsets(vec![(vec![0, 1, 2], 1), (vec![1, 2, 3], 1)]);
    assert_eq!(run_eclat(&store, Mode::Maximal, 1, true), expected);
    assert_eq!(run_eclat(&store, Mode::Maximal, 1, false), expected);

    let pairs = itemsets(vec![(vec![0, 1], 2), (vec![0, 2], 2), (vec![1, 2], 2)]);
    assert_eq!(run_eclat(&store, Mode::Maximal, 2, true), pairs);
}

fn raw_eclat(store: &IncidenceMatrix, mode: Mode, min_count: usize, closure_extension: bool) -> HashMap<Itemset, usize> {
    let index = VerticalIndex::build(store, min_count);
    let sink = ResultCollector::new();
    eclat(&index, mode, min_count, closure_extension, &sink).unwrap();
    sink.into_inner().unwrap()
}

#[test]
fn test_eclat_closed_visits_only_closed_sets() {
    // item 1 only ever occurs with item 0, so {1} is not closed
    let store = IncidenceMatrix::new(array![
        [true, true],
        [true, true],
        [true, false],
    ]);
    assert_eq!(
        raw_eclat(&store, Mode::Closed, 1, true),
        itemsets(vec![(vec![0], 3), (vec![0, 1], 2)])
    );

    assert_eq!(raw_eclat(&sample_store(), Mode::Closed, 1, true), closed_at_one());
}

#[test]
fn test_eclat_closed_emits_closure_of_empty_set() {
    // items 0 and 2 occur everywhere
    let store = IncidenceMatrix::new(array![
        [true, true, true],
        [true, false, true],
        [true, true, true],
    ]);
    assert_eq!(
        raw_eclat(&store, Mode::Closed, 2, true),
        itemsets(vec![(vec![0, 2], 3), (vec![0, 1, 2], 2)])
    );
}

#[test]
fn test_eclat_closed_candidates_without_folding_rely_on_filter() {
    let store = IncidenceMatrix::new(array![
        [true, true],
        [true, true],
        [true, false],
    ]);
    let raw = raw_eclat(&store, Mode::Closed, 1, false);

    assert_eq!(raw.get(&vec![0]), Some(&3));
    assert_eq!(raw.get(&vec![0, 1]), Some(&2));
    // reported from its own top-level task, dropped by the filter
    assert_eq!(raw.get(&vec![1]), Some(&2));
    assert_eq!(filter_subsumed(raw, Mode::Closed).len(), 2);
}

#[test]
fn test_transposed_emits_only_closed_sets() {
    let store = sample_store();
    assert_eq!(run_transposed(&store, 1), closed_at_one());

    let at_two = run_transposed(&store, 2);
    let expected = itemsets(vec![
        (vec![0], 4),
        (vec![1], 3),
        (vec![2], 3),
        (vec![0, 1], 2),
        (vec![0, 2], 2),
        (vec![1, 2], 2),
    ]);
    assert_eq!(at_two, expected);
}

#[test]
fn test_transposed_reports_full_itemset_cover() {
    // every transaction carries items 0 and 1
    let store = IncidenceMatrix::new(array![
        [true, true, false],
        [true, true, true],
        [true, true, false],
    ]);
    let index = TransposedIndex::build(&store, 2);
    assert_eq!(index.num_transactions(), 3);

    let sink = ResultCollector::new();
    index.mine_closed(2, &sink).unwrap();
    assert_eq!(sink.into_inner().unwrap(), itemsets(vec![(vec![0, 1], 3)]));
}

#[test]
fn test_transposed_near_total_threshold() {
    // every cell set except one per row: at min_count 5 only sets missing
    // from at most one row survive
    let store = IncidenceMatrix::new(ndarray::Array2::from_shape_fn((6, 9), |(tx, item)| item % 6 != tx));
    for min_count in [4, 5, 6] {
        assert_eq!(
            run_transposed(&store, min_count),
            run_eclat(&store, Mode::Closed, min_count, true),
            "min_count {}",
            min_count
        );
    }

    let at_five = run_transposed(&store, 5);
    assert_eq!(at_five.get(&vec![0, 6]), Some(&5));
    assert!(at_five.values().all(|&support| support >= 5));
}

#[test]
fn test_transposed_without_frequent_items() {
    let store = sample_store();
    assert!(run_transposed(&store, 6).is_empty());
}

#[test]
fn test_expand_closed_recovers_frequent_sets() {
    assert_eq!(expand_closed(closed_at_one()), frequent_at_one());
    assert!(expand_closed(HashMap::new()).is_empty());
}
