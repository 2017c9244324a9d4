use crate::error::{MiningError, Result};
use ndarray::{Array2, ArrayView2, Axis};
use std::collections::{BTreeSet, HashMap};

/// Read-only view of a transaction database as a boolean incidence matrix
/// (transactions x items) with display names for both axes.
///
/// Items are column indices `0..num_items`.
pub trait TransactionStore: Sync {
    fn num_transactions(&self) -> usize;

    fn num_items(&self) -> usize;

    /// Number of transactions containing `item`.
    fn item_support(&self, item: usize) -> usize;

    /// Whether transaction `transaction` contains `item`.
    fn contains(&self, transaction: usize, item: usize) -> bool;

    /// Items of one transaction in ascending index order.
    fn transaction_items(&self, transaction: usize) -> Vec<usize> {
        (0..self.num_items())
            .filter(|&item| self.contains(transaction, item))
            .collect()
    }

    fn item_name(&self, item: usize) -> &str;

    fn transaction_name(&self, transaction: usize) -> &str;

    fn item_index(&self, name: &str) -> Option<usize> {
        (0..self.num_items()).find(|&item| self.item_name(item) == name)
    }
}

/// Dense row-major incidence matrix backed by `ndarray`; one row per
/// transaction, with per-item supports cached at construction.
#[derive(Debug, Clone)]
pub struct IncidenceMatrix {
    matrix: Array2<bool>,
    item_names: Vec<String>,
    transaction_names: Vec<String>,
    item_lookup: HashMap<String, usize>,
    item_supports: Vec<usize>,
}

impl IncidenceMatrix {
    /// Wraps a boolean matrix; items and transactions are named by index.
    pub fn new(matrix: Array2<bool>) -> Self {
        let item_names = (0..matrix.ncols()).map(|i| i.to_string()).collect();
        let transaction_names = (0..matrix.nrows()).map(|i| i.to_string()).collect();
        Self::assemble(matrix, item_names, transaction_names)
    }

    /// Builds a store from a 0/1 indicator matrix; any non-zero cell counts as present.
    pub fn from_indicator(transactions: ArrayView2<i32>) -> Self {
        Self::new(transactions.mapv(|cell| cell != 0))
    }

    /// Builds a store from transactions given as lists of item names.
    ///
    /// Item indices follow the lexicographic order of the names.
    pub fn from_transactions<S: AsRef<str>>(transactions: &[Vec<S>]) -> Self {
        let names: BTreeSet<&str> = transactions
            .iter()
            .flat_map(|tx| tx.iter().map(|name| name.as_ref()))
            .collect();
        let item_names: Vec<String> = names.into_iter().map(str::to_owned).collect();
        let index: HashMap<&str, usize> = item_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut matrix = Array2::from_elem((transactions.len(), item_names.len()), false);
        for (row, tx) in transactions.iter().enumerate() {
            for name in tx {
                matrix[[row, index[name.as_ref()]]] = true;
            }
        }

        let transaction_names = (0..transactions.len()).map(|i| i.to_string()).collect();
        Self::assemble(matrix, item_names, transaction_names)
    }

    pub fn with_item_names(self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.matrix.ncols() {
            return Err(MiningError::ShapeMismatch {
                expected: self.matrix.ncols(),
                found: names.len(),
            });
        }
        Ok(Self::assemble(self.matrix, names, self.transaction_names))
    }

    pub fn with_transaction_names(self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.matrix.nrows() {
            return Err(MiningError::ShapeMismatch {
                expected: self.matrix.nrows(),
                found: names.len(),
            });
        }
        Ok(Self::assemble(self.matrix, self.item_names, names))
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.matrix.view()
    }

    fn assemble(matrix: Array2<bool>, item_names: Vec<String>, transaction_names: Vec<String>) -> Self {
        let item_lookup = item_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        let item_supports = matrix
            .axis_iter(Axis(1))
            .map(|column| column.iter().filter(|&&present| present).count())
            .collect();

        Self {
            matrix,
            item_names,
            transaction_names,
            item_lookup,
            item_supports,
        }
    }
}

impl TransactionStore for IncidenceMatrix {
    fn num_transactions(&self) -> usize {
        self.matrix.nrows()
    }

    fn num_items(&self) -> usize {
        self.matrix.ncols()
    }

    fn item_support(&self, item: usize) -> usize {
        self.item_supports[item]
    }

    fn contains(&self, transaction: usize, item: usize) -> bool {
        self.matrix[[transaction, item]]
    }

    fn transaction_items(&self, transaction: usize) -> Vec<usize> {
        self.matrix
            .row(transaction)
            .iter()
            .enumerate()
            .filter_map(|(item, &present)| present.then_some(item))
            .collect()
    }

    fn item_name(&self, item: usize) -> &str {
        &self.item_names[item]
    }

    fn transaction_name(&self, transaction: usize) -> &str {
        &self.transaction_names[transaction]
    }

    fn item_index(&self, name: &str) -> Option<usize> {
        self.item_lookup.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_indicator() {
        let data = array![[1, 0, 2], [0, 0, 1], [1, 1, 0]];
        let store = IncidenceMatrix::from_indicator(data.view());

        assert_eq!(store.num_transactions(), 3);
        assert_eq!(store.num_items(), 3);
        assert_eq!(store.item_support(0), 2);
        assert_eq!(store.item_support(1), 1);
        assert_eq!(store.item_support(2), 2);
        assert_eq!(store.transaction_items(0), vec![0, 2]);
        assert!(!store.contains(1, 0));
        assert_eq!(store.item_name(2), "2");
    }

    #[test]
    fn test_rows_are_transactions() {
        let store = IncidenceMatrix::from_indicator(array![[1, 1, 0, 0], [0, 0, 1, 0]].view());
        let view = store.view();

        assert!(view.is_standard_layout());
        assert_eq!(view.shape(), &[2, 4]);
        assert_eq!(view.row(1).to_vec(), vec![false, false, true, false]);
        assert_eq!(store.transaction_items(1), vec![2]);
    }

    #[test]
    fn test_from_transactions_orders_names() {
        let store = IncidenceMatrix::from_transactions(&[
            vec!["milk", "bread"],
            vec!["bread", "eggs"],
            vec!["milk"],
        ]);

        assert_eq!(store.num_items(), 3);
        assert_eq!(store.item_name(0), "bread");
        assert_eq!(store.item_index("milk"), Some(2));
        assert_eq!(store.item_index("tea"), None);
        assert_eq!(store.item_support(0), 2);
        assert_eq!(store.transaction_items(1), vec![0, 1]);
    }

    #[test]
    fn test_names_must_match_shape() {
        let store = IncidenceMatrix::new(Array2::from_elem((2, 3), true));
        let err = store.clone().with_item_names(vec!["a".into()]).unwrap_err();
        assert!(matches!(err, MiningError::ShapeMismatch { expected: 3, found: 1 }));

        let renamed = store
            .with_transaction_names(vec!["t1".into(), "t2".into()])
            .unwrap();
        assert_eq!(renamed.transaction_name(1), "t2");
    }
}
