use super::bitset::TidSet;
use crate::config::Mode;
use crate::error::Result;
use crate::result::ResultCollector;
use crate::store::TransactionStore;
use log::debug;
use rayon::prelude::*;

/// Per-item transaction bitsets for the items meeting the threshold,
/// in ascending item order.
#[derive(Debug, Clone)]
pub struct VerticalIndex {
    items: Vec<usize>,
    tidsets: Vec<TidSet>,
    num_transactions: usize,
}

impl VerticalIndex {
    pub fn build<S: TransactionStore + ?Sized>(store: &S, min_count: usize) -> Self {
        let num_transactions = store.num_transactions();
        let items: Vec<usize> = (0..store.num_items())
            .filter(|&item| store.item_support(item) >= min_count)
            .collect();

        let tidsets: Vec<TidSet> = items
            .par_iter()
            .map(|&item| {
                TidSet::from_indices(
                    num_transactions,
                    (0..num_transactions).filter(|&tx| store.contains(tx, item)),
                )
            })
            .collect();

        debug!(
            "built vertical index: {} transactions, {} frequent items",
            num_transactions,
            items.len()
        );
        Self {
            items,
            tidsets,
            num_transactions,
        }
    }

    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn tidset(&self, item: usize) -> Option<&TidSet> {
        self.position(item).map(|pos| &self.tidsets[pos])
    }

    fn position(&self, item: usize) -> Option<usize> {
        self.items.binary_search(&item).ok()
    }

    /// Support of an itemset by intersecting its items' bitsets. Items below
    /// the index threshold count as absent.
    pub fn support(&self, itemset: &[usize]) -> usize {
        let mut covered = TidSet::full(self.num_transactions);
        for &item in itemset {
            match self.tidset(item) {
                Some(tids) => covered = covered.intersect(tids),
                None => return 0,
            }
        }
        covered.count()
    }
}

struct EclatSearch<'a> {
    index: &'a VerticalIndex,
    mode: Mode,
    min_count: usize,
    closure_extension: bool,
    sink: &'a ResultCollector,
}

/// A frequent single-item extension found while scanning the tail.
struct Child {
    position: usize,
    tids: TidSet,
    support: usize,
}

impl EclatSearch<'_> {
    /// Expands `prefix`, whose transactions are `tids`, with the candidate
    /// positions in `tail` (all strictly after the last position used).
    fn expand(&self, mut prefix: Vec<usize>, tids: &TidSet, support: usize, tail: &[usize]) -> Result<()> {
        let fold = self.closure_extension && self.mode != Mode::Frequent;
        let mut children: Vec<Child> = Vec::with_capacity(tail.len());

        for &position in tail {
            let item_tids = &self.index.tidsets[position];
            let next_support = tids.intersection_count(item_tids);
            if next_support < self.min_count {
                continue;
            }
            if fold && next_support == support {
                prefix.push(self.index.items[position]);
                continue;
            }
            children.push(Child {
                position,
                tids: tids.intersect(item_tids),
                support: next_support,
            });
        }

        let absorbed = match self.mode {
            Mode::Frequent => false,
            Mode::Closed => children.iter().any(|child| child.support == support),
            Mode::Maximal => !children.is_empty(),
        };
        if !absorbed {
            self.sink.insert(prefix.clone(), support)?;
        }

        let positions: Vec<usize> = children.iter().map(|child| child.position).collect();
        for (k, child) in children.iter().enumerate() {
            let mut extended = prefix.clone();
            extended.push(self.index.items[child.position]);
            self.expand(extended, &child.tids, child.support, &positions[k + 1..])?;
        }
        Ok(())
    }

    /// Positions whose transactions include all of `tids`.
    fn closure(&self, tids: &TidSet) -> Vec<usize> {
        (0..self.index.tidsets.len())
            .filter(|&position| tids.is_subset_of(&self.index.tidsets[position]))
            .collect()
    }

    /// Extends the closed set `closed` (positions, ascending) by `position`
    /// and closes the result. The closure is kept only if it adds no position
    /// below `position`; otherwise the branch of a smaller item owns it.
    fn extend_closed(&self, closed: &[usize], tids: &TidSet, position: usize) -> Result<()> {
        let item_tids = &self.index.tidsets[position];
        let support = tids.intersection_count(item_tids);
        if support < self.min_count {
            return Ok(());
        }

        let next = tids.intersect(item_tids);
        let closure = self.closure(&next);
        let below = |p: &&usize| **p < position;
        if !closure.iter().take_while(below).eq(closed.iter().take_while(below)) {
            return Ok(());
        }

        self.sink
            .insert(closure.iter().map(|&p| self.index.items[p]).collect(), support)?;
        for later in position + 1..self.index.items.len() {
            if closure.binary_search(&later).is_err() {
                self.extend_closed(&closure, &next, later)?;
            }
        }
        Ok(())
    }
}

/// Closed search that visits closed itemsets only. Starts from the closure
/// of the empty set and fans out over the remaining items in parallel.
fn eclat_closed(search: &EclatSearch<'_>) -> Result<()> {
    let index = search.index;
    let all = TidSet::full(index.num_transactions);
    let root = search.closure(&all);
    if !root.is_empty() {
        search
            .sink
            .insert(root.iter().map(|&p| index.items[p]).collect(), index.num_transactions)?;
    }

    let positions: Vec<usize> = (0..index.items.len())
        .filter(|position| root.binary_search(position).is_err())
        .collect();
    positions.par_iter().try_for_each(|&position| {
        debug!("eclat: closing item {}", index.items[position]);
        search.extend_closed(&root, &all, position)
    })
}

/// Depth-first bitset-intersection search. Each top-level item is one
/// parallel task; extensions only use items with a larger index, so every
/// itemset is visited at most once.
pub fn eclat(
    index: &VerticalIndex,
    mode: Mode,
    min_count: usize,
    closure_extension: bool,
    sink: &ResultCollector,
) -> Result<()> {
    let search = EclatSearch {
        index,
        mode,
        min_count,
        closure_extension,
        sink,
    };
    if mode == Mode::Closed && closure_extension {
        return eclat_closed(&search);
    }

    let positions: Vec<usize> = (0..index.items.len()).collect();

    positions.par_iter().try_for_each(|&position| {
        let tids = &index.tidsets[position];
        debug!("eclat: expanding item {}", index.items[position]);
        search.expand(
            vec![index.items[position]],
            tids,
            tids.count(),
            &positions[position + 1..],
        )
    })
}
