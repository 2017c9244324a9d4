use std::collections::HashMap;

/// Arena node; `parent` and `children` hold indices into [`FPTree::nodes`].
#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<usize>,
    pub count: usize,
    pub parent: Option<usize>,
    pub children: HashMap<usize, usize>,
}

/// Prefix tree over support-filtered transactions.
///
/// The header table maps each item to the arena indices of every node carrying
/// it. A conditional tree is a fresh `FPTree`; nodes are never shared between
/// trees.
#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub header_table: HashMap<usize, Vec<usize>>,
    pub root_index: usize,
    min_count: usize,
    num_transactions: usize,
}

impl FPNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: HashMap::new(),
        }
    }

    pub fn new_item(item: usize, count: usize, parent: Option<usize>) -> Self {
        Self {
            item: Some(item),
            count,
            parent,
            children: HashMap::new(),
        }
    }
}

impl Default for FPTree {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl FPTree {
    /// Creates an empty tree that records the threshold it was built with and
    /// the number of transactions it represents.
    pub fn new(min_count: usize, num_transactions: usize) -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
            root_index: 0,
            min_count,
            num_transactions,
        }
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header_table.is_empty()
    }

    /// Merges a path into the tree, adding `count` to every node on it.
    ///
    /// `transaction` must already be in tree order.
    pub fn insert_transaction(&mut self, transaction: &[usize], count: usize) {
        let mut current_index = self.root_index;

        for &item in transaction {
            if let Some(&child_index) = self.nodes[current_index].children.get(&item) {
                self.nodes[child_index].count += count;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes
                    .push(FPNode::new_item(item, count, Some(current_index)));
                self.nodes[current_index].children.insert(item, new_index);
                self.header_table.entry(item).or_default().push(new_index);
                current_index = new_index;
            }
        }
    }

    /// Support of a single item: the sum of counters over its header entries.
    pub fn item_support(&self, item: usize) -> usize {
        self.header_table.get(&item).map_or(0, |nodes| {
            nodes.iter().map(|&idx| self.nodes[idx].count).sum()
        })
    }

    /// Items in the tree ordered by descending support, ties by ascending index.
    pub fn items(&self) -> Vec<usize> {
        let mut ranked: Vec<(usize, usize)> = self
            .header_table
            .keys()
            .map(|&item| (item, self.item_support(item)))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().map(|(item, _)| item).collect()
    }

    /// Support of an arbitrary itemset, counted on the tree alone.
    ///
    /// Every occurrence of the deepest item is walked to the root; its counter
    /// contributes when the path carries all the other items.
    pub fn itemset_support(&self, itemset: &[usize]) -> usize {
        if itemset.is_empty() {
            return self.num_transactions;
        }
        if itemset.iter().any(|item| !self.header_table.contains_key(item)) {
            return 0;
        }

        let order = self.items();
        let rank = |item: usize| order.iter().position(|&other| other == item);
        let Some(&deepest) = itemset.iter().max_by_key(|&&item| rank(item)) else {
            return 0;
        };
        let others: Vec<usize> = itemset
            .iter()
            .copied()
            .filter(|&item| item != deepest)
            .collect();

        self.header_table[&deepest]
            .iter()
            .filter(|&&idx| {
                let path = self.ancestors(idx);
                others.iter().all(|item| path.contains(item))
            })
            .map(|&idx| self.nodes[idx].count)
            .sum()
    }

    fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self.nodes[index].parent;

        while let Some(i) = current {
            if let Some(item) = self.nodes[i].item {
                path.push(item);
            }
            current = self.nodes[i].parent;
        }
        path
    }

    /// Root-to-parent item paths above every occurrence of `item`, each paired
    /// with that occurrence's counter. Empty paths are skipped.
    pub fn get_prefix_paths(&self, item: usize) -> Vec<(Vec<usize>, usize)> {
        self.header_table.get(&item).map_or(Vec::new(), |nodes| {
            nodes
                .iter()
                .filter_map(|&idx| {
                    let mut path = self.ancestors(idx);
                    path.reverse();
                    (!path.is_empty()).then_some((path, self.nodes[idx].count))
                })
                .collect()
        })
    }

    pub fn has_single_path(&self) -> bool {
        let mut current_index = self.root_index;

        loop {
            let children = &self.nodes[current_index].children;
            match children.values().next() {
                None => return true,
                Some(&child) if children.len() == 1 => current_index = child,
                Some(_) => return false,
            }
        }
    }

    /// `(item, count)` pairs from the root down, following first children.
    ///
    /// Meaningful when [`has_single_path`](Self::has_single_path) holds.
    pub fn get_single_path(&self) -> Vec<(usize, usize)> {
        let mut path = Vec::new();
        let mut current_index = self.root_index;

        while let Some(&child_index) = self.nodes[current_index].children.values().next() {
            let child_node = &self.nodes[child_index];
            if let Some(item) = child_node.item {
                path.push((item, child_node.count));
            }
            current_index = child_index;
        }
        path
    }
}
