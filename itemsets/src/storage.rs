/// Memory-efficient itemset storage using flat arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsetStorage {
    items: Vec<usize>,
    offsets: Vec<(usize, usize)>,
    supports: Vec<usize>,
}

/// All itemsets of one length, with their supports
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentLevel {
    pub(crate) storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl ItemsetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(estimated_items: usize, estimated_itemsets: usize) -> Self {
        Self {
            items: Vec::with_capacity(estimated_items),
            offsets: Vec::with_capacity(estimated_itemsets),
            supports: Vec::with_capacity(estimated_itemsets),
        }
    }

    pub fn add_itemset(&mut self, items: &[usize], support: usize) -> usize {
        let start = self.items.len();
        self.items.extend_from_slice(items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
        self.offsets.len() - 1
    }

    pub fn get_itemset(&self, idx: usize) -> &[usize] {
        let (start, length) = self.offsets[idx];
        &self.items[start..start + length]
    }

    pub fn get_support(&self, idx: usize) -> usize {
        self.supports[idx]
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self {
            storage: ItemsetStorage::new(),
            itemset_size,
        }
    }

    pub fn with_capacity(itemset_size: usize, estimated_itemsets: usize) -> Self {
        Self {
            storage: ItemsetStorage::with_capacity(itemset_size * estimated_itemsets, estimated_itemsets),
            itemset_size,
        }
    }

    pub fn add_itemset(&mut self, items: &[usize], support: usize) -> usize {
        debug_assert_eq!(items.len(), self.itemset_size);
        self.storage.add_itemset(items, support)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn get_itemset(&self, idx: usize) -> &[usize] {
        self.storage.get_itemset(idx)
    }

    pub fn get_support(&self, idx: usize) -> usize {
        self.storage.get_support(idx)
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[usize]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[usize], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.get_support(idx)))
    }

    /// Copies the level into a row-major `len x itemset_size` buffer.
    pub fn to_flat(&self) -> Vec<usize> {
        let mut data = Vec::with_capacity(self.len() * self.itemset_size);
        for itemset in self.iter_itemsets() {
            data.extend_from_slice(itemset);
        }
        data
    }

    pub fn supports(&self) -> &[usize] {
        &self.storage.supports
    }
}
