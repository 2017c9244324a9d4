//! Fixed-width bit sets over transaction (or item) indices.

/// A bit set backed by a vector of u64 words.
///
/// All sets taking part in one search share the same universe size, so
/// binary operations work word by word without bounds juggling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TidSet {
    words: Vec<u64>,
    universe: usize,
}

impl TidSet {
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set over `universe` indices.
    pub fn new(universe: usize) -> Self {
        let num_words = universe.div_ceil(Self::BITS_PER_WORD);
        Self {
            words: vec![0; num_words],
            universe,
        }
    }

    /// Creates the set containing every index of the universe.
    pub fn full(universe: usize) -> Self {
        let mut set = Self::new(universe);
        for word in set.words.iter_mut() {
            *word = u64::MAX;
        }
        let tail = universe % Self::BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = set.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        set
    }

    pub fn from_indices(universe: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(universe);
        for index in indices {
            set.insert(index);
        }
        set
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    pub fn universe(&self) -> usize {
        self.universe
    }

    #[inline]
    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < self.universe);
        let (word, bit) = Self::word_and_bit(index);
        self.words[word] |= 1u64 << bit;
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        self.words.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }

    /// Population count.
    #[inline]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Bitwise AND of two sets over the same universe.
    #[inline]
    pub fn intersect(&self, other: &TidSet) -> TidSet {
        debug_assert_eq!(self.universe, other.universe);
        TidSet {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
            universe: self.universe,
        }
    }

    /// `|self & other|` without materializing the intersection.
    #[inline]
    pub fn intersection_count(&self, other: &TidSet) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    pub fn is_subset_of(&self, other: &TidSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Whether both sets agree on every index below `bound`.
    pub fn agrees_below(&self, other: &TidSet, bound: usize) -> bool {
        let (full_words, tail) = Self::word_and_bit(bound);
        if self.words[..full_words] != other.words[..full_words] {
            return false;
        }
        if tail == 0 {
            return true;
        }
        let mask = (1u64 << tail) - 1;
        (self.words[full_words] ^ other.words[full_words]) & mask == 0
    }

    /// Set indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(word_idx * Self::BITS_PER_WORD + bit)
            })
        })
    }
}
