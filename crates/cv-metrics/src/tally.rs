//! # Tally
//!
//! An explicit counting map returned by value from pure functions.
//!
//! Keys keep the order in which they were first seen. That order is the
//! tie-breaker in [`Tally::ranked`], so two inputs that are permutations of
//! each other always produce equal [`Tally::to_map`] results but may rank
//! equal counts differently.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts of `K`, in first-encounter order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    /// An empty tally.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// The count for `key`; zero if never seen.
    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// `(key, count)` pairs in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.entries.iter().map(|(k, n)| (k, *n))
    }

    /// Pairs sorted by count descending; equal counts keep first-encounter order.
    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Order-free view for comparisons.
    pub fn to_map(&self) -> HashMap<K, usize> {
        self.entries.iter().cloned().collect()
    }
}

impl<K: Eq + Hash + Clone> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
