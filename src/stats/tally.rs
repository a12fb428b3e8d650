//! Frequency tally that remembers first-appearance order.
//!
//! "Most frequent" ties resolve to the key seen first, which keeps results
//! deterministic regardless of hashing.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: &K) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest count; ties go to the earliest-seen key.
    pub fn most_common(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Keys ordered by descending count. The sort is stable, so equal counts
    /// stay in first-seen order.
    pub fn ranked(&self) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl<K: Eq + Hash + Clone + Ord> Tally<K> {
    /// Highest count; ties go to the smallest key.
    pub fn most_common_lowest(&self) -> Option<(&K, u64)> {
        self.entries
            .iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .map(|(key, count)| (key, *count))
    }

    pub fn min_key(&self) -> Option<&K> {
        self.entries.iter().map(|(k, _)| k).min()
    }

    pub fn max_key(&self) -> Option<&K> {
        self.entries.iter().map(|(k, _)| k).max()
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
