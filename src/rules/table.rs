use std::fmt;
use std::marker::PhantomData;

use crate::entity::RuleKey;

/// Fixed-size table of weights indexed by a closed enum's ordinal.
///
/// Entries absent from the rule document stay unset and read as `0`.
#[derive(Clone, PartialEq)]
pub struct WeightTable<K: RuleKey> {
    values: Vec<Option<f64>>,
    _key: PhantomData<K>,
}

impl<K: RuleKey> WeightTable<K> {
    pub fn new() -> Self {
        Self {
            values: vec![None; K::ALL.len()],
            _key: PhantomData,
        }
    }

    pub fn set(&mut self, key: K, value: f64) {
        self.values[key.index()] = Some(value);
    }

    /// Configured value, if the document set one.
    pub fn get(&self, key: K) -> Option<f64> {
        self.values[key.index()]
    }

    /// Configured value, or `0` when unset.
    pub fn weight(&self, key: K) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Set entries in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        K::ALL
            .iter()
            .copied()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

impl<K: RuleKey> Default for WeightTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RuleKey> FromIterator<(K, f64)> for WeightTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.set(key, value);
        }
        table
    }
}

impl<K: RuleKey> fmt::Debug for WeightTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key.as_str(), value)))
            .finish()
    }
}
