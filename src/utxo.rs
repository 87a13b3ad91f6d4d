// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! The set of unspent transaction outputs a wallet can draw from.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{OutPoint, TxOut, Value};

/// A finite mapping from [`OutPoint`] to [`TxOut`].
///
/// Iteration order is the [`OutPoint`] order, so every operation on the
/// container is deterministic for a given content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo<H, A> {
    entries: BTreeMap<OutPoint<H>, TxOut<A>>,
}

impl<H, A> Default for Utxo<H, A> {
    fn default() -> Self {
        Utxo {
            entries: BTreeMap::new(),
        }
    }
}

impl<H: Ord, A> Utxo<H, A> {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning the previous output at that outpoint if any.
    pub fn insert(&mut self, outpoint: OutPoint<H>, txout: TxOut<A>) -> Option<TxOut<A>> {
        self.entries.insert(outpoint, txout)
    }

    /// Remove and return the entry at `outpoint`.
    pub fn remove(&mut self, outpoint: &OutPoint<H>) -> Option<TxOut<A>> {
        self.entries.remove(outpoint)
    }

    /// The output at `outpoint`, if present.
    pub fn get(&self, outpoint: &OutPoint<H>) -> Option<&TxOut<A>> {
        self.entries.get(outpoint)
    }

    /// Whether `outpoint` is in the set.
    pub fn contains(&self, outpoint: &OutPoint<H>) -> bool {
        self.entries.contains_key(outpoint)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all output values.
    pub fn balance(&self) -> Value {
        self.entries.values().map(|txout| txout.value).sum()
    }

    /// Drop every entry whose outpoint is in `spent`.
    pub fn remove_inputs(&mut self, spent: &BTreeSet<OutPoint<H>>) {
        for outpoint in spent {
            self.entries.remove(outpoint);
        }
    }

    /// Left-biased union: entries of `self` win on conflicting outpoints.
    pub fn union(mut self, other: Self) -> Self {
        for (outpoint, txout) in other.entries {
            self.entries.entry(outpoint).or_insert(txout);
        }
        self
    }

    /// Iterate over the entries in outpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint<H>, &TxOut<A>)> {
        self.entries.iter()
    }
}

impl<H: Ord + Clone, A> Utxo<H, A> {
    /// The set of outpoints, the domain of the mapping.
    pub fn outpoints(&self) -> BTreeSet<OutPoint<H>> {
        self.entries.keys().cloned().collect()
    }
}

impl<H: Ord + Clone, A: Clone> Utxo<H, A> {
    /// The sub-mapping whose outpoints are in `keep`.
    pub fn restrict_to(&self, keep: &BTreeSet<OutPoint<H>>) -> Self {
        Utxo {
            entries: self
                .entries
                .iter()
                .filter(|(outpoint, _)| keep.contains(*outpoint))
                .map(|(outpoint, txout)| (outpoint.clone(), txout.clone()))
                .collect(),
        }
    }
}

impl<H: Ord, A> std::iter::FromIterator<(OutPoint<H>, TxOut<A>)> for Utxo<H, A> {
    fn from_iter<I: IntoIterator<Item = (OutPoint<H>, TxOut<A>)>>(iter: I) -> Self {
        Utxo {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<H: Ord, A> Extend<(OutPoint<H>, TxOut<A>)> for Utxo<H, A> {
    fn extend<I: IntoIterator<Item = (OutPoint<H>, TxOut<A>)>>(&mut self, iter: I) {
        self.entries.extend(iter)
    }
}

impl<H, A> IntoIterator for Utxo<H, A> {
    type Item = (OutPoint<H>, TxOut<A>);
    type IntoIter = std::collections::btree_map::IntoIter<OutPoint<H>, TxOut<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, H, A> IntoIterator for &'a Utxo<H, A> {
    type Item = (&'a OutPoint<H>, &'a TxOut<A>);
    type IntoIter = std::collections::btree_map::Iter<'a, OutPoint<H>, TxOut<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn outpoint(txid: u64) -> OutPoint<u64> {
        OutPoint { txid, vout: 0 }
    }

    fn txout(value: Value) -> TxOut<u8> {
        TxOut { address: 0, value }
    }

    fn utxo(entries: &[(u64, Value)]) -> Utxo<u64, u8> {
        entries
            .iter()
            .map(|&(txid, value)| (outpoint(txid), txout(value)))
            .collect()
    }

    #[test]
    fn balance_sums_all_values() {
        let utxo = utxo(&[(1, 100), (2, 50), (3, 1)]);
        assert_eq!(utxo.balance(), 151);
        assert_eq!(utxo.len(), 3);
    }

    #[test]
    fn insert_and_remove() {
        let mut utxo = utxo(&[(1, 100)]);
        assert_eq!(utxo.insert(outpoint(1), txout(70)), Some(txout(100)));
        assert_eq!(utxo.remove(&outpoint(1)), Some(txout(70)));
        assert_eq!(utxo.remove(&outpoint(1)), None);
        assert!(utxo.is_empty());
    }

    #[test]
    fn restrict_and_remove_partition_the_set() {
        let full = utxo(&[(1, 100), (2, 50), (3, 1)]);
        let keep: std::collections::BTreeSet<_> =
            vec![outpoint(1), outpoint(3)].into_iter().collect();

        let kept = full.restrict_to(&keep);
        assert_eq!(kept.balance(), 101);

        let mut rest = full.clone();
        rest.remove_inputs(&keep);
        assert_eq!(rest.balance(), 50);
        assert_eq!(kept.union(rest), full);
    }

    #[test]
    fn union_is_left_biased() {
        let left = utxo(&[(1, 100)]);
        let right = utxo(&[(1, 999), (2, 50)]);
        let merged = left.union(right);
        assert_eq!(merged.get(&outpoint(1)), Some(&txout(100)));
        assert_eq!(merged.balance(), 150);
    }

    #[test]
    fn outpoints_is_the_domain() {
        let utxo = utxo(&[(2, 50), (1, 100)]);
        let domain: Vec<_> = utxo.outpoints().into_iter().collect();
        assert_eq!(domain, vec![outpoint(1), outpoint(2)]);
    }
}
