// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Per-transaction statistics and the numeric containers backing them.
//!
//! Statistics compose in two stages. Within one transaction the per-goal
//! [`PartialTxStats`] are combined by adding input counts as plain scalars.
//! Across transactions [`TxStats`] are combined by merging input-count
//! histograms, so aggregating a 2-input and a 3-input transaction yields the
//! bins `{2, 3}` and never `{5}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::float::Ordf64;

/// Counts of observations per integer bin, bin size 1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Histogram(BTreeMap<usize, u64>);

impl Histogram {
    /// The empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// The histogram holding a single observation of `bin`.
    pub fn singleton(bin: usize) -> Self {
        let mut histogram = Self::new();
        histogram.record(bin);
        histogram
    }

    /// Record one observation of `bin`.
    pub fn record(&mut self, bin: usize) {
        *self.0.entry(bin).or_insert(0) += 1;
    }

    /// Add `other`'s counts binwise.
    pub fn merge(&mut self, other: &Histogram) {
        for (&bin, &count) in &other.0 {
            *self.0.entry(bin).or_insert(0) += count;
        }
    }

    /// The count recorded for `bin`.
    pub fn count(&self, bin: usize) -> u64 {
        self.0.get(&bin).copied().unwrap_or(0)
    }

    /// Iterate over the non-empty bins in ascending order.
    pub fn bins(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0.iter().map(|(&bin, &count)| (bin, count))
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A counted set of `f64` ratios; union adds multiplicities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiSet(BTreeMap<Ordf64, u64>);

impl MultiSet {
    /// The empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// The multiset holding `ratio` once.
    pub fn singleton(ratio: f64) -> Self {
        let mut set = Self::new();
        set.insert(ratio);
        set
    }

    /// Add one occurrence of `ratio`.
    pub fn insert(&mut self, ratio: f64) {
        *self.0.entry(Ordf64(ratio)).or_insert(0) += 1;
    }

    /// Union with `other`, adding multiplicities.
    pub fn merge(&mut self, other: &MultiSet) {
        for (&ratio, &count) in &other.0 {
            *self.0.entry(ratio).or_insert(0) += count;
        }
    }

    /// The multiplicity of `ratio`.
    pub fn count(&self, ratio: f64) -> u64 {
        self.0.get(&Ordf64(ratio)).copied().unwrap_or(0)
    }

    /// Total number of occurrences across all ratios.
    pub fn len(&self) -> u64 {
        self.0.values().sum()
    }

    /// Whether the multiset is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(ratio, multiplicity)` pairs in ratio order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.0.iter().map(|(ratio, &count)| (ratio.0, count))
    }
}

/// Statistics of the goals handled so far within a single selection run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartialTxStats {
    /// Inputs selected so far, a plain count
    pub num_inputs: usize,
    /// One change-to-payment ratio per goal
    pub ratios: MultiSet,
}

impl PartialTxStats {
    /// Combine with the stats of another goal in the same run.
    pub fn combine(mut self, other: PartialTxStats) -> PartialTxStats {
        self.num_inputs += other.num_inputs;
        self.ratios.merge(&other.ratios);
        self
    }
}

/// Statistics of one or more finalized transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxStats {
    /// Input counts per transaction, as a histogram
    pub num_inputs: Histogram,
    /// Change-to-payment ratios across all goals
    pub ratios: MultiSet,
}

impl TxStats {
    /// Promote the stats of a completed run: the scalar input count becomes a
    /// single histogram observation.
    pub fn from_partial(partial: PartialTxStats) -> TxStats {
        TxStats {
            num_inputs: Histogram::singleton(partial.num_inputs),
            ratios: partial.ratios,
        }
    }

    /// Combine with the stats of other transactions.
    pub fn combine(mut self, other: TxStats) -> TxStats {
        self.num_inputs.merge(&other.num_inputs);
        self.ratios.merge(&other.ratios);
        self
    }
}
