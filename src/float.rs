// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Newtype around `f64` that implements `Ord`, so ratios can key ordered maps.

use serde::{Deserialize, Serialize};

/// Wrapper for `f64` that implements `Ord` via [`f64::total_cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ordf64(pub f64);

impl Eq for Ordf64 {}

impl Ord for Ordf64 {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Ordf64 {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Ordf64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<f64> for Ordf64 {
    fn from(value: f64) -> Self {
        Ordf64(value)
    }
}
