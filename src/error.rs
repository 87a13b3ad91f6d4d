// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

use std::fmt;

use crate::fee::ExpenseRegulation;
use crate::types::TxOut;

/// Errors that can be returned by a selection run
#[derive(Debug, Clone, PartialEq)]
pub enum Error<A> {
    /// The available UTxO cannot satisfy a goal: no exact match exists (exact
    /// policy), or the set was exhausted before the goal value was covered
    /// (largest-first and random policies)
    InputSelectionFailure,
    /// Distributing the fee would drive this receiver-regulated output below
    /// zero. The caller must lower the fee or adjust the goal
    InsufficientFundsToCoverFee(ExpenseRegulation, TxOut<A>),
    /// The selected inputs cover the goal values but not the fee added on
    /// top. The carried output pays the reported slack to the treasury
    /// address; re-invoking selection with it appended as an extra goal makes
    /// the next run pick inputs for the shortfall.
    ///
    /// The regulation is always [`ExpenseRegulation::SenderPaysFees`]. With a
    /// goal list mixing regulation ratios the slack is not necessarily all
    /// sender-owed, but it is still reported as such.
    NeedsExtraInputsToCover(ExpenseRegulation, TxOut<A>),
}

impl<A: fmt::Debug> fmt::Display for Error<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputSelectionFailure => {
                write!(f, "available UTxO entries cannot satisfy the goal")
            }
            Error::InsufficientFundsToCoverFee(regulation, txout) => write!(
                f,
                "output {:?} regulated as {:?} cannot absorb its fee share",
                txout, regulation
            ),
            Error::NeedsExtraInputsToCover(_, txout) => write!(
                f,
                "selected inputs fall {} short of the fee-adjusted total",
                txout.value
            ),
        }
    }
}

impl<A: fmt::Debug> std::error::Error for Error<A> {}
