// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Fee estimation and the distribution of the fee over goal outputs.
//!
//! The runner does not subtract the fee from a single place. Instead each
//! output absorbs a share of the estimated fee according to its
//! [`ExpenseRegulation`]: a sender-pays output grows by its share (the
//! sender's inputs must then cover the larger total), a receiver-pays output
//! shrinks by it.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Payment, TxOut, Value};

/// How an output's share of the fee is split between sender and receiver.
///
/// The regulation boils down to the fraction of the share the receiver
/// absorbs: `0.0` leaves the receiver untouched and charges the sender,
/// `1.0` charges the receiver in full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExpenseRegulation {
    /// The sender covers the share: the output value grows by it and the
    /// selected inputs have to cover the difference
    SenderPaysFees,
    /// The receiver covers the share: the output value shrinks by it
    ReceiverPaysFees,
    /// The receiver absorbs this fraction of the share, the sender the rest.
    /// The fraction must lie within `[0.0, 1.0]`
    SharedExpense(f64),
}

impl ExpenseRegulation {
    /// The fraction of the fee share the receiver absorbs.
    ///
    /// ## Panics
    ///
    /// Panics when a [`ExpenseRegulation::SharedExpense`] fraction lies
    /// outside `[0.0, 1.0]`. Such a value is a bug in the caller, not a
    /// recoverable condition.
    pub fn ratio(&self) -> f64 {
        match *self {
            ExpenseRegulation::SenderPaysFees => 0.0,
            ExpenseRegulation::ReceiverPaysFees => 1.0,
            ExpenseRegulation::SharedExpense(fraction) => {
                assert!(
                    (0.0..=1.0).contains(&fraction),
                    "expense regulation fraction {} is outside [0.0, 1.0]",
                    fraction
                );
                fraction
            }
        }
    }
}

/// A pure transaction cost function.
///
/// Estimates must be deterministic in the number of inputs and the output
/// values. Closures and function pointers with the matching shape implement
/// this directly.
pub trait EstimateFee {
    /// The fee for a transaction spending `n_inputs` inputs and producing
    /// `outputs`.
    fn estimate(&self, n_inputs: usize, outputs: &[Value]) -> Value;
}

impl<F> EstimateFee for F
where
    F: Fn(usize, &[Value]) -> Value,
{
    fn estimate(&self, n_inputs: usize, outputs: &[Value]) -> Value {
        self(n_inputs, outputs)
    }
}

/// The affine cost model `base + per_input * n + per_output * m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearFee {
    /// Flat cost per transaction
    pub base: Value,
    /// Cost per spent input
    pub per_input: Value,
    /// Cost per produced output
    pub per_output: Value,
}

impl LinearFee {
    /// Build the cost model from its coefficients.
    pub fn new(base: Value, per_input: Value, per_output: Value) -> Self {
        LinearFee {
            base,
            per_input,
            per_output,
        }
    }
}

impl EstimateFee for LinearFee {
    fn estimate(&self, n_inputs: usize, outputs: &[Value]) -> Value {
        self.base + self.per_input * n_inputs as Value + self.per_output * outputs.len() as Value
    }
}

/// Amend each payment's value by its share of the estimated fee.
///
/// The upper bound fee is estimated against `expected_inputs_len` and the
/// unamended output values, then split into one epsilon per payment by
/// integer division. A sender-pays payment grows by epsilon; any other
/// regulation shrinks the payment by `ceil(epsilon * ratio)`, failing with
/// [`Error::InsufficientFundsToCoverFee`] when the value cannot absorb it.
/// The first failing payment aborts the distribution.
///
/// Rounding the receiver share up keeps the accumulated fee at or above the
/// estimate even though epsilon itself was rounded down.
///
/// Payments amended down to exactly zero are dropped: a zero-value output
/// never reaches the final transaction.
pub fn distribute_fee<A, E>(
    estimator: &E,
    payments: &[Payment<A>],
    expected_inputs_len: usize,
) -> Result<Vec<Payment<A>>, Error<A>>
where
    A: Clone,
    E: EstimateFee + ?Sized,
{
    let values: Vec<Value> = payments.iter().map(|payment| payment.output.value).collect();
    let upper_bound_fee = estimator.estimate(expected_inputs_len, &values);
    let epsilon = if payments.is_empty() {
        upper_bound_fee
    } else {
        upper_bound_fee / payments.len() as Value
    };
    log::debug!(
        "upper_bound_fee = `{}`, epsilon = `{}` over {} outputs",
        upper_bound_fee,
        epsilon,
        payments.len()
    );

    let mut amended = Vec::with_capacity(payments.len());
    for payment in payments {
        let ratio = payment.regulation.ratio();
        let value = payment.output.value;
        let value = if ratio == 0.0 {
            value + epsilon
        } else {
            // round the receiver share up so the shares cannot sum below the
            // estimated fee
            let share = (epsilon as f64 * ratio).ceil() as Value;
            if value < share {
                return Err(Error::InsufficientFundsToCoverFee(
                    payment.regulation,
                    payment.output.clone(),
                ));
            }
            value - share
        };
        if value != 0 {
            amended.push(Payment {
                regulation: payment.regulation,
                output: TxOut {
                    address: payment.output.address.clone(),
                    value,
                },
            });
        }
    }
    Ok(amended)
}
