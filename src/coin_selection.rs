// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Coin selection
//!
//! This module provides the trait [`CoinSelectionAlgorithm`] that can be
//! implemented to define custom coin selection policies, the three built-in
//! policies ([`SingleMatchCoinSelection`], [`LargestFirstCoinSelection`] and
//! [`RandomCoinSelection`]), and the policy runner that turns a selection
//! into an unsigned [`Transaction`].
//!
//! A policy works one goal at a time against a [`SelectionState`]: it moves
//! inputs from the remaining UTxO into the selected set and appends the goal
//! output, plus a change output when the selected inputs overshoot. The
//! runner then filters treasury-addressed outputs, distributes the estimated
//! fee over what is left, checks that the selected inputs cover the
//! fee-adjusted total and finalizes.

use std::collections::BTreeSet;
use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fee::{distribute_fee, EstimateFee, ExpenseRegulation};
use crate::stats::{MultiSet, PartialTxStats, TxStats};
use crate::types::{OutPoint, Payment, Transaction, TxOut, Value, WalletContext};
use crate::utxo::Utxo;

/// Uniform random source driving the randomized policy.
///
/// Any [`rand::RngCore`] is a `RandomSource`; tests that need an exact draw
/// order implement the trait directly over a scripted list of indexes.
pub trait RandomSource {
    /// Return a uniformly distributed index in `[0, upper)`.
    ///
    /// `upper` is never zero: callers check for an empty container first.
    fn random_index(&mut self, upper: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn random_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

/// The working set threaded through a single selection run.
///
/// Selected inputs are always removed from `utxo` first, so the two sides
/// stay disjoint for the whole run.
#[derive(Debug, Clone)]
pub struct SelectionState<H, A> {
    /// The UTxO entries still available for selection
    pub utxo: Utxo<H, A>,
    /// The inputs chosen so far
    pub selected: BTreeSet<OutPoint<H>>,
    /// The outputs produced so far, goals and change, in generation order
    pub outputs: Vec<Payment<A>>,
}

impl<H: Ord, A> SelectionState<H, A> {
    /// Start a run over `utxo` with nothing selected and nothing produced.
    pub fn new(utxo: Utxo<H, A>) -> Self {
        SelectionState {
            utxo,
            selected: BTreeSet::new(),
            outputs: Vec::new(),
        }
    }

    /// Move `outpoint` from the remaining UTxO into the selected set,
    /// returning its output. `None` when the outpoint is not available.
    pub fn select_input(&mut self, outpoint: OutPoint<H>) -> Option<TxOut<A>> {
        let txout = self.utxo.remove(&outpoint)?;
        self.selected.insert(outpoint);
        Some(txout)
    }

    /// Append a produced output.
    pub fn push_output(&mut self, payment: Payment<A>) {
        self.outputs.push(payment);
    }
}

/// Trait for generalized coin selection policies
///
/// A policy handles one goal per call; multi-goal transactions fold the goal
/// list through the same state, left to right.
pub trait CoinSelectionAlgorithm<C: WalletContext>: fmt::Debug {
    /// Satisfy one goal against the current state.
    ///
    /// On success the policy has moved the inputs it chose out of
    /// `state.utxo` into `state.selected`, appended the goal output (and a
    /// change output when one was needed) to `state.outputs`, and reports
    /// what it did as a [`PartialTxStats`].
    fn select_goal<R: RandomSource + ?Sized>(
        &self,
        ctx: &mut C,
        rng: &mut R,
        state: &mut SelectionState<C::Hash, C::Addr>,
        goal: &Payment<C::Addr>,
    ) -> Result<PartialTxStats, Error<C::Addr>>;
}

/// Append the goal output plus change, and report the goal's stats.
fn finish_goal<C: WalletContext>(
    ctx: &mut C,
    state: &mut SelectionState<C::Hash, C::Addr>,
    goal: &Payment<C::Addr>,
    num_inputs: usize,
    sum: Value,
) -> Result<PartialTxStats, Error<C::Addr>> {
    let goal_value = goal.output.value;
    state.push_output(goal.clone());

    let change = sum - goal_value;
    if change > 0 {
        let address = ctx.fresh_change_address();
        log::debug!("change of `{}` to a fresh address", change);
        state.push_output(Payment {
            regulation: goal.regulation,
            output: TxOut {
                address,
                value: change,
            },
        });
    }

    Ok(PartialTxStats {
        num_inputs,
        ratios: MultiSet::singleton(change as f64 / goal_value as f64),
    })
}

/// Testing policy: spend exactly one UTxO entry whose value matches the goal
///
/// The first matching entry in outpoint order wins. Not meant for production
/// use; it exists to keep transaction shapes trivial in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleMatchCoinSelection;

impl<C: WalletContext> CoinSelectionAlgorithm<C> for SingleMatchCoinSelection {
    fn select_goal<R: RandomSource + ?Sized>(
        &self,
        _ctx: &mut C,
        _rng: &mut R,
        state: &mut SelectionState<C::Hash, C::Addr>,
        goal: &Payment<C::Addr>,
    ) -> Result<PartialTxStats, Error<C::Addr>> {
        let matching = state
            .utxo
            .iter()
            .find(|(_, txout)| txout.value == goal.output.value)
            .map(|(outpoint, _)| outpoint.clone());
        let outpoint = matching.ok_or(Error::InputSelectionFailure)?;

        state.select_input(outpoint);
        state.push_output(goal.clone());

        Ok(PartialTxStats {
            num_inputs: 1,
            ratios: MultiSet::singleton(0.0),
        })
    }
}

/// Simple and dumb coin selection
///
/// Sorts the remaining UTxO entries by value and keeps picking from the
/// largest ones until the goal is covered. Entries of equal value are taken
/// in outpoint order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFirstCoinSelection;

impl<C: WalletContext> CoinSelectionAlgorithm<C> for LargestFirstCoinSelection {
    fn select_goal<R: RandomSource + ?Sized>(
        &self,
        ctx: &mut C,
        _rng: &mut R,
        state: &mut SelectionState<C::Hash, C::Addr>,
        goal: &Payment<C::Addr>,
    ) -> Result<PartialTxStats, Error<C::Addr>> {
        let goal_value = goal.output.value;
        log::debug!(
            "largest-first goal of `{}` over {} entries",
            goal_value,
            state.utxo.len()
        );

        let mut entries: Vec<(OutPoint<C::Hash>, Value)> = state
            .utxo
            .iter()
            .map(|(outpoint, txout)| (outpoint.clone(), txout.value))
            .collect();
        entries.sort_unstable_by_key(|(outpoint, value)| {
            (core::cmp::Reverse(*value), outpoint.clone())
        });

        let mut sum: Value = 0;
        let mut picked = Vec::new();
        for (outpoint, value) in entries {
            if sum >= goal_value {
                break;
            }
            sum += value;
            picked.push(outpoint);
        }
        if sum < goal_value {
            return Err(Error::InputSelectionFailure);
        }

        let num_inputs = picked.len();
        for outpoint in picked {
            let spent = state.select_input(outpoint);
            debug_assert!(spent.is_some());
        }

        finish_goal(ctx, state, goal, num_inputs, sum)
    }
}

/// Whether the randomized policy shapes change outputs to mimic payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivacyMode {
    /// Aim for a change between half and twice the payment, so change
    /// outputs are hard to tell apart from payments and the UTxO refills
    /// near recent payment scales
    On,
    /// Accept any input sum covering the goal
    Off,
}

/// Randomized coin selection
///
/// Draws inputs uniformly at random until their sum lands in a target
/// window. Because draws are uniform over entries, the mix of small and
/// large entries spent tracks the mix present in the UTxO, which keeps the
/// set from accumulating dust over many transactions.
#[derive(Debug, Clone, Copy)]
pub struct RandomCoinSelection {
    /// Change-shaping behavior
    pub privacy: PrivacyMode,
}

impl<C: WalletContext> CoinSelectionAlgorithm<C> for RandomCoinSelection {
    fn select_goal<R: RandomSource + ?Sized>(
        &self,
        ctx: &mut C,
        rng: &mut R,
        state: &mut SelectionState<C::Hash, C::Addr>,
        goal: &Payment<C::Addr>,
    ) -> Result<PartialTxStats, Error<C::Addr>> {
        let goal_value = goal.output.value;
        log::debug!(
            "random goal of `{}` over {} entries, privacy {:?}",
            goal_value,
            state.utxo.len(),
            self.privacy
        );

        // input sums in this window leave a change between half and twice
        // the payment
        let ideal = (
            goal_value.saturating_add(goal_value / 2),
            goal_value.saturating_mul(3),
        );
        let fallback = (goal_value, Value::MAX);

        let attempt = match self.privacy {
            PrivacyMode::On => random_in_range(&state.utxo, ideal, rng)
                .or_else(|| random_in_range(&state.utxo, fallback, rng)),
            PrivacyMode::Off => random_in_range(&state.utxo, fallback, rng),
        };
        let (used, sum) = attempt.ok_or(Error::InputSelectionFailure)?;

        let num_inputs = used.len();
        for outpoint in used {
            let spent = state.select_input(outpoint);
            debug_assert!(spent.is_some());
        }

        finish_goal(ctx, state, goal, num_inputs, sum)
    }
}

/// Draw random inputs until the drawn sum lands inside `[lo, hi]`.
///
/// A draw that would push the sum past `hi` stays out of the result and
/// remains spendable. `None` when the set is exhausted before the sum
/// reaches `lo`; the caller's `utxo` is untouched either way, so a failed
/// attempt can be retried against a wider window. Terminates within
/// `utxo.len()` draws.
fn random_in_range<H, A, R>(
    utxo: &Utxo<H, A>,
    (lo, hi): (Value, Value),
    rng: &mut R,
) -> Option<(BTreeSet<OutPoint<H>>, Value)>
where
    H: Clone + Ord,
    A: Clone,
    R: RandomSource + ?Sized,
{
    let mut remaining = utxo.clone();
    let mut used = BTreeSet::new();
    let mut acc: Value = 0;

    loop {
        if lo <= acc && acc <= hi {
            return Some((used, acc));
        }
        let (outpoint, txout) = random_element(&mut remaining, rng)?;
        match acc.checked_add(txout.value) {
            Some(sum) if sum <= hi => {
                acc = sum;
                used.insert(outpoint);
            }
            // too large for the window
            _ => {}
        }
    }
}

/// Remove and return a uniformly chosen entry, or `None` when the set is
/// empty.
///
/// The container has no positional access, so each draw walks to the chosen
/// index. Uniformity is the contract here, not speed.
pub fn random_element<H, A, R>(
    utxo: &mut Utxo<H, A>,
    rng: &mut R,
) -> Option<(OutPoint<H>, TxOut<A>)>
where
    H: Clone + Ord,
    R: RandomSource + ?Sized,
{
    if utxo.is_empty() {
        return None;
    }
    let index = rng.random_index(utxo.len());
    let outpoint = utxo
        .iter()
        .nth(index)
        .map(|(outpoint, _)| outpoint.clone())?;
    let txout = utxo.remove(&outpoint)?;
    Some((outpoint, txout))
}

/// Run a selection body and finalize its state into a transaction.
///
/// The body has full authority over the [`SelectionState`]; whatever it
/// selects and produces is finalized in four steps: treasury-addressed
/// outputs are filtered out, the fee is distributed over the rest, the
/// selected inputs must cover the fee-adjusted total (otherwise
/// [`Error::NeedsExtraInputsToCover`] reports the slack as a treasury
/// output for the caller to retry with), and a fresh hash is requested for
/// the finished [`Transaction`].
pub fn run_policy<C, E, B>(
    ctx: &mut C,
    fee_estimator: &E,
    utxo: Utxo<C::Hash, C::Addr>,
    body: B,
) -> Result<(Transaction<C::Hash, C::Addr>, TxStats), Error<C::Addr>>
where
    C: WalletContext,
    E: EstimateFee + ?Sized,
    B: FnOnce(
        &mut C,
        &mut SelectionState<C::Hash, C::Addr>,
    ) -> Result<PartialTxStats, Error<C::Addr>>,
{
    let initial = utxo.clone();
    let mut state = SelectionState::new(utxo);
    let partial = body(ctx, &mut state)?;

    let treasury = ctx.treasury_address();
    let SelectionState {
        selected, outputs, ..
    } = state;
    let goals: Vec<Payment<C::Addr>> = outputs
        .into_iter()
        .filter(|payment| payment.output.address != treasury)
        .collect();

    let outputs = distribute_fee(fee_estimator, &goals, selected.len())?;

    let amount_needed: Value = outputs.iter().map(|payment| payment.output.value).sum();
    let amount_covered = initial.restrict_to(&selected).balance();
    log::debug!(
        "{} inputs cover `{}` of `{}` needed",
        selected.len(),
        amount_covered,
        amount_needed
    );
    if amount_covered < amount_needed {
        return Err(Error::NeedsExtraInputsToCover(
            ExpenseRegulation::SenderPaysFees,
            TxOut {
                address: treasury,
                value: amount_needed - amount_covered,
            },
        ));
    }

    let out_values: Vec<Value> = outputs.iter().map(|payment| payment.output.value).collect();
    let fee = fee_estimator.estimate(selected.len(), &out_values);
    let hash = ctx.fresh_tx_hash();
    let transaction = Transaction {
        counter: 0,
        inputs: selected,
        outputs: outputs.into_iter().map(|payment| payment.output).collect(),
        fee,
        hash,
        extra: Vec::new(),
    };

    Ok((transaction, TxStats::from_partial(partial)))
}

/// Select inputs for `goals` with `policy` and finalize the transaction.
///
/// Goals are processed left to right against the same state, their
/// [`PartialTxStats`] combined along the way; see [`run_policy`] for the
/// finalization steps.
pub fn select_inputs<P, C, E, R>(
    policy: &P,
    ctx: &mut C,
    rng: &mut R,
    fee_estimator: &E,
    utxo: Utxo<C::Hash, C::Addr>,
    goals: &[Payment<C::Addr>],
) -> Result<(Transaction<C::Hash, C::Addr>, TxStats), Error<C::Addr>>
where
    P: CoinSelectionAlgorithm<C>,
    C: WalletContext,
    E: EstimateFee + ?Sized,
    R: RandomSource + ?Sized,
{
    run_policy(ctx, fee_estimator, utxo, |ctx, state| {
        let mut stats = PartialTxStats::default();
        for goal in goals {
            let partial = policy.select_goal(ctx, rng, state, goal)?;
            stats = stats.combine(partial);
        }
        Ok(stats)
    })
}
