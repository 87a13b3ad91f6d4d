// UTxO Select
//
// Copyright (c) 2026 UTxO Select Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Input selection for UTxO wallets.
//!
//! Given the set of unspent outputs a wallet owns and a list of payment
//! goals, this crate chooses which inputs to spend, splits the estimated fee
//! between sender and receivers per goal, shapes change outputs, and
//! produces an unsigned [`Transaction`] together with the [`TxStats`] used
//! to evaluate how a policy behaves over many runs.
//!
//! Three policies are built in:
//!
//! - [`SingleMatchCoinSelection`] spends one exactly-matching entry per goal
//!   and exists for tests;
//! - [`LargestFirstCoinSelection`] greedily spends the largest entries;
//! - [`RandomCoinSelection`] draws entries uniformly at random and, with
//!   [`PrivacyMode::On`], aims for a change between half and twice the
//!   payment so change outputs blend in with ordinary payments.
//!
//! The crate performs no signing, serialization or I/O. Everything it needs
//! from its host is a [`WalletContext`] (fresh change addresses and
//! transaction hashes), a pure fee estimator and, for the random policy, a
//! random source.
//!
//! ## Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use utxo_select::coin_selection::{select_inputs, LargestFirstCoinSelection};
//! use utxo_select::fee::{ExpenseRegulation, LinearFee};
//! use utxo_select::{OutPoint, Payment, TxOut, Utxo, WalletContext};
//!
//! #[derive(Debug)]
//! struct Wallet {
//!     next_address: u64,
//!     next_hash: u64,
//! }
//!
//! impl WalletContext for Wallet {
//!     type Hash = u64;
//!     type Addr = u64;
//!
//!     fn fresh_change_address(&mut self) -> u64 {
//!         self.next_address += 1;
//!         self.next_address
//!     }
//!
//!     fn fresh_tx_hash(&mut self) -> u64 {
//!         self.next_hash += 1;
//!         self.next_hash
//!     }
//!
//!     fn treasury_address(&self) -> u64 {
//!         0
//!     }
//! }
//!
//! let utxo: Utxo<u64, u64> = vec![
//!     (OutPoint { txid: 1, vout: 0 }, TxOut { address: 17, value: 100 }),
//!     (OutPoint { txid: 2, vout: 0 }, TxOut { address: 17, value: 80 }),
//! ]
//! .into_iter()
//! .collect();
//!
//! let goals = [Payment::new(ExpenseRegulation::SenderPaysFees, 42, 90)];
//!
//! let mut wallet = Wallet { next_address: 1_000, next_hash: 0 };
//! let mut rng = StdRng::seed_from_u64(7);
//! let (tx, stats) = select_inputs(
//!     &LargestFirstCoinSelection,
//!     &mut wallet,
//!     &mut rng,
//!     &LinearFee::new(0, 0, 0),
//!     utxo,
//!     &goals,
//! )?;
//!
//! // the 100 entry was spent: 90 to the payee, 10 back as change
//! assert_eq!(tx.total_output(), 100);
//! assert_eq!(stats.num_inputs.count(1), 1);
//! # Ok::<(), utxo_select::Error<u64>>(())
//! ```

pub mod coin_selection;
pub(crate) mod error;
pub mod fee;
pub mod float;
pub mod stats;
pub(crate) mod types;
pub(crate) mod utxo;

pub use coin_selection::{
    run_policy, select_inputs, CoinSelectionAlgorithm, LargestFirstCoinSelection, PrivacyMode,
    RandomCoinSelection, RandomSource, SelectionState, SingleMatchCoinSelection,
};
pub use error::Error;
pub use fee::{distribute_fee, EstimateFee, ExpenseRegulation, LinearFee};
pub use stats::{Histogram, MultiSet, PartialTxStats, TxStats};
pub use types::*;
pub use utxo::Utxo;
