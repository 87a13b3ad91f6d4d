#![allow(dead_code)]

use utxo_select::{
    ExpenseRegulation, OutPoint, Payment, RandomSource, TxOut, Utxo, Value, WalletContext,
};

pub const PAYEE: u64 = 7;
pub const TREASURY: u64 = u64::MAX;
pub const CHANGE_BASE: u64 = 1_000_000;

/// Deterministic wallet double: change addresses and hashes are counters.
#[derive(Debug, Default)]
pub struct TestWallet {
    pub addresses: u64,
    pub hashes: u64,
}

impl WalletContext for TestWallet {
    type Hash = u64;
    type Addr = u64;

    fn fresh_change_address(&mut self) -> u64 {
        self.addresses += 1;
        CHANGE_BASE + self.addresses
    }

    fn fresh_tx_hash(&mut self) -> u64 {
        self.hashes += 1;
        self.hashes
    }

    fn treasury_address(&self) -> u64 {
        TREASURY
    }
}

/// Random source replaying a scripted list of indexes.
pub struct Draws(pub Vec<usize>);

impl RandomSource for Draws {
    fn random_index(&mut self, upper: usize) -> usize {
        let index = self.0.remove(0);
        assert!(index < upper, "scripted draw out of bounds");
        index
    }
}

pub fn outpoint(txid: u64) -> OutPoint<u64> {
    OutPoint { txid, vout: 0 }
}

pub fn utxo(entries: &[(u64, Value)]) -> Utxo<u64, u64> {
    entries
        .iter()
        .map(|&(txid, value)| (outpoint(txid), TxOut { address: 1, value }))
        .collect()
}

pub fn pay(value: Value) -> Payment<u64> {
    Payment::new(ExpenseRegulation::SenderPaysFees, PAYEE, value)
}

pub fn zero_fee(_inputs: usize, _outputs: &[Value]) -> Value {
    0
}

pub fn flat_fee(fee: Value) -> impl Fn(usize, &[Value]) -> Value {
    move |_inputs: usize, _outputs: &[Value]| -> Value { fee }
}
