mod common;

use common::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use utxo_select::coin_selection::{
    select_inputs, LargestFirstCoinSelection, PrivacyMode, RandomCoinSelection,
    SingleMatchCoinSelection,
};
use utxo_select::{Error, ExpenseRegulation, Payment, TxOut, Utxo};

#[test]
fn covering_goal_but_not_fee_reports_the_slack() {
    let utxo = utxo(&[(1, 100)]);
    let mut wallet = TestWallet::default();
    let mut rng = StdRng::seed_from_u64(0);

    let err = select_inputs(
        &LargestFirstCoinSelection,
        &mut wallet,
        &mut rng,
        &flat_fee(10),
        utxo,
        &[pay(100)],
    )
    .unwrap_err();

    match err {
        Error::NeedsExtraInputsToCover(ExpenseRegulation::SenderPaysFees, txout) => {
            assert_eq!(txout.address, TREASURY);
            assert_eq!(txout.value, 10);
        }
        other => panic!("expected a slack report, got {:?}", other),
    }
}

#[test]
fn retrying_with_the_reported_slack_succeeds() {
    let utxo = utxo(&[(1, 100), (2, 20)]);
    let goals = vec![pay(100)];
    let estimator = flat_fee(10);
    let mut wallet = TestWallet::default();
    let mut rng = StdRng::seed_from_u64(0);

    let slack = match select_inputs(
        &LargestFirstCoinSelection,
        &mut wallet,
        &mut rng,
        &estimator,
        utxo.clone(),
        &goals,
    ) {
        Err(Error::NeedsExtraInputsToCover(regulation, txout)) => Payment {
            regulation,
            output: txout,
        },
        other => panic!("expected a slack report, got {:?}", other),
    };

    let mut retry_goals = goals;
    retry_goals.push(slack);
    let (tx, _) = select_inputs(
        &LargestFirstCoinSelection,
        &mut wallet,
        &mut rng,
        &estimator,
        utxo.clone(),
        &retry_goals,
    )
    .unwrap();

    // the slack goal pulled in the second entry, the treasury output itself
    // was filtered out, and the fee ended up folded into the real outputs
    assert_eq!(tx.inputs.len(), 2);
    assert_eq!(
        tx.outputs,
        vec![
            TxOut {
                address: PAYEE,
                value: 105
            },
            TxOut {
                address: CHANGE_BASE + 1,
                value: 15
            },
        ]
    );
    assert_eq!(tx.fee, 10);
    assert_eq!(
        utxo.restrict_to(&tx.inputs).balance(),
        tx.total_output()
    );
}

#[test]
fn multi_goal_stats_compose() {
    let utxo = utxo(&[(1, 100), (2, 80), (3, 30)]);
    let mut wallet = TestWallet::default();
    let mut rng = StdRng::seed_from_u64(0);

    let (tx, stats) = select_inputs(
        &LargestFirstCoinSelection,
        &mut wallet,
        &mut rng,
        &zero_fee,
        utxo,
        &[pay(90), pay(100)],
    )
    .unwrap();

    // goal one spends the 100 entry, goal two the 80 and 30 entries; the
    // histogram has a single bin at the total input count
    assert_eq!(tx.inputs.len(), 3);
    assert_eq!(stats.num_inputs.count(3), 1);
    assert_eq!(stats.ratios.count(10.0 / 90.0), 1);
    assert_eq!(stats.ratios.count(10.0 / 100.0), 1);
    assert_eq!(tx.total_output(), 210);
}

#[test]
fn aggregated_stats_keep_transactions_apart() {
    let mut wallet = TestWallet::default();
    let mut rng = StdRng::seed_from_u64(0);

    let (_, one_input) = select_inputs(
        &SingleMatchCoinSelection,
        &mut wallet,
        &mut rng,
        &zero_fee,
        utxo(&[(1, 50)]),
        &[pay(50)],
    )
    .unwrap();

    let (_, three_inputs) = select_inputs(
        &LargestFirstCoinSelection,
        &mut wallet,
        &mut rng,
        &zero_fee,
        utxo(&[(1, 40), (2, 30), (3, 30)]),
        &[pay(100)],
    )
    .unwrap();

    let aggregate = one_input.combine(three_inputs);
    assert_eq!(aggregate.num_inputs.count(1), 1);
    assert_eq!(aggregate.num_inputs.count(3), 1);
    assert_eq!(aggregate.num_inputs.count(4), 0);
}

#[test]
fn scripted_random_run_is_reproducible() {
    let utxo = utxo(&[(1, 60), (2, 80)]);
    let policy = RandomCoinSelection {
        privacy: PrivacyMode::On,
    };

    for _ in 0..2 {
        let mut wallet = TestWallet::default();
        let (tx, _) = select_inputs(
            &policy,
            &mut wallet,
            &mut Draws(vec![1]),
            &zero_fee,
            utxo.clone(),
            &[pay(50)],
        )
        .unwrap();
        assert_eq!(tx.inputs, vec![outpoint(2)].into_iter().collect());
        assert_eq!(tx.total_output(), 80);
    }
}

fn arb_utxo() -> impl Strategy<Value = Utxo<u64, u64>> {
    proptest::collection::vec(1u64..5_000, 1..16).prop_map(|values| {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| (outpoint(i as u64), TxOut { address: 1, value }))
            .collect()
    })
}

proptest! {
    #[test]
    fn largest_first_invariants(utxo in arb_utxo(), goal_value in 1u64..30_000) {
        let mut wallet = TestWallet::default();
        let mut rng = StdRng::seed_from_u64(0);

        match select_inputs(
            &LargestFirstCoinSelection,
            &mut wallet,
            &mut rng,
            &zero_fee,
            utxo.clone(),
            &[pay(goal_value)],
        ) {
            Ok((tx, stats)) => {
                let covered = utxo.restrict_to(&tx.inputs).balance();
                prop_assert!(covered >= tx.total_output());
                prop_assert!(tx.inputs.iter().all(|outpoint| utxo.contains(outpoint)));
                prop_assert!(tx.outputs.iter().all(|txout| txout.address != TREASURY));
                prop_assert_eq!(stats.num_inputs.count(tx.inputs.len()), 1);
                // change appears exactly when the selection overshoots
                if covered == goal_value {
                    prop_assert_eq!(tx.outputs.len(), 1);
                } else {
                    prop_assert_eq!(tx.outputs.len(), 2);
                }
            }
            Err(err) => {
                prop_assert_eq!(err, Error::InputSelectionFailure);
                prop_assert!(utxo.balance() < goal_value);
            }
        }
    }

    #[test]
    fn random_policy_invariants(
        utxo in arb_utxo(),
        goal_value in 1u64..30_000,
        seed in any::<u64>(),
        privacy in any::<bool>(),
    ) {
        let policy = RandomCoinSelection {
            privacy: if privacy { PrivacyMode::On } else { PrivacyMode::Off },
        };
        let mut wallet = TestWallet::default();
        let mut rng = StdRng::seed_from_u64(seed);

        match select_inputs(
            &policy,
            &mut wallet,
            &mut rng,
            &zero_fee,
            utxo.clone(),
            &[pay(goal_value)],
        ) {
            Ok((tx, _)) => {
                let covered = utxo.restrict_to(&tx.inputs).balance();
                prop_assert!(covered >= goal_value);
                prop_assert_eq!(covered, tx.total_output());
                prop_assert!(tx.inputs.iter().all(|outpoint| utxo.contains(outpoint)));
                prop_assert!(tx.outputs.iter().all(|txout| txout.address != TREASURY));
                if covered == goal_value {
                    prop_assert_eq!(tx.outputs.len(), 1);
                } else {
                    prop_assert_eq!(tx.outputs.len(), 2);
                }
            }
            Err(err) => {
                prop_assert_eq!(err, Error::InputSelectionFailure);
                prop_assert!(utxo.balance() < goal_value);
            }
        }
    }

    #[test]
    fn fee_is_covered_or_reported(
        utxo in arb_utxo(),
        goal_value in 1u64..20_000,
        fee in 0u64..500,
    ) {
        let mut wallet = TestWallet::default();
        let mut rng = StdRng::seed_from_u64(0);

        match select_inputs(
            &LargestFirstCoinSelection,
            &mut wallet,
            &mut rng,
            &flat_fee(fee),
            utxo.clone(),
            &[pay(goal_value)],
        ) {
            Ok((tx, _)) => {
                prop_assert!(utxo.restrict_to(&tx.inputs).balance() >= tx.total_output());
                prop_assert_eq!(tx.fee, fee);
            }
            Err(Error::InputSelectionFailure) => {
                prop_assert!(utxo.balance() < goal_value);
            }
            Err(Error::NeedsExtraInputsToCover(regulation, txout)) => {
                prop_assert_eq!(regulation, ExpenseRegulation::SenderPaysFees);
                prop_assert_eq!(txout.address, TREASURY);
                prop_assert!(txout.value > 0);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
