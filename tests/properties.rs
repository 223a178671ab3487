// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Properties of the counter that must hold for any call sequence.

use counter_forge::{ChainConfig, CounterClient, Session};
use proptest::prelude::*;

fn fresh() -> (Session, CounterClient) {
    let mut session = Session::ephemeral(ChainConfig {
        accounts: 2,
        genesis_timestamp: Some(0),
        ..ChainConfig::default()
    })
    .expect("valid config");
    let deployer = session.deployer();
    let counter = CounterClient::deploy(&mut session, deployer).expect("deploy");
    (session, counter)
}

/// Increments followed by decrements that never take the count below zero.
fn inc_then_dec() -> impl Strategy<Value = (Vec<u64>, Vec<u64>)> {
    prop::collection::vec(1u64..1_000, 0..12).prop_flat_map(|incs| {
        let total: u64 = incs.iter().sum();
        let decs = prop::collection::vec(1u64..=total.max(1), 0..12).prop_map(move |decs| {
            let mut left = total;
            decs.into_iter()
                .filter(|d| {
                    let keep = *d <= left;
                    if keep {
                        left -= d;
                    }
                    keep
                })
                .collect::<Vec<_>>()
        });
        (Just(incs), decs)
    })
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Inc,
    IncBy(u64),
    Dec,
    DecBy(u64),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Inc),
        (1u64..50).prop_map(Op::IncBy),
        Just(Op::Dec),
        (1u64..50).prop_map(Op::DecBy),
        Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn prop_inc_by_sets_value_and_emits_once(n in 1u64..=u64::MAX) {
        let (mut session, counter) = fresh();
        let owner = session.deployer();

        let receipt = counter.inc_by(&mut session, owner, n).expect("inc_by");

        prop_assert_eq!(counter.x(&session).expect("x"), n);
        let increments = counter.increments(&session, 0).expect("increments");
        prop_assert_eq!(increments.len(), 1);
        prop_assert_eq!(increments[0].args.by, n);
        prop_assert_eq!(increments[0].args.new_value, n);
        prop_assert_eq!(receipt.events.len(), 1);
    }

    #[test]
    fn prop_net_of_events_equals_value((incs, decs) in inc_then_dec()) {
        let (mut session, counter) = fresh();
        let owner = session.deployer();

        for by in &incs {
            counter.inc_by(&mut session, owner, *by).expect("inc_by");
        }
        for by in &decs {
            counter.dec_by(&mut session, owner, *by).expect("dec_by");
        }

        let added: u64 = counter.increments(&session, 0).expect("increments").iter().map(|e| e.args.by).sum();
        let removed: u64 = counter.decrements(&session, 0).expect("decrements").iter().map(|e| e.args.by).sum();
        prop_assert_eq!(added - removed, counter.x(&session).expect("x"));
    }

    #[test]
    fn prop_replay_matches_value_for_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
        let (mut session, counter) = fresh();
        let owner = session.deployer();
        let mut model: u64 = 0;

        for op in ops {
            let result = match op {
                Op::Inc => counter.inc(&mut session, owner),
                Op::IncBy(by) => counter.inc_by(&mut session, owner, by),
                Op::Dec => counter.dec(&mut session, owner),
                Op::DecBy(by) => counter.dec_by(&mut session, owner, by),
                Op::Reset => counter.reset(&mut session, owner),
            };
            let expected = match op {
                Op::Inc => model.checked_add(1),
                Op::IncBy(by) => model.checked_add(by),
                Op::Dec => model.checked_sub(1),
                Op::DecBy(by) => model.checked_sub(by),
                Op::Reset => Some(0),
            };
            match expected {
                Some(next) => {
                    prop_assert!(result.is_ok());
                    model = next;
                }
                None => prop_assert!(result.is_err()),
            }
        }

        prop_assert_eq!(counter.x(&session).expect("x"), model);
        prop_assert_eq!(counter.replay(&session).expect("replay"), model);
    }

    #[test]
    fn prop_non_owner_cannot_touch_restricted_state(data in ".{0,64}", start in 0u64..100) {
        let (mut session, counter) = fresh();
        let owner = session.deployer();
        let stranger = session.account(1).expect("account");

        if start > 0 {
            counter.inc_by(&mut session, owner, start).expect("inc_by");
        }
        let height = session.block_height();

        prop_assert!(counter.store_data(&mut session, stranger, &data).expect_err("store_data").is_unauthorized());
        prop_assert!(counter.transfer_ownership(&mut session, stranger, stranger).expect_err("transfer").is_unauthorized());
        prop_assert!(counter.reset(&mut session, stranger).expect_err("reset").is_unauthorized());

        prop_assert_eq!(counter.owner(&session).expect("owner"), owner);
        prop_assert_eq!(counter.x(&session).expect("x"), start);
        prop_assert_eq!(session.block_height(), height);
        prop_assert!(counter.data_stored(&session, 0).expect("data_stored").is_empty());
    }

    #[test]
    fn prop_owner_store_data_emits_one_timestamped_event(data in ".{0,64}") {
        let (mut session, counter) = fresh();
        let owner = session.deployer();

        counter.store_data(&mut session, owner, &data).expect("store_data");

        let events = counter.data_stored(&session, counter.deployed_at()).expect("data_stored");
        prop_assert_eq!(events.len(), 1);
        prop_assert!(events[0].args.timestamp > 0);
    }
}
