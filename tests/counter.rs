// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Counter contract scenarios against an ephemeral session.
//!
//! Each test deploys its own counter, so no state is shared between cases.

use counter_forge::{
    Address, ChainConfig, CounterClient, DataStored, Decrement, EventFilter, Increment,
    OwnershipTransferred, Session,
};

struct TestHarness {
    session: Session,
    counter: CounterClient,
    deployer: Address,
    others: [Address; 2],
}

fn deploy_counter() -> TestHarness {
    let mut session = Session::ephemeral(ChainConfig {
        accounts: 3,
        ..ChainConfig::default()
    })
    .expect("creating ephemeral session should succeed");

    let deployer = session.deployer();
    let others = [
        session.account(1).expect("second account"),
        session.account(2).expect("third account"),
    ];
    let counter =
        CounterClient::deploy(&mut session, deployer).expect("deploying counter should succeed");

    TestHarness {
        session,
        counter,
        deployer,
        others,
    }
}

#[test]
fn inc_emits_increment_event() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();

    let receipt = counter
        .inc(&mut session, deployer)
        .expect("inc call should succeed");

    assert_eq!(
        receipt
            .decode_events::<Increment>()
            .expect("decoding should succeed"),
        [Increment { by: 1, new_value: 1 }]
    );
}

#[test]
fn sum_of_increments_matches_current_value() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();
    let deployment_block = session.block_height();

    for i in 1..=10 {
        counter
            .inc_by(&mut session, deployer, i)
            .expect("inc_by call should succeed");
    }

    let events = session
        .events::<Increment>(&EventFilter::new(counter.address()).from_block(deployment_block))
        .expect("strict query should succeed");

    let total: u64 = events.iter().map(|event| event.args.by).sum();
    assert_eq!(total, 55);
    assert_eq!(total, counter.x(&session).expect("x"));
}

#[test]
fn dec_emits_decrement_event() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();

    counter
        .inc(&mut session, deployer)
        .expect("inc call should succeed");
    let receipt = counter
        .dec(&mut session, deployer)
        .expect("dec call should succeed");

    assert_eq!(
        receipt
            .decode_events::<Decrement>()
            .expect("decoding should succeed"),
        [Decrement { by: 1, new_value: 0 }]
    );
}

#[test]
fn value_reflects_increments_and_decrements() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();
    let deployment_block = session.block_height();

    for i in 1..=5 {
        counter
            .inc_by(&mut session, deployer, i)
            .expect("inc_by call should succeed");
    }
    for i in 1..=3 {
        counter
            .dec_by(&mut session, deployer, i)
            .expect("dec_by call should succeed");
    }

    let increments = counter
        .increments(&session, deployment_block)
        .expect("increments");
    let decrements = counter
        .decrements(&session, deployment_block)
        .expect("decrements");

    let net = increments.iter().map(|e| e.args.by).sum::<u64>()
        - decrements.iter().map(|e| e.args.by).sum::<u64>();
    assert_eq!(net, 9);
    assert_eq!(net, counter.x(&session).expect("x"));
    assert_eq!(counter.replay(&session).expect("replay"), 9);
}

#[test]
fn deployer_is_owner() {
    let TestHarness {
        session,
        counter,
        deployer,
        ..
    } = deploy_counter();

    let owner = counter.owner(&session).expect("owner");
    assert_eq!(
        owner.to_string().to_lowercase(),
        deployer.to_string().to_lowercase()
    );
}

#[test]
fn owner_store_data_emits_data_stored() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();
    let deployment_block = session.block_height();

    counter
        .store_data(&mut session, deployer, "test data")
        .expect("store_data call should succeed");

    let events = counter
        .data_stored(&session, deployment_block)
        .expect("strict query should succeed");

    assert_eq!(events.len(), 1);
    assert!(events[0].args.timestamp > 0);
    assert_eq!(events[0].args.data, DataStored::digest("test data"));
    assert_eq!(
        session.block(events[0].block_height).map(|b| b.timestamp),
        Some(events[0].args.timestamp)
    );
}

#[test]
fn non_owner_store_data_reverts() {
    let TestHarness {
        mut session,
        counter,
        others: [non_owner, _],
        ..
    } = deploy_counter();

    let err = counter
        .store_data(&mut session, non_owner, "test data")
        .expect_err("non-owner store_data should revert");

    let message = err.to_string();
    assert!(message.contains("Unauthorized") || message.contains("revert"));
    assert!(err.is_unauthorized());
    assert!(counter
        .data_stored(&session, 0)
        .expect("query")
        .is_empty());
}

#[test]
fn owner_reset_zeroes_counter() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        ..
    } = deploy_counter();

    counter.inc(&mut session, deployer).expect("inc");
    counter.inc_by(&mut session, deployer, 5).expect("inc_by");
    assert_eq!(counter.x(&session).expect("x"), 6);

    counter.reset(&mut session, deployer).expect("reset");
    assert_eq!(counter.x(&session).expect("x"), 0);
    assert_eq!(counter.replay(&session).expect("replay"), 0);
}

#[test]
fn non_owner_reset_reverts() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        others: [non_owner, _],
    } = deploy_counter();

    counter.inc_by(&mut session, deployer, 3).expect("inc_by");
    let err = counter
        .reset(&mut session, non_owner)
        .expect_err("non-owner reset should revert");

    assert!(err.is_unauthorized());
    assert_eq!(counter.x(&session).expect("x"), 3);
}

#[test]
fn owner_transfers_ownership() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        others: [new_owner, _],
    } = deploy_counter();

    assert_eq!(counter.owner(&session).expect("owner"), deployer);

    let receipt = counter
        .transfer_ownership(&mut session, deployer, new_owner)
        .expect("transfer_ownership call should succeed");

    assert_eq!(counter.owner(&session).expect("owner"), new_owner);
    assert_eq!(
        receipt
            .decode_events::<OwnershipTransferred>()
            .expect("decode"),
        [OwnershipTransferred {
            previous_owner: deployer,
            new_owner,
        }]
    );

    // the previous owner is now an ordinary account
    let err = counter
        .store_data(&mut session, deployer, "stale")
        .expect_err("previous owner should be rejected");
    assert!(err.is_unauthorized());
    counter
        .store_data(&mut session, new_owner, "fresh")
        .expect("new owner may store data");
}

#[test]
fn non_owner_transfer_ownership_reverts() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        others: [non_owner, another],
    } = deploy_counter();

    let err = counter
        .transfer_ownership(&mut session, non_owner, another)
        .expect_err("non-owner transfer should revert");

    let message = err.to_string();
    assert!(message.contains("Unauthorized") || message.contains("revert"));
    assert_eq!(counter.owner(&session).expect("owner"), deployer);
}

#[test]
fn reverted_calls_leave_chain_untouched() {
    let TestHarness {
        mut session,
        counter,
        deployer,
        others: [non_owner, _],
    } = deploy_counter();

    counter.inc(&mut session, deployer).expect("inc");
    let height = session.block_height();

    assert!(counter.dec_by(&mut session, deployer, 2).is_err());
    assert!(counter.inc_by(&mut session, deployer, 0).is_err());
    assert!(counter
        .transfer_ownership(&mut session, non_owner, non_owner)
        .is_err());

    assert_eq!(session.block_height(), height);
    assert_eq!(counter.x(&session).expect("x"), 1);
    assert_eq!(counter.owner(&session).expect("owner"), deployer);
    assert_eq!(
        session
            .logs(&EventFilter::new(counter.address()))
            .count(),
        1
    );
}

#[test]
fn each_deployment_is_isolated() {
    let mut first = deploy_counter();
    let second = deploy_counter();

    first
        .counter
        .inc_by(&mut first.session, first.deployer, 4)
        .expect("inc_by");

    assert_eq!(first.counter.x(&first.session).expect("x"), 4);
    assert_eq!(second.counter.x(&second.session).expect("x"), 0);
}
