// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Typed access to a deployed [`Counter`].

use crate::address::Address;
use crate::counter::{Counter, DataStored, Decrement, Increment, OwnershipTransferred, Reset};
use crate::error::Result;
use crate::events::{DecodedEvent, EventFilter};
use crate::session::{CallReceipt, Session};

/// Handle to a Counter deployed in a [`Session`].
///
/// Write methods take the sending account; reads run against the latest
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterClient {
    address: Address,
    deployed_at: u64,
}

impl CounterClient {
    /// Deploys a fresh Counter owned by `sender`.
    ///
    /// # Errors
    /// Propagates deployment failures.
    pub fn deploy(session: &mut Session, sender: Address) -> Result<Self> {
        let address = session.deploy(sender, |env| Ok(Counter::new(env)))?;
        Ok(Self {
            address,
            deployed_at: session.block_height(),
        })
    }

    /// Address of the contract.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Height of the block the contract was deployed in.
    #[must_use]
    pub fn deployed_at(&self) -> u64 {
        self.deployed_at
    }

    /// Current count.
    ///
    /// # Errors
    /// Propagates query failures.
    pub fn x(&self, session: &Session) -> Result<u64> {
        session.query(self.address, "x", &())
    }

    /// Current owner.
    ///
    /// # Errors
    /// Propagates query failures.
    pub fn owner(&self, session: &Session) -> Result<Address> {
        session.query(self.address, "owner", &())
    }

    /// Increments by one.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn inc(&self, session: &mut Session, sender: Address) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "inc", &())
    }

    /// Increments by `by`.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn inc_by(&self, session: &mut Session, sender: Address, by: u64) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "inc_by", &by)
    }

    /// Decrements by one.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn dec(&self, session: &mut Session, sender: Address) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "dec", &())
    }

    /// Decrements by `by`.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn dec_by(&self, session: &mut Session, sender: Address, by: u64) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "dec_by", &by)
    }

    /// Resets the count to zero. Owner only.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn reset(&self, session: &mut Session, sender: Address) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "reset", &())
    }

    /// Stores `data`. Owner only.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn store_data(
        &self,
        session: &mut Session,
        sender: Address,
        data: &str,
    ) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "store_data", &data.to_string())
    }

    /// Hands ownership to `new_owner`. Owner only.
    ///
    /// # Errors
    /// Propagates reverts.
    pub fn transfer_ownership(
        &self,
        session: &mut Session,
        sender: Address,
        new_owner: Address,
    ) -> Result<CallReceipt<()>> {
        session.transact(sender, self.address, "transfer_ownership", &new_owner)
    }

    /// A strict filter over this contract's events from `from_block` on.
    #[must_use]
    pub fn filter(&self, from_block: u64) -> EventFilter {
        EventFilter::new(self.address).from_block(from_block)
    }

    /// `Increment` events logged from `from_block` on.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn increments(&self, session: &Session, from_block: u64) -> Result<Vec<DecodedEvent<Increment>>> {
        session.events(&self.filter(from_block))
    }

    /// `Decrement` events logged from `from_block` on.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn decrements(&self, session: &Session, from_block: u64) -> Result<Vec<DecodedEvent<Decrement>>> {
        session.events(&self.filter(from_block))
    }

    /// `Reset` events logged from `from_block` on.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn resets(&self, session: &Session, from_block: u64) -> Result<Vec<DecodedEvent<Reset>>> {
        session.events(&self.filter(from_block))
    }

    /// `DataStored` events logged from `from_block` on.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn data_stored(&self, session: &Session, from_block: u64) -> Result<Vec<DecodedEvent<DataStored>>> {
        session.events(&self.filter(from_block))
    }

    /// `OwnershipTransferred` events logged from `from_block` on.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn ownership_transfers(
        &self,
        session: &Session,
        from_block: u64,
    ) -> Result<Vec<DecodedEvent<OwnershipTransferred>>> {
        session.events(&self.filter(from_block))
    }

    /// Recomputes the count from the event log: increments minus decrements,
    /// restarting after the most recent reset.
    ///
    /// # Errors
    /// Fails if a logged event cannot be decoded.
    pub fn replay(&self, session: &Session) -> Result<u64> {
        let from = self.deployed_at;
        let last_reset = self
            .resets(session, from)?
            .last()
            .map_or(0, |reset| reset.log_index + 1);

        let mut total: u64 = 0;
        for event in self.increments(session, from)? {
            if event.log_index >= last_reset {
                total = total.wrapping_add(event.args.by);
            }
        }
        for event in self.decrements(session, from)? {
            if event.log_index >= last_reset {
                total = total.wrapping_sub(event.args.by);
            }
        }
        Ok(total)
    }
}
