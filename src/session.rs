// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! An ephemeral, in-process chain hosting deployed contracts.
//!
//! Every successful state-changing operation is confirmed in its own block
//! before the call returns. A failing call is rolled back entirely: contract
//! state, events and block height are left as they were.

use std::collections::BTreeMap;

use rkyv::validation::validators::DefaultValidator;
use rkyv::{Archive, Deserialize, Infallible, Serialize};

use bytecheck::CheckBytes;

use crate::abi::{self, AbiSerializer, ContractEvent, Env};
use crate::address::Address;
use crate::config::ChainConfig;
use crate::contract::Contract;
use crate::error::{ContractError, Error, Result};
use crate::events::{DecodedEvent, Event, EventFilter, EventLog};
use crate::schema::ContractSchema;

/// A mined block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Height of the block, genesis being 0.
    pub height: u64,
    /// Block timestamp in seconds.
    pub timestamp: u64,
}

/// The outcome of a confirmed state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReceipt<R> {
    /// Value returned by the called function.
    pub data: R,
    /// Events emitted by the call, in emission order.
    pub events: Vec<Event>,
    /// Height of the block the call was confirmed in.
    pub block_height: u64,
}

impl<R> CallReceipt<R> {
    /// Decodes every emitted event with topic `E::TOPIC`.
    ///
    /// # Errors
    /// Fails if an event with that topic cannot be decoded.
    pub fn decode_events<E>(&self) -> Result<Vec<E>>
    where
        E: ContractEvent,
        E::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<E, Infallible>,
    {
        self.events
            .iter()
            .filter(|event| event.topic == E::TOPIC)
            .map(Event::decode::<E>)
            .collect()
    }
}

/// VM-like session with a set of derived accounts and no contracts.
#[derive(Debug)]
pub struct Session {
    config: ChainConfig,
    accounts: Vec<Address>,
    blocks: Vec<Block>,
    head: Block,
    contracts: BTreeMap<Address, Box<dyn Contract>>,
    log: EventLog,
    deploy_nonce: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_valid_config(ChainConfig::default())
    }
}

impl Session {
    /// Starts a fresh chain at genesis.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `config` is invalid.
    pub fn ephemeral(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ChainConfig) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let accounts = (0..config.accounts)
            .map(|index| Address::derive(&config.account_seed, index as u32))
            .collect();
        let genesis = Block {
            height: 0,
            timestamp: config.resolve_genesis_timestamp(),
        };

        tracing::debug!(chain_id = config.chain_id, accounts = config.accounts, "genesis");

        Self {
            config,
            accounts,
            blocks: vec![genesis],
            head: genesis,
            contracts: BTreeMap::new(),
            log: EventLog::default(),
            deploy_nonce: 0,
        }
    }

    /// The configuration the chain was started with.
    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Identifier of the chain.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Accounts available to sign calls, in derivation order.
    #[must_use]
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// Account at `index`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAccount`] if there is no such account.
    pub fn account(&self, index: usize) -> Result<Address> {
        self.accounts
            .get(index)
            .copied()
            .ok_or(Error::UnknownAccount(index))
    }

    /// The first account, used as the default deployer.
    #[must_use]
    pub fn deployer(&self) -> Address {
        self.accounts[0]
    }

    /// Height of the latest block.
    #[must_use]
    pub fn block_height(&self) -> u64 {
        self.latest_block().height
    }

    /// The latest block.
    #[must_use]
    pub fn latest_block(&self) -> Block {
        self.head
    }

    /// The block at `height`, if mined.
    #[must_use]
    pub fn block(&self, height: u64) -> Option<Block> {
        usize::try_from(height)
            .ok()
            .and_then(|index| self.blocks.get(index))
            .copied()
    }

    /// Whether a contract is deployed at `address`.
    #[must_use]
    pub fn is_deployed(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// Schema of the contract deployed at `contract`.
    ///
    /// # Errors
    /// Returns [`Error::ContractNotFound`] for an unknown address.
    pub fn schema(&self, contract: Address) -> Result<&'static ContractSchema> {
        self.contracts
            .get(&contract)
            .map(|instance| instance.schema())
            .ok_or(Error::ContractNotFound(contract))
    }

    fn mine(&mut self, block: Block) {
        self.blocks.push(block);
        self.head = block;
    }

    fn next_block(&self) -> Result<Block> {
        let latest = self.latest_block();
        let height = latest.height.checked_add(1);
        let timestamp = latest.timestamp.checked_add(self.config.block_time);

        match (height, timestamp) {
            (Some(height), Some(timestamp)) => Ok(Block { height, timestamp }),
            _ => Err(Error::Config(format!(
                "block {} at timestamp {} is the last the chain can mine",
                latest.height, latest.timestamp
            ))),
        }
    }

    /// Deploys the contract built by `constructor`, with `sender` as the
    /// deploying account. The deployment is confirmed in its own block.
    ///
    /// # Errors
    /// Returns [`Error::Revert`] if the constructor fails; nothing is mined.
    pub fn deploy<C, F>(&mut self, sender: Address, constructor: F) -> Result<Address>
    where
        C: Contract + 'static,
        F: FnOnce(&mut Env) -> std::result::Result<C, ContractError>,
    {
        let address = Address::contract(&sender, self.deploy_nonce);
        let block = self.next_block()?;
        let mut env = Env::new(sender, block.timestamp);

        let contract = constructor(&mut env).map_err(|source| {
            tracing::warn!(%sender, %source, "deployment reverted");
            Error::Revert {
                function: "init".to_string(),
                source,
            }
        })?;

        self.mine(block);
        self.log.append(address, block.height, env.into_events());
        self.contracts.insert(address, Box::new(contract));
        self.deploy_nonce += 1;

        tracing::debug!(%sender, %address, block = block.height, "contract deployed");
        Ok(address)
    }

    /// Sends a state-changing call from `sender` and waits for its
    /// confirmation.
    ///
    /// # Errors
    /// Returns [`Error::ContractNotFound`] for an unknown address,
    /// [`Error::Revert`] if the call fails, or [`Error::Codec`] if the return
    /// value cannot be decoded as `R`.
    pub fn transact<A, R>(
        &mut self,
        sender: Address,
        contract: Address,
        fn_name: &str,
        arg: &A,
    ) -> Result<CallReceipt<R>>
    where
        A: Serialize<AbiSerializer>,
        R: Archive,
        R::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<R, Infallible>,
    {
        let arg = abi::encode(arg).map_err(|err| Error::Codec(err.to_string()))?;
        let block = self.next_block()?;

        let instance = self
            .contracts
            .get_mut(&contract)
            .ok_or(Error::ContractNotFound(contract))?;
        let checkpoint = instance.snapshot();
        let mut env = Env::new(sender, block.timestamp);

        let output = match instance.call(&mut env, fn_name, &arg) {
            Ok(output) => output,
            Err(source) => {
                *instance = checkpoint;
                tracing::warn!(%sender, %contract, fn_name, %source, "call reverted");
                return Err(Error::Revert {
                    function: fn_name.to_string(),
                    source,
                });
            }
        };

        let data = match abi::decode::<R>(&output) {
            Ok(data) => data,
            Err(err) => {
                *instance = checkpoint;
                return Err(Error::Codec(err.to_string()));
            }
        };

        self.mine(block);
        let events = self.log.append(contract, block.height, env.into_events());

        tracing::debug!(
            %sender,
            %contract,
            fn_name,
            block = block.height,
            events = events.len(),
            "call confirmed"
        );

        Ok(CallReceipt {
            data,
            events,
            block_height: block.height,
        })
    }

    /// Runs a read-only call against the latest state.
    ///
    /// The call executes on a scratch copy of the contract: nothing it does
    /// is persisted, logged or mined.
    ///
    /// # Errors
    /// Returns [`Error::ContractNotFound`] for an unknown address,
    /// [`Error::Revert`] if the function fails, or [`Error::Codec`] on
    /// argument or return value encoding failures.
    pub fn query<A, R>(&self, contract: Address, fn_name: &str, arg: &A) -> Result<R>
    where
        A: Serialize<AbiSerializer>,
        R: Archive,
        R::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<R, Infallible>,
    {
        let arg = abi::encode(arg).map_err(|err| Error::Codec(err.to_string()))?;
        let latest = self.latest_block();

        let mut scratch = self
            .contracts
            .get(&contract)
            .ok_or(Error::ContractNotFound(contract))?
            .snapshot();
        let mut env = Env::new(Address::ZERO, latest.timestamp);

        let output = scratch
            .call(&mut env, fn_name, &arg)
            .map_err(|source| Error::Revert {
                function: fn_name.to_string(),
                source,
            })?;

        tracing::trace!(%contract, fn_name, "query");
        abi::decode::<R>(&output).map_err(|err| Error::Codec(err.to_string()))
    }

    /// Decoded events of type `E` passing `filter`, in log order.
    ///
    /// The filter's topic is replaced by `E::TOPIC`.
    ///
    /// # Errors
    /// With a strict filter, fails with [`Error::EventDecode`] on the first
    /// undecodable event.
    pub fn events<E>(&self, filter: &EventFilter) -> Result<Vec<DecodedEvent<E>>>
    where
        E: ContractEvent,
        E::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<E, Infallible>,
    {
        self.log.decoded(filter)
    }

    /// Raw logged events passing `filter`, in log order.
    pub fn logs<'a>(&'a self, filter: &'a EventFilter) -> impl Iterator<Item = &'a Event> + 'a {
        self.log.matching(filter)
    }

    /// Total number of events logged since genesis.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}
