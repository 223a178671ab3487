// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The Counter contract.
//!
//! A counter with an owner:
//! - anyone may increment or decrement it
//! - only the owner may reset it, store data, or hand over ownership
//! - every change of the count is announced with an event

use bytecheck::CheckBytes;
use rkyv::{Archive, Deserialize, Serialize};

use crate::abi::{self, ContractEvent, Env};
use crate::address::Address;
use crate::contract::Contract;
use crate::error::ContractError;
use crate::schema::{ContractSchema, EventSchema, FunctionSchema};

/// Emitted when the counter is incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize)]
#[archive_attr(derive(CheckBytes))]
pub struct Increment {
    /// Amount added.
    pub by: u64,
    /// Count after the increment.
    pub new_value: u64,
}

impl ContractEvent for Increment {
    const TOPIC: &'static str = "Increment";
}

/// Emitted when the counter is decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize)]
#[archive_attr(derive(CheckBytes))]
pub struct Decrement {
    /// Amount subtracted.
    pub by: u64,
    /// Count after the decrement.
    pub new_value: u64,
}

impl ContractEvent for Decrement {
    const TOPIC: &'static str = "Decrement";
}

/// Emitted when the owner resets the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize)]
#[archive_attr(derive(CheckBytes))]
pub struct Reset {
    /// Count before the reset.
    pub previous: u64,
}

impl ContractEvent for Reset {
    const TOPIC: &'static str = "Reset";
}

/// Emitted when the owner stores data.
///
/// The data itself is not logged, only its digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize)]
#[archive_attr(derive(CheckBytes))]
pub struct DataStored {
    /// BLAKE3 digest of the stored data.
    pub data: [u8; 32],
    /// Timestamp of the block the data was stored in.
    pub timestamp: u64,
}

impl DataStored {
    /// Digest under which `data` is logged.
    #[must_use]
    pub fn digest(data: &str) -> [u8; 32] {
        *blake3::hash(data.as_bytes()).as_bytes()
    }
}

impl ContractEvent for DataStored {
    const TOPIC: &'static str = "DataStored";
}

/// Emitted when ownership changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize)]
#[archive_attr(derive(CheckBytes))]
pub struct OwnershipTransferred {
    /// Owner before the transfer.
    pub previous_owner: Address,
    /// Owner after the transfer.
    pub new_owner: Address,
}

impl ContractEvent for OwnershipTransferred {
    const TOPIC: &'static str = "OwnershipTransferred";
}

const fn read(name: &'static str, doc: &'static str, output: &'static str) -> FunctionSchema {
    FunctionSchema {
        name,
        doc,
        input: "()",
        output,
        restricted: false,
        mutates: false,
    }
}

const fn write(
    name: &'static str,
    doc: &'static str,
    input: &'static str,
    restricted: bool,
) -> FunctionSchema {
    FunctionSchema {
        name,
        doc,
        input,
        output: "()",
        restricted,
        mutates: true,
    }
}

/// Schema of the [`Counter`] contract.
pub const SCHEMA: ContractSchema = ContractSchema {
    name: "Counter",
    functions: &[
        read("x", "Returns the current count.", "u64"),
        read("owner", "Returns the current owner.", "Address"),
        write("inc", "Increments the counter by one.", "()", false),
        write("inc_by", "Increments the counter by a positive amount.", "u64", false),
        write("dec", "Decrements the counter by one.", "()", false),
        write("dec_by", "Decrements the counter by a positive amount.", "u64", false),
        write("reset", "Sets the counter back to zero.", "()", true),
        write("store_data", "Logs the digest of a string.", "String", true),
        write(
            "transfer_ownership",
            "Hands ownership to another account.",
            "Address",
            true,
        ),
    ],
    events: &[
        EventSchema {
            topic: Increment::TOPIC,
            data: "Increment",
        },
        EventSchema {
            topic: Decrement::TOPIC,
            data: "Decrement",
        },
        EventSchema {
            topic: Reset::TOPIC,
            data: "Reset",
        },
        EventSchema {
            topic: DataStored::TOPIC,
            data: "DataStored",
        },
        EventSchema {
            topic: OwnershipTransferred::TOPIC,
            data: "OwnershipTransferred",
        },
    ],
};

/// Counter contract state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    /// Current count value.
    x: u64,
    /// Account allowed to call restricted functions.
    owner: Address,
}

impl Counter {
    /// Initializes a counter at zero, owned by the deploying account.
    #[must_use]
    pub fn new(env: &Env) -> Self {
        Self {
            x: 0,
            owner: env.caller(),
        }
    }

    /// Get the current count.
    #[must_use]
    pub fn x(&self) -> u64 {
        self.x
    }

    /// Get the current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Increment the counter by one.
    ///
    /// # Errors
    /// Reverts on overflow.
    pub fn inc(&mut self, env: &mut Env) -> Result<(), ContractError> {
        self.add(env, 1)
    }

    /// Increment the counter by `by`, which must be positive.
    ///
    /// # Errors
    /// Reverts if `by` is zero or on overflow.
    pub fn inc_by(&mut self, env: &mut Env, by: u64) -> Result<(), ContractError> {
        if by == 0 {
            return Err(ContractError::InvalidArgument(
                "inc_by: increment should be positive".to_string(),
            ));
        }
        self.add(env, by)
    }

    /// Decrement the counter by one.
    ///
    /// # Errors
    /// Reverts on underflow.
    pub fn dec(&mut self, env: &mut Env) -> Result<(), ContractError> {
        self.sub(env, 1)
    }

    /// Decrement the counter by `by`, which must be positive.
    ///
    /// # Errors
    /// Reverts if `by` is zero or on underflow.
    pub fn dec_by(&mut self, env: &mut Env, by: u64) -> Result<(), ContractError> {
        if by == 0 {
            return Err(ContractError::InvalidArgument(
                "dec_by: decrement should be positive".to_string(),
            ));
        }
        self.sub(env, by)
    }

    /// Set the counter back to zero.
    ///
    /// # Errors
    /// Reverts unless called by the owner.
    pub fn reset(&mut self, env: &mut Env) -> Result<(), ContractError> {
        self.only_owner(env)?;
        let previous = self.x;
        self.x = 0;
        env.emit(&Reset { previous })
    }

    /// Log the digest of `data` along with the block timestamp.
    ///
    /// # Errors
    /// Reverts unless called by the owner.
    pub fn store_data(&mut self, env: &mut Env, data: &str) -> Result<(), ContractError> {
        self.only_owner(env)?;
        env.emit(&DataStored {
            data: DataStored::digest(data),
            timestamp: env.timestamp(),
        })
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    /// Reverts unless called by the owner.
    pub fn transfer_ownership(
        &mut self,
        env: &mut Env,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        self.only_owner(env)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        env.emit(&OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    fn add(&mut self, env: &mut Env, by: u64) -> Result<(), ContractError> {
        self.x = self
            .x
            .checked_add(by)
            .ok_or(ContractError::Arithmetic("overflow"))?;
        env.emit(&Increment {
            by,
            new_value: self.x,
        })
    }

    fn sub(&mut self, env: &mut Env, by: u64) -> Result<(), ContractError> {
        self.x = self
            .x
            .checked_sub(by)
            .ok_or(ContractError::Arithmetic("underflow"))?;
        env.emit(&Decrement {
            by,
            new_value: self.x,
        })
    }

    fn only_owner(&self, env: &Env) -> Result<(), ContractError> {
        if env.caller() == self.owner {
            Ok(())
        } else {
            Err(ContractError::Unauthorized {
                caller: env.caller(),
            })
        }
    }
}

impl Contract for Counter {
    fn call(&mut self, env: &mut Env, fn_name: &str, arg: &[u8]) -> Result<Vec<u8>, ContractError> {
        match fn_name {
            "x" => abi::handle(arg, |()| Ok(self.x())),
            "owner" => abi::handle(arg, |()| Ok(self.owner())),
            "inc" => abi::handle(arg, |()| self.inc(env)),
            "inc_by" => abi::handle(arg, |by: u64| self.inc_by(env, by)),
            "dec" => abi::handle(arg, |()| self.dec(env)),
            "dec_by" => abi::handle(arg, |by: u64| self.dec_by(env, by)),
            "reset" => abi::handle(arg, |()| self.reset(env)),
            "store_data" => abi::handle(arg, |data: String| self.store_data(env, &data)),
            "transfer_ownership" => {
                abi::handle(arg, |new_owner: Address| self.transfer_ownership(env, new_owner))
            }
            _ => Err(ContractError::UnknownFunction(fn_name.to_string())),
        }
    }

    fn snapshot(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }

    fn schema(&self) -> &'static ContractSchema {
        &SCHEMA
    }
}
