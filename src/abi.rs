// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Contract calling convention.
//!
//! Arguments, return values and event payloads cross the contract boundary
//! as rkyv archives. Decoding always validates the archive first, so bytes
//! that do not match the expected type are rejected instead of read.

use rkyv::ser::serializers::AllocSerializer;
use rkyv::validation::validators::DefaultValidator;
use rkyv::{check_archived_root, AlignedVec, Archive, Deserialize, Infallible, Serialize};

use bytecheck::CheckBytes;

use crate::address::Address;
use crate::error::ContractError;

/// Scratch space reserved by the serializer before it spills to the heap.
pub const SCRATCH_SPACE: usize = 256;

/// Serializer used for every value crossing the contract boundary.
pub type AbiSerializer = AllocSerializer<SCRATCH_SPACE>;

/// Encodes a value into its archived byte representation.
///
/// # Errors
/// Returns [`ContractError::Codec`] if serialization fails.
pub fn encode<T>(value: &T) -> Result<Vec<u8>, ContractError>
where
    T: Serialize<AbiSerializer>,
{
    rkyv::to_bytes::<_, SCRATCH_SPACE>(value)
        .map(|bytes| bytes.to_vec())
        .map_err(|err| ContractError::Codec(err.to_string()))
}

/// Validates and decodes an archived value.
///
/// # Errors
/// Returns [`ContractError::Codec`] if `bytes` is not a valid archive of `T`.
pub fn decode<T>(bytes: &[u8]) -> Result<T, ContractError>
where
    T: Archive,
    T::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<T, Infallible>,
{
    // a zero-sized root accounts for no bytes, so anything left over is a
    // value of some other type
    if core::mem::size_of::<T::Archived>() == 0 && !bytes.is_empty() {
        return Err(ContractError::Codec(format!(
            "{} trailing bytes for a value of {}",
            bytes.len(),
            core::any::type_name::<T>()
        )));
    }

    // archives must be read from an aligned buffer
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    let archived = check_archived_root::<T>(aligned.as_slice()).map_err(|_| {
        ContractError::Codec(format!(
            "bytes are not a valid archive of {}",
            core::any::type_name::<T>()
        ))
    })?;

    archived
        .deserialize(&mut Infallible)
        .map_err(|_| ContractError::Codec("infallible deserializer failed".to_string()))
}

/// Decodes the argument, runs the handler and encodes its return value.
///
/// This is how contracts map an exported function name onto a typed method.
///
/// # Errors
/// Propagates decoding failures and whatever the handler returns.
pub fn handle<A, R, F>(arg: &[u8], f: F) -> Result<Vec<u8>, ContractError>
where
    A: Archive,
    A::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<A, Infallible>,
    R: Serialize<AbiSerializer>,
    F: FnOnce(A) -> Result<R, ContractError>,
{
    let arg = decode::<A>(arg)?;
    let ret = f(arg)?;
    encode(&ret)
}

/// A typed event a contract can emit.
pub trait ContractEvent: Archive + Serialize<AbiSerializer> + Sized {
    /// Topic under which the event is logged.
    const TOPIC: &'static str;
}

/// An event emitted during a call, before the session assigns it a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    /// Event topic.
    pub topic: &'static str,
    /// Archived event payload.
    pub data: Vec<u8>,
}

/// Execution context handed to a contract for the duration of one call.
#[derive(Debug)]
pub struct Env {
    caller: Address,
    timestamp: u64,
    events: Vec<EmittedEvent>,
}

impl Env {
    /// Creates the context for a call made by `caller` in a block with the
    /// given `timestamp`.
    #[must_use]
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self {
            caller,
            timestamp,
            events: Vec::new(),
        }
    }

    /// Account that made the call.
    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Timestamp, in seconds, of the block the call executes in.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Emits an event under its topic.
    ///
    /// # Errors
    /// Returns [`ContractError::Codec`] if the event cannot be archived.
    pub fn emit<E: ContractEvent>(&mut self, event: &E) -> Result<(), ContractError> {
        let data = encode(event)?;
        self.events.push(EmittedEvent {
            topic: E::TOPIC,
            data,
        });
        Ok(())
    }

    /// Events emitted so far, in emission order.
    #[must_use]
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    /// Consumes the context and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<EmittedEvent> {
        self.events
    }
}
