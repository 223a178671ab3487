// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The session's event log and how to query it.

use rkyv::validation::validators::DefaultValidator;
use rkyv::{Deserialize, Infallible};

use bytecheck::CheckBytes;

use crate::abi::{self, ContractEvent};
use crate::address::Address;
use crate::error::{Error, Result};

/// An event recorded in a mined block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Contract that emitted the event.
    pub source: Address,
    /// Event topic.
    pub topic: String,
    /// Archived event payload.
    pub data: Vec<u8>,
    /// Height of the block containing the event.
    pub block_height: u64,
    /// Position of the event in the session log.
    pub log_index: u64,
}

impl Event {
    /// Decodes the payload as `E`.
    ///
    /// # Errors
    /// Returns [`Error::EventDecode`] if the topic differs from `E::TOPIC` or
    /// the payload is not a valid archive of `E`.
    pub fn decode<E>(&self) -> Result<E>
    where
        E: ContractEvent,
        E::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<E, Infallible>,
    {
        if self.topic != E::TOPIC {
            return Err(self.decode_error(format!("expected topic '{}'", E::TOPIC)));
        }
        abi::decode(&self.data).map_err(|err| self.decode_error(err.to_string()))
    }

    fn decode_error(&self, reason: String) -> Error {
        Error::EventDecode {
            topic: self.topic.clone(),
            log_index: self.log_index,
            reason,
        }
    }
}

/// A decoded event together with where it was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent<E> {
    /// The event arguments.
    pub args: E,
    /// Height of the block containing the event.
    pub block_height: u64,
    /// Position of the event in the session log.
    pub log_index: u64,
}

/// Selects events from the session log.
///
/// Filters always target one contract. The block range is inclusive on both
/// ends and open-ended unless [`to_block`](Self::to_block) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Contract whose events are selected.
    pub address: Address,
    /// Topic to select, or every topic when `None`.
    pub topic: Option<String>,
    /// First block to include.
    pub from_block: u64,
    /// Last block to include.
    pub to_block: Option<u64>,
    /// Whether an undecodable event fails the query instead of being
    /// skipped.
    pub strict: bool,
}

impl EventFilter {
    /// Selects every event of `address`, strictly decoded.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            topic: None,
            from_block: 0,
            to_block: None,
            strict: true,
        }
    }

    /// Restricts the filter to one topic.
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the first block to include.
    #[must_use]
    pub fn from_block(mut self, height: u64) -> Self {
        self.from_block = height;
        self
    }

    /// Sets the last block to include.
    #[must_use]
    pub fn to_block(mut self, height: u64) -> Self {
        self.to_block = Some(height);
        self
    }

    /// Sets whether decoding failures are errors.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether `event` passes the address, topic and block range checks.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        event.source == self.address
            && self.topic.as_deref().map_or(true, |t| t == event.topic)
            && event.block_height >= self.from_block
            && self.to_block.map_or(true, |to| event.block_height <= to)
    }
}

/// Append-only record of every event logged in a session.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Appends events emitted by `source` in the block at `block_height`.
    pub fn append(
        &mut self,
        source: Address,
        block_height: u64,
        emitted: impl IntoIterator<Item = abi::EmittedEvent>,
    ) -> Vec<Event> {
        let first = self.events.len();
        for event in emitted {
            let log_index = self.events.len() as u64;
            self.events.push(Event {
                source,
                topic: event.topic.to_string(),
                data: event.data,
                block_height,
                log_index,
            });
        }
        self.events[first..].to_vec()
    }

    /// Events passing `filter`, in log order.
    pub fn matching<'a>(&'a self, filter: &'a EventFilter) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |event| filter.matches(event))
    }

    /// Decodes the events passing `filter` restricted to `E::TOPIC`.
    ///
    /// # Errors
    /// With a strict filter, the first undecodable event fails the query.
    pub fn decoded<E>(&self, filter: &EventFilter) -> Result<Vec<DecodedEvent<E>>>
    where
        E: ContractEvent,
        E::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<E, Infallible>,
    {
        let filter = filter.clone().topic(E::TOPIC);
        let mut decoded = Vec::new();

        for event in self.matching(&filter) {
            match event.decode::<E>() {
                Ok(args) => decoded.push(DecodedEvent {
                    args,
                    block_height: event.block_height,
                    log_index: event.log_index,
                }),
                Err(err) if filter.strict => return Err(err),
                Err(err) => tracing::debug!(%err, "skipping undecodable event"),
            }
        }

        Ok(decoded)
    }

    /// Number of logged events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
