// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! A Counter smart contract hosted on an ephemeral, in-process chain.
//!
//! ```
//! use counter_forge::{CounterClient, Session};
//!
//! let mut session = Session::default();
//! let owner = session.deployer();
//! let counter = CounterClient::deploy(&mut session, owner).unwrap();
//!
//! counter.inc_by(&mut session, owner, 5).unwrap();
//! assert_eq!(counter.x(&session).unwrap(), 5);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unused_must_use)]
#![deny(unused_extern_crates)]
#![warn(missing_debug_implementations, unreachable_pub, rustdoc::all)]

/// Encoding of arguments, return values and events, and the call context.
pub mod abi;
/// Account and contract addresses.
pub mod address;
/// Typed handle to a deployed counter.
pub mod client;
/// Chain configuration.
pub mod config;
/// The contract interface.
pub mod contract;
/// The Counter contract.
pub mod counter;
/// Error types.
pub mod error;
/// Event log and filters.
pub mod events;
/// Contract schema types and utilities.
pub mod schema;
/// The ephemeral chain.
pub mod session;

pub use address::Address;
pub use client::CounterClient;
pub use config::ChainConfig;
pub use contract::Contract;
pub use counter::{Counter, DataStored, Decrement, Increment, OwnershipTransferred, Reset};
pub use error::{ContractError, Error, Result};
pub use events::{DecodedEvent, Event, EventFilter};
pub use session::{Block, CallReceipt, Session};
