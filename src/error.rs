// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Error types for contract execution and the hosting session.

use std::path::PathBuf;

use thiserror::Error;

use crate::address::Address;

/// Result alias used throughout the session API.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure raised from inside a contract call.
///
/// Any of these aborts the call: the session rolls the contract back to its
/// pre-call state and discards events emitted during the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A restricted function was called by an account other than the owner.
    #[error("Unauthorized({caller})")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// An argument was rejected by the contract.
    #[error("{0}")]
    InvalidArgument(String),

    /// Checked arithmetic failed.
    #[error("arithmetic {0}")]
    Arithmetic(&'static str),

    /// The contract does not export the called function.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Argument or return bytes could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),
}

impl ContractError {
    /// Returns `true` for access-control failures.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Errors surfaced by a [`Session`](crate::session::Session).
#[derive(Debug, Error)]
pub enum Error {
    /// A state-changing call failed and was rolled back.
    #[error("execution reverted in '{function}': {source}")]
    Revert {
        /// Name of the called function.
        function: String,
        /// The contract-level failure.
        #[source]
        source: ContractError,
    },

    /// No contract is deployed at the given address.
    #[error("no contract deployed at {0}")]
    ContractNotFound(Address),

    /// The session has no account with the given index.
    #[error("no account with index {0}")]
    UnknownAccount(usize),

    /// Host-side encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// A logged event could not be decoded as the requested type.
    #[error("failed to decode '{topic}' event at log index {log_index}: {reason}")]
    EventDecode {
        /// Topic of the offending event.
        topic: String,
        /// Position of the event in the session log.
        log_index: u64,
        /// Decoder message.
        reason: String,
    },

    /// The chain configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`ChainConfig`](crate::config::ChainConfig).
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Returns the contract failure if this is a revert.
    #[must_use]
    pub fn revert_reason(&self) -> Option<&ContractError> {
        match self {
            Self::Revert { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns `true` if this is a revert caused by an access-control check.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.revert_reason()
            .is_some_and(ContractError::is_unauthorized)
    }
}
