// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Chain configuration for ephemeral sessions.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Chain id used when none is configured.
pub const DEFAULT_CHAIN_ID: u64 = 31_337;
/// Number of funded accounts created when none is configured.
pub const DEFAULT_ACCOUNTS: usize = 20;
/// Seed accounts are derived from when none is configured.
pub const DEFAULT_ACCOUNT_SEED: &str = "counter-forge";
/// Largest number of accounts a chain may derive at genesis.
pub const MAX_ACCOUNTS: usize = 10_000;

/// Parameters of an ephemeral chain.
///
/// ```toml
/// chain_id = 31337
/// accounts = 3
/// account_seed = "my seed"
/// block_time = 12
/// genesis_timestamp = 1700000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    /// Identifier of the chain.
    pub chain_id: u64,
    /// Number of accounts derived at genesis.
    pub accounts: usize,
    /// Seed the accounts are derived from.
    pub account_seed: String,
    /// Seconds between consecutive blocks.
    pub block_time: u64,
    /// Timestamp of the genesis block. Defaults to the wall clock when the
    /// session starts.
    pub genesis_timestamp: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            accounts: DEFAULT_ACCOUNTS,
            account_seed: DEFAULT_ACCOUNT_SEED.to_string(),
            block_time: 1,
            genesis_timestamp: None,
        }
    }
}

impl ChainConfig {
    /// Reads and validates a TOML configuration file.
    ///
    /// # Errors
    /// Fails if the file cannot be read, is not valid TOML, or describes an
    /// invalid chain.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    /// Fails on invalid TOML, unknown keys, or an invalid chain.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a usable chain.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if there are no accounts, more than
    /// [`MAX_ACCOUNTS`], or blocks would not advance in time.
    pub fn validate(&self) -> Result<()> {
        if self.accounts == 0 {
            return Err(Error::Config("at least one account is required".to_string()));
        }
        if self.accounts > MAX_ACCOUNTS {
            return Err(Error::Config(format!(
                "too many accounts: {} (at most {MAX_ACCOUNTS})",
                self.accounts
            )));
        }
        if self.block_time == 0 {
            return Err(Error::Config("block_time must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Genesis timestamp, falling back to the current time.
    #[must_use]
    pub fn resolve_genesis_timestamp(&self) -> u64 {
        self.genesis_timestamp.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.as_secs())
        })
    }
}
