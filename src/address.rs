// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Account and contract addresses.

use core::fmt;
use core::str::FromStr;

use bytecheck::CheckBytes;
use rkyv::{Archive, Deserialize, Serialize};

/// Number of bytes in an [`Address`].
pub const ADDRESS_BYTES: usize = 20;

/// A 20-byte identifier for either an externally owned account or a
/// deployed contract.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Archive,
    Serialize,
    Deserialize,
)]
#[archive_attr(derive(CheckBytes))]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// The all-zero address, used as the caller of read-only queries.
    pub const ZERO: Self = Self([0; ADDRESS_BYTES]);

    /// Creates an address from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the address.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    /// Derives the account at `index` from a seed phrase.
    ///
    /// The same seed and index always produce the same address.
    #[must_use]
    pub fn derive(seed: &str, index: u32) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"account");
        hasher.update(seed.as_bytes());
        hasher.update(&index.to_le_bytes());
        Self::truncate(hasher.finalize())
    }

    /// Derives the address of the contract deployed by `deployer` with the
    /// given deployment `nonce`.
    #[must_use]
    pub fn contract(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"contract");
        hasher.update(&deployer.0);
        hasher.update(&nonce.to_le_bytes());
        Self::truncate(hasher.finalize())
    }

    fn truncate(hash: blake3::Hash) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&hash.as_bytes()[..ADDRESS_BYTES]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error returned when a string is not a valid hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address '{input}': {reason}")]
pub struct ParseAddressError {
    input: String,
    reason: String,
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(digits, &mut bytes).map_err(|err| ParseAddressError {
            input: s.to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self(bytes))
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
