// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::util::bytify;

/// An address backed by the BLAKE2b-256 hash of an Ed25519 public key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519Address(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl Ed25519Address {
    /// The length of an Ed25519 address.
    pub const LENGTH: usize = 32;
}

impl core::fmt::Display for Ed25519Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for Ed25519Address {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}
