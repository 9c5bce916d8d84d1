// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the NFT output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    unlock_condition::{AddressUnlockCondition, TimelockUnlockCondition},
    OutputId,
};
use crate::model::{feature::Features, native_token::NativeToken, util::bytify};

/// Unique identifier of an NFT, derived from the identifier of the output
/// that created it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NftId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl NftId {
    /// The length of an NFT identifier.
    pub const LENGTH: usize = 32;

    /// The empty identifier carried before the first consumption.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Whether this is the empty identifier.
    pub fn is_null(&self) -> bool {
        self.0 == [0; Self::LENGTH]
    }

    /// Derives the identifier from the output that created the NFT.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(output_id.hash())
    }
}

impl core::fmt::Display for NftId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for NftId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// Represents an NFT in the UTXO model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOutput {
    /// Amount of base tokens held by the output.
    pub amount: u64,
    /// Amount of mana held by the output.
    pub mana: u64,
    /// Native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// Unique identifier of the NFT.
    pub nft_id: NftId,
    /// The address unlock condition.
    pub address_unlock_condition: AddressUnlockCondition,
    /// The timelock unlock condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelock_unlock_condition: Option<TimelockUnlockCondition>,
    /// Features of the output.
    pub features: Features,
    /// Features fixed forever when the NFT was minted.
    pub immutable_features: Features,
}

impl NftOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "nft";
}
