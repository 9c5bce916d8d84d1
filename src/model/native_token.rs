// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains native token types.

use std::str::FromStr;

use derive_more::{Deref, From};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::{output::FoundryId, util::bytify};

/// The maximum number of distinct native tokens a transaction may touch
/// across its input and output side.
pub const MAX_NATIVE_TOKEN_COUNT: usize = 64;

/// The amount of a native token.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(#[serde(with = "crate::model::util::u256")] pub U256);

impl TokenAmount {
    /// Adds two amounts, detecting overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts two amounts, detecting underflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl core::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// The identifier of a native token. It has the same layout as the id of the
/// foundry that controls its supply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl TokenId {
    /// The length of a token identifier.
    pub const LENGTH: usize = FoundryId::LENGTH;
}

impl From<FoundryId> for TokenId {
    fn from(value: FoundryId) -> Self {
        Self(value.0)
    }
}

impl core::fmt::Display for TokenId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for TokenId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// An amount of a native token held by an output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeToken {
    /// The identifier of the token.
    pub token_id: TokenId,
    /// The held amount.
    pub amount: TokenAmount,
}
