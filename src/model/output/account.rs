// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the account output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{unlock_condition::AddressUnlockCondition, OutputId};
use crate::model::{feature::Features, native_token::NativeToken, util::bytify};

/// Unique identifier of an account, derived from the identifier of the output
/// that created it. It is empty until the creating output is consumed for the
/// first time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl AccountId {
    /// The length of an account identifier.
    pub const LENGTH: usize = 32;

    /// The empty identifier carried before the first consumption.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Whether this is the empty identifier.
    pub fn is_null(&self) -> bool {
        self.0 == [0; Self::LENGTH]
    }

    /// Derives the identifier from the output that created the account.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(output_id.hash())
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for AccountId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// Describes an account in the ledger that can issue blocks and own
/// foundries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOutput {
    /// Amount of base tokens held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub amount: u64,
    /// Amount of mana held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub mana: u64,
    /// Native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// Unique identifier of the account.
    pub account_id: AccountId,
    /// A counter that denotes the number of foundries created by this
    /// account.
    pub foundry_counter: u32,
    /// The address unlock condition.
    pub address_unlock_condition: AddressUnlockCondition,
    /// Features of the output.
    pub features: Features,
    /// Features fixed forever when the account was created.
    pub immutable_features: Features,
}

impl AccountOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "account";
}
