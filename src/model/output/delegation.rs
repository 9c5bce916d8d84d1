// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the delegation output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{unlock_condition::AddressUnlockCondition, OutputId};
use crate::model::{address::AccountAddress, slot::EpochIndex, util::bytify};

/// Unique identifier of a delegation, derived from the identifier of the
/// output that created it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelegationId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl DelegationId {
    /// The length of a delegation identifier.
    pub const LENGTH: usize = 32;

    /// The empty identifier carried before the first consumption.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Whether this is the empty identifier.
    pub fn is_null(&self) -> bool {
        self.0 == [0; Self::LENGTH]
    }

    /// Derives the identifier from the output that created the delegation.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(output_id.hash())
    }
}

impl core::fmt::Display for DelegationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for DelegationId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// Describes the delegation of base tokens to a validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationOutput {
    /// Amount of base tokens held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub amount: u64,
    /// Amount of delegated base tokens.
    #[serde(with = "crate::model::util::stringify")]
    pub delegated_amount: u64,
    /// Unique identifier of the delegation.
    pub delegation_id: DelegationId,
    /// The address of the validator this output delegates to.
    pub validator_address: AccountAddress,
    /// The first epoch this output delegates for.
    pub start_epoch: EpochIndex,
    /// The last epoch this output delegates for.
    pub end_epoch: EpochIndex,
    /// The address unlock condition.
    pub address_unlock_condition: AddressUnlockCondition,
}

impl DelegationOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "delegation";
}
