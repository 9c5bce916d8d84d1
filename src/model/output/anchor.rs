// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the anchor output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    unlock_condition::{GovernorAddressUnlockCondition, StateControllerAddressUnlockCondition},
    OutputId,
};
use crate::model::{feature::Features, native_token::NativeToken, util::bytify};

/// Unique identifier of an anchor, derived from the identifier of the output
/// that created it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl AnchorId {
    /// The length of an anchor identifier.
    pub const LENGTH: usize = 32;

    /// The empty identifier carried before the first consumption.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Whether this is the empty identifier.
    pub fn is_null(&self) -> bool {
        self.0 == [0; Self::LENGTH]
    }

    /// Derives the identifier from the output that created the anchor.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(output_id.hash())
    }
}

impl core::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for AnchorId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// Describes an anchor in the ledger that is controlled by a state controller
/// and a governor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorOutput {
    /// Amount of base tokens held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub amount: u64,
    /// Amount of mana held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub mana: u64,
    /// Native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// Unique identifier of the anchor.
    pub anchor_id: AnchorId,
    /// A counter that must increase by 1 every time the anchor is state
    /// transitioned.
    pub state_index: u32,
    /// Metadata that can only be changed by the state controller.
    #[serde(with = "serde_bytes")]
    pub state_metadata: Box<[u8]>,
    /// The state controller unlock condition.
    pub state_controller_address_unlock_condition: StateControllerAddressUnlockCondition,
    /// The governor unlock condition.
    pub governor_address_unlock_condition: GovernorAddressUnlockCondition,
    /// Features of the output.
    pub features: Features,
    /// Features fixed forever when the anchor was created.
    pub immutable_features: Features,
}

impl AnchorOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "anchor";
}
