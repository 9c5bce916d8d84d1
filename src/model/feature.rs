// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing output features.

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

use super::{
    address::Address,
    slot::{EpochIndex, SlotIndex},
    util::bytify,
};

/// The sender feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderFeature {
    /// The address the transaction proves to have unlocked.
    pub address: Address,
}

/// The issuer feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerFeature {
    /// The address that issued the chain output.
    pub address: Address,
}

/// The metadata feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFeature {
    /// The data of the feature.
    #[serde(with = "serde_bytes")]
    pub data: Box<[u8]>,
}

/// The tag feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFeature {
    /// The tag of the feature.
    #[serde(with = "serde_bytes")]
    pub tag: Box<[u8]>,
}

/// An Ed25519 public key authorized to issue blocks for an account.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519BlockIssuerKey(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl Ed25519BlockIssuerKey {
    /// The length of an Ed25519 block issuer key.
    pub const LENGTH: usize = 32;
}

/// The block issuer feature, gating the account's right to issue blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIssuerFeature {
    /// The slot at which the feature expires and can be removed.
    pub expiry_slot: SlotIndex,
    /// The keys authorized to issue blocks.
    pub block_issuer_keys: Box<[Ed25519BlockIssuerKey]>,
}

/// The staking feature, committing funds of the containing account for a
/// bounded epoch range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingFeature {
    /// The amount of base tokens that are locked and staked.
    pub staked_amount: u64,
    /// The fixed cost of the validator, received as part of its rewards.
    pub fixed_cost: u64,
    /// The epoch in which the staking started.
    pub start_epoch: EpochIndex,
    /// The epoch in which the staking ends.
    pub end_epoch: EpochIndex,
}

/// The different feature variants.
#[derive(Clone, Debug, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Feature {
    /// The sender feature.
    Sender(SenderFeature),
    /// The issuer feature.
    Issuer(IssuerFeature),
    /// The metadata feature.
    Metadata(MetadataFeature),
    /// The tag feature.
    Tag(TagFeature),
    /// The block issuer feature.
    BlockIssuer(BlockIssuerFeature),
    /// The staking feature.
    Staking(StakingFeature),
}

/// The set of features of an output, in their serialized order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(pub Box<[Feature]>);

impl Features {
    /// Returns the sender feature, if present.
    pub fn sender(&self) -> Option<&SenderFeature> {
        self.0.iter().find_map(|feature| match feature {
            Feature::Sender(feature) => Some(feature),
            _ => None,
        })
    }

    /// Returns the issuer feature, if present.
    pub fn issuer(&self) -> Option<&IssuerFeature> {
        self.0.iter().find_map(|feature| match feature {
            Feature::Issuer(feature) => Some(feature),
            _ => None,
        })
    }

    /// Returns the metadata feature, if present.
    pub fn metadata(&self) -> Option<&MetadataFeature> {
        self.0.iter().find_map(|feature| match feature {
            Feature::Metadata(feature) => Some(feature),
            _ => None,
        })
    }

    /// Returns the block issuer feature, if present.
    pub fn block_issuer(&self) -> Option<&BlockIssuerFeature> {
        self.0.iter().find_map(|feature| match feature {
            Feature::BlockIssuer(feature) => Some(feature),
            _ => None,
        })
    }

    /// Returns the staking feature, if present.
    pub fn staking(&self) -> Option<&StakingFeature> {
        self.0.iter().find_map(|feature| match feature {
            Feature::Staking(feature) => Some(feature),
            _ => None,
        })
    }
}

impl From<Vec<Feature>> for Features {
    fn from(value: Vec<Feature>) -> Self {
        Self(value.into())
    }
}
