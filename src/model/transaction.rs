// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the transaction essence types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    output::{AccountId, Output, OutputId},
    slot::SlotIndex,
    util::bytify,
};

/// Unique identifier of a transaction, computed over its serialized form by
/// the enclosing signed payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl TransactionId {
    /// The length of a transaction identifier.
    pub const LENGTH: usize = 32;
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for TransactionId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// A context input referenced by a transaction. The referenced data is
/// resolved outside of this crate and supplied alongside the UTXO inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ContextInput {
    /// References the commitment to a recent slot.
    Commitment {
        /// The committed slot.
        slot: SlotIndex,
    },
    /// References the block issuance credit balance of an account.
    BlockIssuanceCredit {
        /// The account whose credit balance is required.
        account_id: AccountId,
    },
    /// References the rewards claimable by the chain input at the given
    /// index.
    Reward {
        /// The index of the rewarded input.
        index: u16,
    },
}

/// An allotment of mana to the block issuance credit balance of an account.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaAllotment {
    /// The account the mana is allotted to.
    pub account_id: AccountId,
    /// The allotted amount.
    #[serde(with = "crate::model::util::stringify")]
    pub mana: u64,
}

/// The capabilities bitmask of a transaction, gating burning and the
/// destruction of chain outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionCapabilities(#[serde(with = "serde_bytes")] pub Box<[u8]>);

impl TransactionCapabilities {
    const CAN_BURN_NATIVE_TOKENS: usize = 0;
    const CAN_BURN_MANA: usize = 1;
    const CAN_DESTROY_ACCOUNT_OUTPUTS: usize = 2;
    const CAN_DESTROY_ANCHOR_OUTPUTS: usize = 3;
    const CAN_DESTROY_FOUNDRY_OUTPUTS: usize = 4;
    const CAN_DESTROY_NFT_OUTPUTS: usize = 5;

    /// A bitmask with no capabilities.
    pub fn none() -> Self {
        Self::default()
    }

    /// A bitmask with every capability.
    pub fn all() -> Self {
        Self(Box::new([0b0011_1111]))
    }

    fn has_bit(&self, index: usize) -> bool {
        self.0.get(index / 8).map_or(false, |byte| byte & (1 << (index % 8)) != 0)
    }

    /// Whether native tokens may disappear without being melted by their
    /// foundry.
    pub fn can_burn_native_tokens(&self) -> bool {
        self.has_bit(Self::CAN_BURN_NATIVE_TOKENS)
    }

    /// Whether the transaction may consume more mana than it produces.
    pub fn can_burn_mana(&self) -> bool {
        self.has_bit(Self::CAN_BURN_MANA)
    }

    /// Whether account outputs may be destroyed.
    pub fn can_destroy_account_outputs(&self) -> bool {
        self.has_bit(Self::CAN_DESTROY_ACCOUNT_OUTPUTS)
    }

    /// Whether anchor outputs may be destroyed.
    pub fn can_destroy_anchor_outputs(&self) -> bool {
        self.has_bit(Self::CAN_DESTROY_ANCHOR_OUTPUTS)
    }

    /// Whether foundry outputs may be destroyed.
    pub fn can_destroy_foundry_outputs(&self) -> bool {
        self.has_bit(Self::CAN_DESTROY_FOUNDRY_OUTPUTS)
    }

    /// Whether NFT outputs may be destroyed.
    pub fn can_destroy_nft_outputs(&self) -> bool {
        self.has_bit(Self::CAN_DESTROY_NFT_OUTPUTS)
    }
}

/// The essence of a transaction against the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The identifier of the transaction.
    pub transaction_id: TransactionId,
    /// The identifier of the network this transaction was issued to.
    pub network_id: u64,
    /// The slot during which the transaction was created.
    pub creation_slot: SlotIndex,
    /// The context inputs referenced by the transaction.
    pub context_inputs: Vec<ContextInput>,
    /// The UTXO inputs consumed by the transaction.
    pub inputs: Vec<OutputId>,
    /// The capabilities of the transaction.
    pub capabilities: TransactionCapabilities,
    /// The mana allotted to accounts by the transaction.
    pub mana_allotments: Vec<ManaAllotment>,
    /// The outputs created by the transaction.
    pub outputs: Vec<Output>,
}

impl Transaction {
    /// The identifier of the output created at the given index.
    pub fn output_id(&self, index: u16) -> OutputId {
        OutputId {
            transaction_id: self.transaction_id,
            index,
        }
    }

    /// The total mana allotted to the given account.
    pub fn allotted_mana(&self, account_id: &AccountId) -> u64 {
        self.mana_allotments
            .iter()
            .filter(|allotment| allotment.account_id == *account_id)
            .map(|allotment| allotment.mana)
            .sum()
    }
}
