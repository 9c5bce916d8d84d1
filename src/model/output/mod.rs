// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the output types of the ledger.

use derive_more::From;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{
    address::Address,
    native_token::NativeToken,
    slot::SlotIndex,
    transaction::TransactionId,
};

pub mod account;
pub mod anchor;
pub mod basic;
pub mod delegation;
pub mod foundry;
pub mod nft;
pub mod unlock_condition;

pub use self::{
    account::{AccountId, AccountOutput},
    anchor::{AnchorId, AnchorOutput},
    basic::BasicOutput,
    delegation::{DelegationId, DelegationOutput},
    foundry::{FoundryId, FoundryOutput},
    nft::{NftId, NftOutput},
    unlock_condition::*,
};

/// The identifier of an output: the transaction that created it and the index
/// within that transaction's outputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId {
    /// The identifier of the creating transaction.
    pub transaction_id: TransactionId,
    /// The index of the output within the creating transaction.
    pub index: u16,
}

impl OutputId {
    /// The digest of the identifier, used to derive the identifiers of chain
    /// outputs created by it.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.transaction_id.0);
        hasher.update(self.index.to_le_bytes());
        hasher.finalize().into()
    }
}

impl core::fmt::Display for OutputId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{:04x}", self.transaction_id, self.index)
    }
}

/// The type of state transition a chain output undergoes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionType {
    /// The first transition of a chain, without a prior state.
    Genesis,
    /// A transition from a prior state to a next state of the same chain.
    StateChange,
    /// The final transition of a chain, without a next state.
    Destroy,
}

impl core::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Genesis => write!(f, "genesis"),
            Self::StateChange => write!(f, "state change"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

/// The stable identifier of a chain-constrained output across its
/// transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainId {
    /// The identifier of an account chain.
    Account(AccountId),
    /// The identifier of an anchor chain.
    Anchor(AnchorId),
    /// The identifier of a foundry chain.
    Foundry(FoundryId),
    /// The identifier of an NFT chain.
    Nft(NftId),
    /// The identifier of a delegation chain.
    Delegation(DelegationId),
}

impl ChainId {
    /// Whether the identifier is still the empty placeholder carried before
    /// the output was consumed for the first time.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Account(id) => id.is_null(),
            Self::Anchor(id) => id.is_null(),
            // A foundry id is computed from the foundry's fields and is never
            // empty.
            Self::Foundry(_) => false,
            Self::Nft(id) => id.is_null(),
            Self::Delegation(id) => id.is_null(),
        }
    }

    /// Replaces an empty identifier with the one derived from the creating
    /// output.
    pub fn or_derived_from(self, output_id: &OutputId) -> Self {
        if !self.is_empty() {
            return self;
        }
        match self {
            Self::Account(_) => Self::Account(AccountId::from_output_id(output_id)),
            Self::Anchor(_) => Self::Anchor(AnchorId::from_output_id(output_id)),
            Self::Foundry(_) => self,
            Self::Nft(_) => Self::Nft(NftId::from_output_id(output_id)),
            Self::Delegation(_) => Self::Delegation(DelegationId::from_output_id(output_id)),
        }
    }
}

impl core::fmt::Display for ChainId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Account(id) => id.fmt(f),
            Self::Anchor(id) => id.fmt(f),
            Self::Foundry(id) => id.fmt(f),
            Self::Nft(id) => id.fmt(f),
            Self::Delegation(id) => id.fmt(f),
        }
    }
}

/// The different output variants of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Output {
    /// A basic output.
    Basic(BasicOutput),
    /// An account output.
    Account(AccountOutput),
    /// An anchor output.
    Anchor(AnchorOutput),
    /// A foundry output.
    Foundry(FoundryOutput),
    /// An NFT output.
    Nft(NftOutput),
    /// A delegation output.
    Delegation(DelegationOutput),
}

impl Output {
    /// A `&str` representation of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => BasicOutput::KIND,
            Self::Account(_) => AccountOutput::KIND,
            Self::Anchor(_) => AnchorOutput::KIND,
            Self::Foundry(_) => FoundryOutput::KIND,
            Self::Nft(_) => NftOutput::KIND,
            Self::Delegation(_) => DelegationOutput::KIND,
        }
    }

    /// The amount of base tokens held by the output.
    pub fn amount(&self) -> u64 {
        match self {
            Self::Basic(output) => output.amount,
            Self::Account(output) => output.amount,
            Self::Anchor(output) => output.amount,
            Self::Foundry(output) => output.amount,
            Self::Nft(output) => output.amount,
            Self::Delegation(output) => output.amount,
        }
    }

    /// The amount of mana stored by the output.
    pub fn mana(&self) -> u64 {
        match self {
            Self::Basic(output) => output.mana,
            Self::Account(output) => output.mana,
            Self::Anchor(output) => output.mana,
            Self::Nft(output) => output.mana,
            Self::Foundry(_) | Self::Delegation(_) => 0,
        }
    }

    /// The native tokens held by the output.
    pub fn native_tokens(&self) -> &[NativeToken] {
        match self {
            Self::Basic(output) => &output.native_tokens,
            Self::Account(output) => &output.native_tokens,
            Self::Anchor(output) => &output.native_tokens,
            Self::Foundry(output) => &output.native_tokens,
            Self::Nft(output) => &output.native_tokens,
            Self::Delegation(_) => &[],
        }
    }

    /// The chain identifier of the output, deriving the identifier of newly
    /// created chains from the identifier of the creating output. Returns
    /// `None` for outputs that are not chain-constrained.
    pub fn chain_id(&self, output_id: &OutputId) -> Option<ChainId> {
        let chain_id = match self {
            Self::Basic(_) => return None,
            Self::Account(output) => ChainId::Account(output.account_id),
            Self::Anchor(output) => ChainId::Anchor(output.anchor_id),
            Self::Foundry(output) => ChainId::Foundry(output.id()),
            Self::Nft(output) => ChainId::Nft(output.nft_id),
            Self::Delegation(output) => ChainId::Delegation(output.delegation_id),
        };

        Some(chain_id.or_derived_from(output_id))
    }

    /// Whether the output's mana is locked to the given account until at
    /// least the given slot.
    pub fn is_mana_locked(&self, account_id: &AccountId, min_slot: SlotIndex) -> bool {
        let (address, timelock) = match self {
            Self::Basic(output) => (
                &output.address_unlock_condition.address,
                output.timelock_unlock_condition.as_ref(),
            ),
            Self::Nft(output) => (
                &output.address_unlock_condition.address,
                output.timelock_unlock_condition.as_ref(),
            ),
            _ => return false,
        };

        matches!(address, Address::Account(owner) if owner.0 == *account_id)
            && timelock.map_or(false, |timelock| timelock.slot >= min_slot)
    }
}
