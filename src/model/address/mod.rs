// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains address types.

use derive_more::From;
use serde::{Deserialize, Serialize};

mod account;
mod anchor;
mod ed25519;
mod implicit_account_creation;
mod nft;

pub use self::{
    account::AccountAddress, anchor::AnchorAddress, ed25519::Ed25519Address,
    implicit_account_creation::ImplicitAccountCreationAddress, nft::NftAddress,
};

/// The different address variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Address {
    /// An address backed by an Ed25519 public key hash.
    Ed25519(Ed25519Address),
    /// The address of an account.
    Account(AccountAddress),
    /// The address of an anchor.
    Anchor(AnchorAddress),
    /// The address of an NFT.
    Nft(NftAddress),
    /// An Ed25519 address whose first consumption creates an account.
    ImplicitAccountCreation(ImplicitAccountCreationAddress),
}

impl Address {
    /// Whether consuming an output held by this address implicitly creates an
    /// account.
    pub fn is_implicit_account_creation(&self) -> bool {
        matches!(self, Self::ImplicitAccountCreation(_))
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Ed25519(a) => a.fmt(f),
            Self::Account(a) => a.fmt(f),
            Self::Anchor(a) => a.fmt(f),
            Self::Nft(a) => a.fmt(f),
            Self::ImplicitAccountCreation(a) => a.fmt(f),
        }
    }
}
