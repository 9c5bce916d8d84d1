// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the foundry output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::unlock_condition::ImmutableAccountAddressUnlockCondition;
use crate::model::{
    address::AccountAddress,
    feature::Features,
    native_token::{NativeToken, TokenId},
    token_scheme::TokenScheme,
    util::bytify,
};

/// Unique identifier of a foundry, packing the owning account address, the
/// serial number and the token scheme kind. Unlike the other chain
/// identifiers it is computed from the foundry's fields, so any change to one
/// of them yields the identity of a different foundry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoundryId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl FoundryId {
    /// The length of a foundry identifier.
    pub const LENGTH: usize = 38;

    /// Packs the owning account address, serial number and token scheme kind
    /// into a foundry identifier.
    pub fn build(account_address: &AccountAddress, serial_number: u32, token_scheme_kind: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[0] = AccountAddress::KIND;
        bytes[1..33].copy_from_slice(&account_address.0.0);
        bytes[33..37].copy_from_slice(&serial_number.to_le_bytes());
        bytes[37] = token_scheme_kind;
        Self(bytes)
    }
}

impl From<TokenId> for FoundryId {
    fn from(value: TokenId) -> Self {
        Self(value.0)
    }
}

impl core::fmt::Display for FoundryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", prefix_hex::encode(self.0.as_slice()))
    }
}

impl FromStr for FoundryId {
    type Err = prefix_hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// Represents a foundry in the UTXO model: the chain output that mints and
/// melts a single native token kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundryOutput {
    /// Amount of base tokens held by the output.
    #[serde(with = "crate::model::util::stringify")]
    pub amount: u64,
    /// Native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// The serial number of the foundry within its owning account.
    #[serde(with = "crate::model::util::stringify")]
    pub serial_number: u32,
    /// The supply policy of the controlled token.
    pub token_scheme: TokenScheme,
    /// The immutable account address unlock condition.
    pub immutable_account_address_unlock_condition: ImmutableAccountAddressUnlockCondition,
    /// Features of the output.
    pub features: Features,
    /// Features fixed forever when the foundry was created.
    pub immutable_features: Features,
}

impl FoundryOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "foundry";

    /// The address of the account that owns this foundry.
    pub fn account_address(&self) -> &AccountAddress {
        &self.immutable_account_address_unlock_condition.address
    }

    /// The identifier of the foundry.
    pub fn id(&self) -> FoundryId {
        FoundryId::build(self.account_address(), self.serial_number, self.token_scheme.kind())
    }

    /// The identifier of the native token this foundry controls.
    pub fn native_token_id(&self) -> TokenId {
        self.id().into()
    }
}
