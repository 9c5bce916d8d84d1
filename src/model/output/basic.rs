// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module containing the basic output.

use serde::{Deserialize, Serialize};

use super::unlock_condition::{AddressUnlockCondition, TimelockUnlockCondition};
use crate::model::{feature::Features, native_token::NativeToken};

/// Represents a basic output in the UTXO model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicOutput {
    /// Amount of base tokens held by the output.
    pub amount: u64,
    /// Amount of mana held by the output.
    pub mana: u64,
    /// Native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// The address unlock condition.
    pub address_unlock_condition: AddressUnlockCondition,
    /// The timelock unlock condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelock_unlock_condition: Option<TimelockUnlockCondition>,
    /// Features of the output.
    pub features: Features,
}

impl BasicOutput {
    /// A `&str` representation of the type.
    pub const KIND: &'static str = "basic";

    /// Whether the output is held by an implicit account creation address and
    /// thus converts into an account when consumed.
    pub fn is_implicit_account(&self) -> bool {
        self.address_unlock_condition.address.is_implicit_account_creation()
    }
}
