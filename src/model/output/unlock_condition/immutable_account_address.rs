// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::model::address::AccountAddress;

/// An unlock condition that ties a foundry to the account that owns it for
/// the foundry's whole lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableAccountAddressUnlockCondition {
    /// The address of the owning account.
    pub address: AccountAddress,
}
