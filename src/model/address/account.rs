// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::model::output::AccountId;

/// The address of an account, derived from its identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub AccountId);

impl AccountAddress {
    /// The serialized kind of an account address.
    pub const KIND: u8 = 8;
}

impl core::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
