// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::model::output::NftId;

/// The address of an NFT, derived from its identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NftAddress(pub NftId);

impl core::fmt::Display for NftAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
