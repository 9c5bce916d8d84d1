// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use derive_more::From;
use serde::{Deserialize, Serialize};

use super::Ed25519Address;

/// An Ed25519 address with the special semantics that the first consumption
/// of a basic output it holds converts that output into an account.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplicitAccountCreationAddress(pub Ed25519Address);

impl core::fmt::Display for ImplicitAccountCreationAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}
