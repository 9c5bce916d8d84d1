// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains slot and epoch types.

use core::fmt;

use derive_more::{Add, AddAssign, Deref, From};
use serde::{Deserialize, Serialize};

/// The index of a slot, the fixed time unit of the protocol.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, AddAssign, Deref, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// The maximum representable slot index.
    pub const MAX: Self = Self(u32::MAX);
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl core::ops::Add<u32> for SlotIndex {
    type Output = Self;

    fn add(self, rhs: u32) -> Self {
        Self(self.0 + rhs)
    }
}

impl core::ops::Sub<u32> for SlotIndex {
    type Output = Self;

    fn sub(self, rhs: u32) -> Self {
        Self(self.0 - rhs)
    }
}

/// The index of an epoch, a fixed run of slots.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, AddAssign, Deref, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EpochIndex(pub u32);

impl fmt::Display for EpochIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl core::ops::Add<u32> for EpochIndex {
    type Output = Self;

    fn add(self, rhs: u32) -> Self {
        Self(self.0 + rhs)
    }
}

/// A commitment to a slot, the checkpoint against which commitment-bounded
/// rules are validated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// The slot this commitment refers to.
    pub slot: SlotIndex,
}
