// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::model::slot::SlotIndex;

/// An unlock condition that keeps the output locked until a given slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockUnlockCondition {
    /// The first slot at which the output can be unlocked.
    pub slot: SlotIndex,
}
