// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the protocol parameters.

use serde::{Deserialize, Serialize};

use super::slot::{EpochIndex, SlotIndex};

/// The parameters of the protocol under which validation happens.
///
/// Besides the raw values this type carries the epoch arithmetic and the
/// committable-age bounds derived from them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    /// The version of the protocol.
    pub version: u8,
    /// The human readable name of the network.
    pub network_name: String,
    /// The slot the ledger started at.
    pub genesis_slot: SlotIndex,
    /// The number of slots in an epoch expressed as an exponent of 2.
    pub slots_per_epoch_exponent: u8,
    /// The minimum age, in slots, of a slot to be committed.
    pub min_committable_age: u32,
    /// The maximum age, in slots, of a slot to be committed.
    pub max_committable_age: u32,
    /// The number of epochs a staking feature stays bonded after its end
    /// epoch passed.
    pub staking_unbonding_period: u32,
    /// The distance, in slots, to the end of an epoch at which validator
    /// registration for that epoch closes.
    pub epoch_nearing_threshold: u32,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            version: 3,
            network_name: "testnet".into(),
            genesis_slot: SlotIndex(0),
            slots_per_epoch_exponent: 13,
            min_committable_age: 10,
            max_committable_age: 20,
            staking_unbonding_period: 10,
            epoch_nearing_threshold: 60,
        }
    }
}

impl ProtocolParameters {
    /// The number of slots in an epoch.
    pub fn slots_per_epoch(&self) -> u32 {
        1 << self.slots_per_epoch_exponent
    }

    /// The latest slot a commitment to the given slot may refer to.
    pub fn past_bounded_slot(&self, commitment_slot: SlotIndex) -> SlotIndex {
        commitment_slot + self.max_committable_age
    }

    /// The earliest slot a commitment to the given slot may refer to.
    pub fn future_bounded_slot(&self, commitment_slot: SlotIndex) -> SlotIndex {
        commitment_slot + self.min_committable_age
    }

    /// The epoch the given slot belongs to.
    pub fn epoch_from_slot(&self, slot: SlotIndex) -> EpochIndex {
        EpochIndex(slot.0.saturating_sub(self.genesis_slot.0) >> self.slots_per_epoch_exponent)
    }

    /// The first slot of the given epoch.
    pub fn epoch_start_slot(&self, epoch: EpochIndex) -> SlotIndex {
        SlotIndex(self.genesis_slot.0 + (epoch.0 << self.slots_per_epoch_exponent))
    }

    /// The last slot of the given epoch.
    pub fn epoch_end_slot(&self, epoch: EpochIndex) -> SlotIndex {
        self.epoch_start_slot(epoch) + (self.slots_per_epoch() - 1)
    }

    /// The slot at which validator and delegation registration for the given
    /// epoch closes.
    pub fn registration_slot(&self, epoch: EpochIndex) -> SlotIndex {
        self.epoch_end_slot(epoch) - self.epoch_nearing_threshold
    }
}
