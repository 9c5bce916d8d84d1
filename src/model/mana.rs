// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains mana types and the decay interface.

use thiserror::Error;

use super::slot::SlotIndex;

/// The signed block issuance credit balance of an account.
pub type BlockIssuanceCredits = i64;

/// Errors produced by mana decay and generation arithmetic.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ManaError {
    #[error("mana amount overflow")]
    Overflow,
    #[error("creation slot {creation_slot} is after the target slot {target_slot}")]
    InvalidSlotOrder {
        creation_slot: SlotIndex,
        target_slot: SlotIndex,
    },
}

/// Decay and generation arithmetic for mana.
///
/// The decay formulas are protocol parameters resolved outside of this crate;
/// the validation engine only relies on this interface.
pub trait ManaDecayProvider {
    /// Applies decay to an amount of stored mana over the given slot range.
    fn mana_with_decay(&self, mana: u64, creation_slot: SlotIndex, target_slot: SlotIndex) -> Result<u64, ManaError>;

    /// Computes the potential mana generated by holding an amount of base
    /// tokens over the given slot range, including the decay it is itself
    /// subject to.
    fn mana_generation_with_decay(
        &self,
        amount: u64,
        creation_slot: SlotIndex,
        target_slot: SlotIndex,
    ) -> Result<u64, ManaError>;
}
