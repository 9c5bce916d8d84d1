// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the unlock conditions of outputs.

mod address;
mod governor_address;
mod immutable_account_address;
mod state_controller_address;
mod timelock;

pub use self::{
    address::AddressUnlockCondition, governor_address::GovernorAddressUnlockCondition,
    immutable_account_address::ImmutableAccountAddressUnlockCondition,
    state_controller_address::StateControllerAddressUnlockCondition, timelock::TimelockUnlockCondition,
};
