// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the ledger data model.

pub mod address;
pub mod feature;
pub mod mana;
pub mod native_token;
pub mod output;
pub mod protocol;
pub mod slot;
pub mod token_scheme;
pub mod transaction;
pub mod util;

pub use self::{
    address::*, feature::*, mana::*, native_token::*, output::*, protocol::*, slot::*, token_scheme::*, transaction::*,
};
