// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Semantic validation of transactions against the Nova UTXO ledger.
//!
//! Given a [`Transaction`](model::Transaction) and its resolved inputs, the
//! [`vm`] module decides whether every chain-constrained output (account,
//! anchor, foundry, NFT, delegation) transitions legally from its prior state
//! to its proposed next state. Validation is a pure computation over a
//! per-call [`WorkingSet`](vm::WorkingSet); no state is shared between calls.
//!
//! Address unlock resolution, binary (de)serialization and the mana decay
//! formulas are resolved outside of this crate and consumed through the types
//! in [`model`].

pub mod error;
pub mod model;
pub mod vm;

pub use self::error::Error;
