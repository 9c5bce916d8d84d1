// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Transaction-level validation errors.

use thiserror::Error;

use crate::{
    model::{ChainId, ManaError, OutputId, TokenId, TransitionType},
    vm::TransitionError,
};

/// The errors produced while semantically validating a transaction.
///
/// Validation is fail-fast: the first error encountered aborts the whole
/// transaction.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    #[error("utxo for input {index} not supplied")]
    MissingUtxo { index: u16 },
    #[error("chain {chain_id} appears more than once on the output side")]
    DuplicateChainId { chain_id: ChainId },
    #[error("input {output_id} was booked after the transaction creation slot")]
    InputBookedAfterTransaction { output_id: OutputId },
    /// A chain output failed its state transition validation. Wraps the
    /// positional context around the inner error without changing its
    /// identity.
    #[error("{transition} transition of chain {chain_id} failed: {source}")]
    ChainTransition {
        chain_id: ChainId,
        transition: TransitionType,
        #[source]
        source: TransitionError,
    },
    #[error("native token count {count} exceeds the maximum of {max}")]
    MaxNativeTokensExceeded { count: usize, max: usize },
    #[error("native token {token_id} is unbalanced and its foundry is not transitioning")]
    NativeTokenSumUnbalanced { token_id: TokenId },
    #[error("burning native token {token_id} is not allowed by the transaction capabilities")]
    NativeTokenBurningNotAllowed { token_id: TokenId },
    #[error("native token amount overflow")]
    NativeTokenOverflow,
    #[error("total mana in {mana_in} does not cover total mana out {mana_out}")]
    UnbalancedMana { mana_in: u64, mana_out: u64 },
    #[error("mana burning is not allowed by the transaction capabilities")]
    ManaBurningNotAllowed,
    #[error("mana amount overflow")]
    ManaOverflow,
    #[error(transparent)]
    Mana(#[from] ManaError),
}
