// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the token schemes, the supply policies of foundries.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{native_token::TokenAmount, output::TransitionType};

/// Errors produced by a token scheme rejecting a foundry transition.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TokenSchemeError {
    #[error("melted supply must be zero when the foundry is created")]
    MeltedOnGenesis,
    #[error("minted supply {minted} does not match the token amount {amount} put into circulation")]
    GenesisSupplyMismatch { minted: TokenAmount, amount: TokenAmount },
    #[error("maximum supply changed from {current} to {next}")]
    MaximumSupplyChanged { current: TokenAmount, next: TokenAmount },
    #[error("minted supply shrank from {current} to {next}")]
    MintedSupplyDecreased { current: TokenAmount, next: TokenAmount },
    #[error("melted supply shrank from {current} to {next}")]
    MeltedSupplyDecreased { current: TokenAmount, next: TokenAmount },
    #[error("minted supply delta {minted_delta} does not match the token delta {token_delta}")]
    MintedDeltaMismatch {
        minted_delta: TokenAmount,
        token_delta: TokenAmount,
    },
    #[error("melted supply cannot change while minting")]
    MeltedChangedWhileMinting,
    #[error("melted supply delta {melted_delta} exceeds the token delta {token_delta}")]
    MeltedDeltaTooLarge {
        melted_delta: TokenAmount,
        token_delta: TokenAmount,
    },
    #[error("minted supply cannot change while melting")]
    MintedChangedWhileMelting,
    #[error("minted or melted supply changed while the token balance is unchanged")]
    SupplyChangedWithoutTokenDelta,
    #[error("{circulating} tokens still in circulation when destroying the foundry")]
    OutstandingSupplyOnDestruction { circulating: TokenAmount },
}

/// A foundry's supply policy: validates the mint, melt and destroy deltas of
/// the token it controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TokenScheme {
    /// A scheme with plain minted/melted/maximum supply counters.
    Simple(SimpleTokenScheme),
}

impl TokenScheme {
    /// The serialized kind of the scheme, part of the foundry identity.
    pub const fn kind(&self) -> u8 {
        match self {
            Self::Simple(_) => SimpleTokenScheme::KIND,
        }
    }

    /// Validates the scheme change and the token amount delta of a foundry
    /// transition. `in_amount` and `out_amount` are the transaction-wide sums
    /// of the foundry's token on the input and output side.
    pub fn state_transition(
        &self,
        transition: TransitionType,
        next: Option<&TokenScheme>,
        in_amount: TokenAmount,
        out_amount: TokenAmount,
    ) -> Result<(), TokenSchemeError> {
        match self {
            Self::Simple(scheme) => match transition {
                TransitionType::Genesis => scheme.genesis_transition(out_amount),
                TransitionType::StateChange => {
                    let Some(TokenScheme::Simple(next)) = next else {
                        unreachable!("foundry state change without a next token scheme");
                    };
                    scheme.state_change_transition(next, in_amount, out_amount)
                }
                TransitionType::Destroy => scheme.destruction_transition(in_amount, out_amount),
            },
        }
    }
}

/// A token scheme with plain minted/melted/maximum supply counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTokenScheme {
    /// The amount of tokens that have been minted.
    pub minted_tokens: TokenAmount,
    /// The amount of tokens that have been melted.
    pub melted_tokens: TokenAmount,
    /// The maximum supply of tokens the foundry controls.
    pub maximum_supply: TokenAmount,
}

impl SimpleTokenScheme {
    /// The serialized kind of a simple token scheme.
    pub const KIND: u8 = 0;

    /// The amount of tokens in circulation.
    pub fn circulating_supply(&self) -> TokenAmount {
        // melted can never exceed minted for a syntactically valid scheme
        self.minted_tokens.checked_sub(self.melted_tokens).unwrap_or_default()
    }

    fn genesis_transition(&self, out_amount: TokenAmount) -> Result<(), TokenSchemeError> {
        if self.melted_tokens != TokenAmount::default() {
            return Err(TokenSchemeError::MeltedOnGenesis);
        }
        if out_amount != self.minted_tokens {
            return Err(TokenSchemeError::GenesisSupplyMismatch {
                minted: self.minted_tokens,
                amount: out_amount,
            });
        }

        Ok(())
    }

    fn state_change_transition(
        &self,
        next: &Self,
        in_amount: TokenAmount,
        out_amount: TokenAmount,
    ) -> Result<(), TokenSchemeError> {
        if self.maximum_supply != next.maximum_supply {
            return Err(TokenSchemeError::MaximumSupplyChanged {
                current: self.maximum_supply,
                next: next.maximum_supply,
            });
        }
        if next.minted_tokens < self.minted_tokens {
            return Err(TokenSchemeError::MintedSupplyDecreased {
                current: self.minted_tokens,
                next: next.minted_tokens,
            });
        }
        if next.melted_tokens < self.melted_tokens {
            return Err(TokenSchemeError::MeltedSupplyDecreased {
                current: self.melted_tokens,
                next: next.melted_tokens,
            });
        }

        match out_amount.cmp(&in_amount) {
            Ordering::Greater => {
                // Minting: the token surplus must be covered by the minted
                // supply counter, the melted counter stays untouched.
                let token_delta = TokenAmount(out_amount.0 - in_amount.0);
                let minted_delta = TokenAmount(next.minted_tokens.0 - self.minted_tokens.0);
                if minted_delta != token_delta {
                    return Err(TokenSchemeError::MintedDeltaMismatch { minted_delta, token_delta });
                }
                if next.melted_tokens != self.melted_tokens {
                    return Err(TokenSchemeError::MeltedChangedWhileMinting);
                }
            }
            Ordering::Less => {
                // Melting: the melted counter may grow by at most the token
                // deficit, the remainder counts as burned.
                let token_delta = TokenAmount(in_amount.0 - out_amount.0);
                let melted_delta = TokenAmount(next.melted_tokens.0 - self.melted_tokens.0);
                if melted_delta > token_delta {
                    return Err(TokenSchemeError::MeltedDeltaTooLarge { melted_delta, token_delta });
                }
                if next.minted_tokens != self.minted_tokens {
                    return Err(TokenSchemeError::MintedChangedWhileMelting);
                }
            }
            Ordering::Equal => {
                if next.minted_tokens != self.minted_tokens || next.melted_tokens != self.melted_tokens {
                    return Err(TokenSchemeError::SupplyChangedWithoutTokenDelta);
                }
            }
        }

        Ok(())
    }

    fn destruction_transition(&self, in_amount: TokenAmount, out_amount: TokenAmount) -> Result<(), TokenSchemeError> {
        // Everything the foundry ever minted must have been melted or must
        // disappear with this transaction.
        let circulating = self.circulating_supply();
        match in_amount.checked_sub(out_amount) {
            Some(removed) if removed == circulating => Ok(()),
            _ => Err(TokenSchemeError::OutstandingSupplyOnDestruction { circulating }),
        }
    }
}
