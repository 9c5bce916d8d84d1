// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Errors produced by the chain state transition validation functions.

use thiserror::Error;

use crate::model::{AccountId, EpochIndex, ManaError, SlotIndex, TokenSchemeError};

/// An error produced while validating the state transition of a single chain
/// output.
///
/// The execution pipeline wraps these with the chain id and the transition
/// kind without changing their identity. Dispatch mistakes are programming
/// errors and abort instead of surfacing here.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TransitionError {
    // Identity errors.
    #[error("chain identifier must be empty when the output is created")]
    NonEmptyGenesisChainId,
    #[error("cannot transition to a different output type")]
    NextOutputTypeMismatch,

    // Immutability violations.
    #[error("immutable features changed")]
    ImmutableFeaturesChanged,

    // Missing required context.
    #[error("a commitment input is required")]
    CommitmentInputRequired,
    #[error("a block issuance credit input is required")]
    BlockIssuanceCreditInputRequired,

    /// The issuer of a newly created chain output must be unlocked by the
    /// transaction.
    #[error("the issuer feature's address is not unlocked")]
    IssuerNotUnlocked,

    // Block issuer lifecycle.
    #[error("the account is locked due to a negative block issuance credit balance")]
    AccountLocked,
    #[error("the block issuer feature does not expire before slot {expiry_slot}")]
    BlockIssuerNotExpired { expiry_slot: SlotIndex },
    #[error("block issuer expiry {expiry_slot} is before the past bounded slot {past_bounded_slot}")]
    BlockIssuerExpiryTooEarly {
        expiry_slot: SlotIndex,
        past_bounded_slot: SlotIndex,
    },
    #[error("mana cannot be moved off a block issuer account: mana in {mana_in}, mana out {mana_out}")]
    ManaMovedOffBlockIssuer { mana_in: u64, mana_out: u64 },
    #[error("mana amount underflow")]
    ManaUnderflow,
    #[error(transparent)]
    Mana(#[from] ManaError),

    // Staking lifecycle.
    #[error("staked amount {staked_amount} exceeds the account amount {amount}")]
    StakedAmountExceedsAccount { staked_amount: u64, amount: u64 },
    #[error("staking start epoch {start_epoch} must equal the past bounded epoch {past_bounded_epoch}")]
    StakingStartEpochInvalid {
        start_epoch: EpochIndex,
        past_bounded_epoch: EpochIndex,
    },
    #[error("staking end epoch {end_epoch} must be at least {earliest_end_epoch}")]
    StakingEndEpochTooEarly {
        end_epoch: EpochIndex,
        earliest_end_epoch: EpochIndex,
    },
    #[error("a staking feature requires a block issuer feature on the same account")]
    StakingBlockIssuerRequired,
    #[error("the staking feature cannot be removed before unbonding")]
    StakingFeatureRemovedBeforeUnbonding,
    #[error("the bonded fields of a staking feature cannot be modified")]
    StakingFeatureModified,
    #[error("staking rewards cannot be claimed while the feature is bonded")]
    StakingRewardClaimNotAllowed,
    #[error("removing or changing an expired staking feature requires a reward input")]
    StakingRewardInputRequired,

    // Foundry counters and serial numbers.
    #[error("foundry counter shrank from {current} to {next}")]
    FoundryCounterDecreased { current: u32, next: u32 },
    #[error("{created} new foundries were created but the foundry counter changed by {expected}")]
    FoundryCounterMismatch { created: u32, expected: u32 },
    #[error("account {account_id} of a new foundry must transition in the same transaction")]
    FoundryOwnerNotTransitioning { account_id: AccountId },
    #[error("foundry serial number {serial_number} is outside the counter interval ({start}, {end}]")]
    FoundrySerialOutOfBounds { serial_number: u32, start: u32, end: u32 },
    #[error("new foundries of one account must ascend by serial number, found {other} before {serial_number}")]
    FoundrySerialNotAscending { serial_number: u32, other: u32 },
    /// The supply policy of the foundry rejected the transition.
    #[error(transparent)]
    TokenScheme(#[from] TokenSchemeError),

    // Anchor transitions.
    #[error("invalid anchor governance transition: {reason}")]
    AnchorGovernanceTransitionInvalid { reason: &'static str },
    #[error("invalid anchor state transition: {reason}")]
    AnchorStateTransitionInvalid { reason: &'static str },

    // Delegation lifecycle.
    #[error("delegated amount {delegated_amount} does not match the output amount {amount}")]
    DelegationAmountMismatch { delegated_amount: u64, amount: u64 },
    #[error("delegation end epoch must be zero at creation")]
    DelegationEndEpochNotZero,
    #[error("delegation start epoch {start_epoch} does not match the expected epoch {expected}")]
    DelegationStartEpochInvalid { start_epoch: EpochIndex, expected: EpochIndex },
    #[error("a delegation output can only be transitioned while its identifier is empty")]
    DelegationAlreadyTransitioned,
    #[error("the delegated amount, validator address and start epoch cannot be modified")]
    DelegationModified,
    #[error("delegation end epoch {end_epoch} does not match the expected epoch {expected}")]
    DelegationEndEpochInvalid { end_epoch: EpochIndex, expected: EpochIndex },
    #[error("rewards cannot be claimed during a delegation state change")]
    DelegationRewardClaimNotAllowed,
    #[error("destroying a delegation output requires a reward input")]
    DelegationRewardInputRequired,

    // Capability violations.
    #[error("{kind} destruction is not allowed by the transaction capabilities")]
    DestructionNotAllowed { kind: &'static str },
    #[error("an implicit account cannot be destroyed")]
    ImplicitAccountDestructionDisallowed,
}
