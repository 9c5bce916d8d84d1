// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! State transition rules for delegation outputs.

use super::{ChainOutputWithIds, TransitionError, VmParams};
use crate::model::{DelegationOutput, EpochIndex, Output, TransitionType};

pub(crate) fn delegation_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&DelegationOutput>,
) -> Result<(), TransitionError> {
    match (transition, input, next) {
        (TransitionType::Genesis, _, Some(next)) => genesis_transition(params, next),
        (TransitionType::StateChange, Some(input), Some(next)) => state_change_transition(params, input, next),
        (TransitionType::Destroy, Some(input), None) => destruction_transition(params, input),
        _ => unreachable!("delegation transition arguments do not match the transition type"),
    }
}

fn genesis_transition(params: &VmParams<'_>, next: &DelegationOutput) -> Result<(), TransitionError> {
    if !next.delegation_id.is_null() {
        return Err(TransitionError::NonEmptyGenesisChainId);
    }
    if next.delegated_amount != next.amount {
        return Err(TransitionError::DelegationAmountMismatch {
            delegated_amount: next.delegated_amount,
            amount: next.amount,
        });
    }
    if next.end_epoch != EpochIndex(0) {
        return Err(TransitionError::DelegationEndEpochNotZero);
    }

    let commitment = params.commitment()?;
    let past_bounded_slot = params.protocol.past_bounded_slot(commitment.slot);
    let past_bounded_epoch = params.protocol.epoch_from_slot(past_bounded_slot);

    // Delegations registered before the epoch's registration slot start
    // counting with the next epoch, later ones skip it.
    let expected = if past_bounded_slot <= params.protocol.registration_slot(past_bounded_epoch) {
        past_bounded_epoch + 1
    } else {
        past_bounded_epoch + 2
    };
    if next.start_epoch != expected {
        return Err(TransitionError::DelegationStartEpochInvalid {
            start_epoch: next.start_epoch,
            expected,
        });
    }

    Ok(())
}

/// The single delayed-claiming transition: fixes the end epoch, everything
/// else stays untouched.
fn state_change_transition(
    params: &VmParams<'_>,
    input: &ChainOutputWithIds<'_>,
    next: &DelegationOutput,
) -> Result<(), TransitionError> {
    // Claiming the rewards is destroy-only.
    if params.working_set.is_claiming_rewards(&input.chain_id) {
        return Err(TransitionError::DelegationRewardClaimNotAllowed);
    }

    let Output::Delegation(current) = input.output else {
        unreachable!("dispatched input is not a delegation output");
    };

    if !current.delegation_id.is_null() {
        return Err(TransitionError::DelegationAlreadyTransitioned);
    }

    if current.delegated_amount != next.delegated_amount
        || current.validator_address != next.validator_address
        || current.start_epoch != next.start_epoch
    {
        return Err(TransitionError::DelegationModified);
    }

    let commitment = params.commitment()?;
    let future_bounded_slot = params.protocol.future_bounded_slot(commitment.slot);
    let future_bounded_epoch = params.protocol.epoch_from_slot(future_bounded_slot);

    let expected = if future_bounded_slot <= params.protocol.registration_slot(future_bounded_epoch) {
        future_bounded_epoch
    } else {
        future_bounded_epoch + 1
    };
    if next.end_epoch != expected {
        return Err(TransitionError::DelegationEndEpochInvalid {
            end_epoch: next.end_epoch,
            expected,
        });
    }

    Ok(())
}

fn destruction_transition(params: &VmParams<'_>, input: &ChainOutputWithIds<'_>) -> Result<(), TransitionError> {
    if !params.working_set.is_claiming_rewards(&input.chain_id) {
        return Err(TransitionError::DelegationRewardInputRequired);
    }

    Ok(())
}
