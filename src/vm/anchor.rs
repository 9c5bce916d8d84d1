// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! State transition rules for anchor outputs.

use super::{issuer_unlocked, ChainOutputWithIds, TransitionError, VmParams};
use crate::model::{AnchorOutput, Output, TransitionType};

pub(crate) fn anchor_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&AnchorOutput>,
) -> Result<(), TransitionError> {
    match (transition, input, next) {
        (TransitionType::Genesis, _, Some(next)) => genesis_transition(params, next),
        (TransitionType::StateChange, Some(input), Some(next)) => state_change_transition(input, next),
        (TransitionType::Destroy, Some(_), None) => destruction_transition(params),
        _ => unreachable!("anchor transition arguments do not match the transition type"),
    }
}

fn genesis_transition(params: &VmParams<'_>, next: &AnchorOutput) -> Result<(), TransitionError> {
    if !next.anchor_id.is_null() {
        return Err(TransitionError::NonEmptyGenesisChainId);
    }

    issuer_unlocked(&next.immutable_features, params.working_set.unlocked_addresses)
}

/// Discriminates a governance transition (state index unchanged) from a state
/// transition (state index incremented).
fn state_change_transition(input: &ChainOutputWithIds<'_>, next: &AnchorOutput) -> Result<(), TransitionError> {
    let Output::Anchor(current) = input.output else {
        unreachable!("dispatched input is not an anchor output");
    };

    if current.state_index == next.state_index {
        governance_transition(current, next)
    } else {
        state_transition(current, next)
    }
}

/// A governance transition may rotate the controllers and update the metadata
/// feature; everything else is frozen.
fn governance_transition(current: &AnchorOutput, next: &AnchorOutput) -> Result<(), TransitionError> {
    if current.immutable_features != next.immutable_features {
        return Err(TransitionError::AnchorGovernanceTransitionInvalid {
            reason: "immutable features changed",
        });
    }
    if current.amount != next.amount {
        return Err(TransitionError::AnchorGovernanceTransitionInvalid {
            reason: "amount changed",
        });
    }
    if current.state_metadata != next.state_metadata {
        return Err(TransitionError::AnchorGovernanceTransitionInvalid {
            reason: "state metadata changed",
        });
    }

    Ok(())
}

/// A state transition increments the state index and may move the amount and
/// state metadata; the controllers and the metadata feature are frozen.
fn state_transition(current: &AnchorOutput, next: &AnchorOutput) -> Result<(), TransitionError> {
    if current.immutable_features != next.immutable_features {
        return Err(TransitionError::AnchorStateTransitionInvalid {
            reason: "immutable features changed",
        });
    }
    if current.state_controller_address_unlock_condition != next.state_controller_address_unlock_condition {
        return Err(TransitionError::AnchorStateTransitionInvalid {
            reason: "state controller changed",
        });
    }
    if current.governor_address_unlock_condition != next.governor_address_unlock_condition {
        return Err(TransitionError::AnchorStateTransitionInvalid {
            reason: "governance controller changed",
        });
    }
    if current.state_index + 1 != next.state_index {
        return Err(TransitionError::AnchorStateTransitionInvalid {
            reason: "state index must increment by one",
        });
    }
    if current.features.metadata() != next.features.metadata() {
        return Err(TransitionError::AnchorStateTransitionInvalid {
            reason: "metadata feature changed",
        });
    }

    Ok(())
}

fn destruction_transition(params: &VmParams<'_>) -> Result<(), TransitionError> {
    if !params.working_set.tx.capabilities.can_destroy_anchor_outputs() {
        return Err(TransitionError::DestructionNotAllowed {
            kind: AnchorOutput::KIND,
        });
    }

    Ok(())
}
