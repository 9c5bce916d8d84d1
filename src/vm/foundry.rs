// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! State transition rules for foundry outputs.

use super::{ChainOutputWithIds, TransitionError, VmParams};
use crate::model::{AccountOutput, ChainId, FoundryOutput, Output, TokenAmount, TransitionType};

pub(crate) fn foundry_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&FoundryOutput>,
) -> Result<(), TransitionError> {
    match (transition, input, next) {
        (TransitionType::Genesis, _, Some(next)) => genesis_transition(params, next),
        (TransitionType::StateChange, Some(input), Some(next)) => state_change_transition(params, input, next),
        (TransitionType::Destroy, Some(input), None) => destruction_transition(params, input),
        _ => unreachable!("foundry transition arguments do not match the transition type"),
    }
}

fn genesis_transition(params: &VmParams<'_>, next: &FoundryOutput) -> Result<(), TransitionError> {
    let token_id = next.native_token_id();
    let out_amount = params
        .working_set
        .out_native_tokens
        .get(&token_id)
        .copied()
        .unwrap_or_default();
    next.token_scheme
        .state_transition(TransitionType::Genesis, None, TokenAmount::default(), out_amount)?;

    // The owning account must transition in the same transaction so the new
    // serial number can be validated against its foundry counter.
    let account_id = next.account_address().0;
    let account_chain = ChainId::Account(account_id);

    let Some(in_account) = params.working_set.in_chains.get(&account_chain) else {
        return Err(TransitionError::FoundryOwnerNotTransitioning { account_id });
    };
    let Some(out_account) = params.working_set.out_chains.get(&account_chain) else {
        return Err(TransitionError::FoundryOwnerNotTransitioning { account_id });
    };

    let Output::Account(in_account) = in_account.output else {
        // The owner is an implicit account converting in this transaction; it
        // cannot have allocated foundries yet.
        return Err(TransitionError::FoundryOwnerNotTransitioning { account_id });
    };
    let Output::Account(out_account) = *out_account else {
        unreachable!("account chain does not hold an account output");
    };

    serial_number_transition(params, next, in_account, out_account)
}

/// The serial number of a new foundry must fall into the counter interval of
/// its owning account and ascend strictly among the account's new foundries,
/// in output order.
fn serial_number_transition(
    params: &VmParams<'_>,
    next: &FoundryOutput,
    in_account: &AccountOutput,
    out_account: &AccountOutput,
) -> Result<(), TransitionError> {
    let start = in_account.foundry_counter;
    let end = out_account.foundry_counter;
    if next.serial_number <= start || next.serial_number > end {
        return Err(TransitionError::FoundrySerialOutOfBounds {
            serial_number: next.serial_number,
            start,
            end,
        });
    }

    let this_id = next.id();
    for output in &params.working_set.tx.outputs {
        let Output::Foundry(other) = output else { continue };
        if other.account_address() != next.account_address() {
            continue;
        }
        let other_id = other.id();
        if params.working_set.in_chains.contains_key(&ChainId::Foundry(other_id)) {
            continue;
        }
        // Only the foundries before this one decide whether it is in order.
        if other_id == this_id {
            break;
        }
        if other.serial_number >= next.serial_number {
            return Err(TransitionError::FoundrySerialNotAscending {
                serial_number: next.serial_number,
                other: other.serial_number,
            });
        }
    }

    Ok(())
}

fn state_change_transition(
    params: &VmParams<'_>,
    input: &ChainOutputWithIds<'_>,
    next: &FoundryOutput,
) -> Result<(), TransitionError> {
    let Output::Foundry(current) = input.output else {
        unreachable!("dispatched input is not a foundry output");
    };

    if current.immutable_features != next.immutable_features {
        return Err(TransitionError::ImmutableFeaturesChanged);
    }

    // A serial number or token scheme change would change the foundry id and
    // route through genesis and destruction instead of this transition.
    if current.id() != next.id() {
        unreachable!("foundry id changed within a state change transition");
    }

    let (in_amount, out_amount) = token_amounts(params, current);
    Ok(current
        .token_scheme
        .state_transition(TransitionType::StateChange, Some(&next.token_scheme), in_amount, out_amount)?)
}

fn destruction_transition(params: &VmParams<'_>, input: &ChainOutputWithIds<'_>) -> Result<(), TransitionError> {
    if !params.working_set.tx.capabilities.can_destroy_foundry_outputs() {
        return Err(TransitionError::DestructionNotAllowed {
            kind: FoundryOutput::KIND,
        });
    }

    let Output::Foundry(current) = input.output else {
        unreachable!("dispatched input is not a foundry output");
    };

    let (in_amount, out_amount) = token_amounts(params, current);
    Ok(current
        .token_scheme
        .state_transition(TransitionType::Destroy, None, in_amount, out_amount)?)
}

/// The transaction-wide sums of the foundry's token on the input and output
/// side.
fn token_amounts(params: &VmParams<'_>, foundry: &FoundryOutput) -> (TokenAmount, TokenAmount) {
    let token_id = foundry.native_token_id();
    let in_amount = params
        .working_set
        .in_native_tokens
        .get(&token_id)
        .copied()
        .unwrap_or_default();
    let out_amount = params
        .working_set
        .out_native_tokens
        .get(&token_id)
        .copied()
        .unwrap_or_default();

    (in_amount, out_amount)
}
