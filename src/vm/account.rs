// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! State transition rules for account outputs and implicit accounts.

use super::{issuer_unlocked, ChainOutputWithIds, TransitionError, VmParams};
use crate::model::{
    AccountOutput, BlockIssuerFeature, ChainId, EpochIndex, Output, SlotIndex, StakingFeature, TransitionType,
};

/// How the staking feature changes across an account transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StakingChange {
    Kept,
    Removed,
}

pub(crate) fn account_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&AccountOutput>,
) -> Result<(), TransitionError> {
    match (transition, input, next) {
        (TransitionType::Genesis, _, Some(next)) => genesis_transition(params, next, true),
        (TransitionType::StateChange, Some(input), Some(next)) => state_change_transition(params, input, next),
        (TransitionType::Destroy, Some(input), None) => destruction_transition(params, input),
        _ => unreachable!("account transition arguments do not match the transition type"),
    }
}

/// One-shot conversion of a basic output held by an implicit account creation
/// address into a full account output.
pub(crate) fn implicit_account_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&AccountOutput>,
) -> Result<(), TransitionError> {
    if transition == TransitionType::Destroy {
        return Err(TransitionError::ImplicitAccountDestructionDisallowed);
    }
    let (Some(input), Some(next)) = (input, next) else {
        unreachable!("implicit account transition arguments do not match the transition type");
    };

    let implicit_account = ChainOutputWithIds {
        chain_id: ChainId::Account(next.account_id),
        output_id: input.output_id,
        output: input.output,
    };

    // The placeholder feature never expires, so the conversion may lower the
    // expiry slot but can never drop the feature.
    let block_issuer = BlockIssuerFeature {
        expiry_slot: SlotIndex::MAX,
        block_issuer_keys: Vec::new().into(),
    };

    block_issuer_transition(params, &implicit_account, Some(&block_issuer), next)?;

    // The account id is carried over from the implicit account and is exempt
    // from the empty-id requirement.
    genesis_transition(params, next, false)
}

fn genesis_transition(
    params: &VmParams<'_>,
    next: &AccountOutput,
    id_must_be_empty: bool,
) -> Result<(), TransitionError> {
    if id_must_be_empty && !next.account_id.is_null() {
        return Err(TransitionError::NonEmptyGenesisChainId);
    }

    if let Some(block_issuer) = next.features.block_issuer() {
        let commitment = params.commitment()?;
        let past_bounded_slot = params.protocol.past_bounded_slot(commitment.slot);
        if block_issuer.expiry_slot < past_bounded_slot {
            return Err(TransitionError::BlockIssuerExpiryTooEarly {
                expiry_slot: block_issuer.expiry_slot,
                past_bounded_slot,
            });
        }
    }

    if let Some(staking) = next.features.staking() {
        staking_genesis_transition(params, next, staking)?;
    }

    issuer_unlocked(&next.immutable_features, params.working_set.unlocked_addresses)
}

fn state_change_transition(
    params: &VmParams<'_>,
    input: &ChainOutputWithIds<'_>,
    next: &AccountOutput,
) -> Result<(), TransitionError> {
    let Output::Account(current) = input.output else {
        unreachable!("dispatched input is not an account output");
    };

    if current.immutable_features != next.immutable_features {
        return Err(TransitionError::ImmutableFeaturesChanged);
    }

    // An account holding a block issuer feature is locked while its block
    // issuance credit balance is negative.
    if current.features.block_issuer().is_some() {
        match params.working_set.bic.get(&current.account_id) {
            Some(credits) if *credits < 0 => return Err(TransitionError::AccountLocked),
            Some(_) => {}
            None => return Err(TransitionError::BlockIssuanceCreditInputRequired),
        }
    }

    staking_transition(params, input.chain_id, current, next)?;
    foundry_counter_transition(params, current, next)?;
    block_issuer_transition(params, input, current.features.block_issuer(), next)
}

fn destruction_transition(params: &VmParams<'_>, input: &ChainOutputWithIds<'_>) -> Result<(), TransitionError> {
    if !params.working_set.tx.capabilities.can_destroy_account_outputs() {
        return Err(TransitionError::DestructionNotAllowed {
            kind: AccountOutput::KIND,
        });
    }

    let Output::Account(current) = input.output else {
        unreachable!("dispatched input is not an account output");
    };

    if let Some(block_issuer) = current.features.block_issuer() {
        let commitment = params.commitment()?;
        if block_issuer.expiry_slot >= commitment.slot {
            return Err(TransitionError::BlockIssuerNotExpired {
                expiry_slot: block_issuer.expiry_slot,
            });
        }
        match params.working_set.bic.get(&current.account_id) {
            Some(credits) if *credits < 0 => return Err(TransitionError::AccountLocked),
            Some(_) => {}
            None => return Err(TransitionError::BlockIssuanceCreditInputRequired),
        }
    }

    if let Some(staking) = current.features.staking() {
        let commitment = params.commitment()?;
        let future_bounded_epoch = params
            .protocol
            .epoch_from_slot(params.protocol.future_bounded_slot(commitment.slot));
        if future_bounded_epoch <= staking.end_epoch {
            return Err(TransitionError::StakingFeatureRemovedBeforeUnbonding);
        }
        if !params.working_set.is_claiming_rewards(&input.chain_id) {
            return Err(TransitionError::StakingRewardInputRequired);
        }
    }

    Ok(())
}

/// Validates the block issuer feature lifecycle and that no mana leaks off
/// the account.
fn block_issuer_transition(
    params: &VmParams<'_>,
    input: &ChainOutputWithIds<'_>,
    current_feature: Option<&BlockIssuerFeature>,
    next: &AccountOutput,
) -> Result<(), TransitionError> {
    let next_feature = next.features.block_issuer();
    if current_feature.is_none() && next_feature.is_none() {
        return Ok(());
    }

    // New block issuers may not have a credit balance registered yet, but the
    // resolver must still provide one.
    match params.working_set.bic.get(&next.account_id) {
        Some(credits) if *credits < 0 => return Err(TransitionError::AccountLocked),
        Some(_) => {}
        None => return Err(TransitionError::BlockIssuanceCreditInputRequired),
    }

    let commitment = params.commitment()?;
    let past_bounded_slot = params.protocol.past_bounded_slot(commitment.slot);

    match (current_feature, next_feature) {
        (Some(current), next_feature) if current.expiry_slot >= commitment.slot => {
            // Not yet expired: the feature cannot be dropped and its expiry
            // can only move to the past bounded slot or later.
            let Some(next_feature) = next_feature else {
                return Err(TransitionError::BlockIssuerNotExpired {
                    expiry_slot: current.expiry_slot,
                });
            };
            if next_feature.expiry_slot != current.expiry_slot && next_feature.expiry_slot < past_bounded_slot {
                return Err(TransitionError::BlockIssuerExpiryTooEarly {
                    expiry_slot: next_feature.expiry_slot,
                    past_bounded_slot,
                });
            }
        }
        (_, Some(next_feature)) => {
            // Newly added, or expired but kept: the expiry must be pushed
            // sufficiently far into the future.
            if next_feature.expiry_slot < past_bounded_slot {
                return Err(TransitionError::BlockIssuerExpiryTooEarly {
                    expiry_slot: next_feature.expiry_slot,
                    past_bounded_slot,
                });
            }
        }
        (_, None) => {}
    }

    // The mana on the account's input side must not be moved to any other
    // output or account.
    let slot_booked = params.working_set.slot_booked(&input.output_id);
    let creation_slot = params.working_set.tx.creation_slot;

    let stored = params
        .mana_decay
        .mana_with_decay(input.output.mana(), slot_booked, creation_slot)?;
    let potential = params
        .mana_decay
        .mana_generation_with_decay(input.output.amount(), slot_booked, creation_slot)?;

    let mana_in = params
        .working_set
        .total_mana_in
        .checked_sub(stored)
        .and_then(|mana| mana.checked_sub(potential))
        .ok_or(TransitionError::ManaUnderflow)?;

    let mut mana_out = params
        .working_set
        .total_mana_out
        .checked_sub(next.mana)
        .and_then(|mana| mana.checked_sub(params.working_set.tx.allotted_mana(&next.account_id)))
        .ok_or(TransitionError::ManaUnderflow)?;

    // Mana locked to this account for long enough stays under its control
    // and does not count as moved off.
    let min_mana_locked_slot = past_bounded_slot + params.protocol.max_committable_age;
    for output in &params.working_set.tx.outputs {
        if output.is_mana_locked(&next.account_id, min_mana_locked_slot) {
            mana_out = mana_out
                .checked_sub(output.mana())
                .ok_or(TransitionError::ManaUnderflow)?;
        }
    }

    if mana_in < mana_out {
        return Err(TransitionError::ManaMovedOffBlockIssuer { mana_in, mana_out });
    }

    Ok(())
}

/// Validates the staking feature lifecycle of an account state change.
fn staking_transition(
    params: &VmParams<'_>,
    chain_id: ChainId,
    current: &AccountOutput,
    next: &AccountOutput,
) -> Result<(), TransitionError> {
    let is_claiming = params.working_set.is_claiming_rewards(&chain_id);

    let (current_feature, change) = match (current.features.staking(), next.features.staking()) {
        (None, None) => return Ok(()),
        // A newly added feature follows the same rules as at genesis.
        (None, Some(added)) => return staking_genesis_transition(params, next, added),
        (Some(current_feature), None) => (current_feature, StakingChange::Removed),
        (Some(current_feature), Some(_)) => (current_feature, StakingChange::Kept),
    };

    let commitment = params.commitment()?;
    let past_bounded_epoch = params
        .protocol
        .epoch_from_slot(params.protocol.past_bounded_slot(commitment.slot));
    let future_bounded_epoch = params
        .protocol
        .epoch_from_slot(params.protocol.future_bounded_slot(commitment.slot));

    if future_bounded_epoch <= current_feature.end_epoch {
        let earliest_end_epoch = past_bounded_epoch + params.protocol.staking_unbonding_period;
        bonded_staking_transition(current_feature, next.features.staking(), change, earliest_end_epoch, is_claiming)
    } else {
        expired_staking_transition(params, current_feature, next, change, is_claiming)
    }
}

/// Validates a staking transition while the feature is still bonded, i.e. the
/// future bounded epoch has not passed its end epoch.
fn bonded_staking_transition(
    current: &StakingFeature,
    next: Option<&StakingFeature>,
    change: StakingChange,
    earliest_end_epoch: EpochIndex,
    is_claiming: bool,
) -> Result<(), TransitionError> {
    if change == StakingChange::Removed {
        return Err(TransitionError::StakingFeatureRemovedBeforeUnbonding);
    }
    if is_claiming {
        return Err(TransitionError::StakingRewardClaimNotAllowed);
    }

    let Some(next) = next else {
        unreachable!("kept staking feature without a next feature");
    };

    if current.staked_amount != next.staked_amount
        || current.fixed_cost != next.fixed_cost
        || current.start_epoch != next.start_epoch
    {
        return Err(TransitionError::StakingFeatureModified);
    }
    // Extending the end epoch restarts the unbonding period.
    if current.end_epoch != next.end_epoch && next.end_epoch < earliest_end_epoch {
        return Err(TransitionError::StakingEndEpochTooEarly {
            end_epoch: next.end_epoch,
            earliest_end_epoch,
        });
    }

    Ok(())
}

/// Validates a staking transition after the feature expired.
fn expired_staking_transition(
    params: &VmParams<'_>,
    current: &StakingFeature,
    next: &AccountOutput,
    change: StakingChange,
    is_claiming: bool,
) -> Result<(), TransitionError> {
    match change {
        StakingChange::Removed => {
            if !is_claiming {
                return Err(TransitionError::StakingRewardInputRequired);
            }
            Ok(())
        }
        StakingChange::Kept => {
            let Some(next_feature) = next.features.staking() else {
                unreachable!("kept staking feature without a next feature");
            };
            if is_claiming {
                // Claiming while keeping a feature re-stakes it: the new
                // epoch range must be disjoint from the expired one.
                staking_genesis_transition(params, next, next_feature)
            } else if next_feature != current {
                Err(TransitionError::StakingRewardInputRequired)
            } else {
                Ok(())
            }
        }
    }
}

/// Validates a staking feature as newly added, at account genesis or when it
/// is effectively removed and re-added within one transaction.
fn staking_genesis_transition(
    params: &VmParams<'_>,
    account: &AccountOutput,
    feature: &StakingFeature,
) -> Result<(), TransitionError> {
    if account.amount < feature.staked_amount {
        return Err(TransitionError::StakedAmountExceedsAccount {
            staked_amount: feature.staked_amount,
            amount: account.amount,
        });
    }

    let commitment = params.commitment()?;
    let past_bounded_epoch = params
        .protocol
        .epoch_from_slot(params.protocol.past_bounded_slot(commitment.slot));

    if feature.start_epoch != past_bounded_epoch {
        return Err(TransitionError::StakingStartEpochInvalid {
            start_epoch: feature.start_epoch,
            past_bounded_epoch,
        });
    }

    let earliest_end_epoch = past_bounded_epoch + params.protocol.staking_unbonding_period;
    if feature.end_epoch < earliest_end_epoch {
        return Err(TransitionError::StakingEndEpochTooEarly {
            end_epoch: feature.end_epoch,
            earliest_end_epoch,
        });
    }

    if account.features.block_issuer().is_none() {
        return Err(TransitionError::StakingBlockIssuerRequired);
    }

    Ok(())
}

/// Checks that a foundry counter change is backed by exactly that many new
/// foundry outputs owned by this account.
fn foundry_counter_transition(
    params: &VmParams<'_>,
    current: &AccountOutput,
    next: &AccountOutput,
) -> Result<(), TransitionError> {
    if current.foundry_counter > next.foundry_counter {
        return Err(TransitionError::FoundryCounterDecreased {
            current: current.foundry_counter,
            next: next.foundry_counter,
        });
    }
    if current.foundry_counter == next.foundry_counter {
        return Ok(());
    }

    let mut created = 0u32;
    for output in &params.working_set.tx.outputs {
        let Output::Foundry(foundry) = output else { continue };
        if params
            .working_set
            .in_chains
            .contains_key(&ChainId::Foundry(foundry.id()))
        {
            continue;
        }
        if foundry.account_address().0 == next.account_id {
            created += 1;
        }
    }

    let expected = next.foundry_counter - current.foundry_counter;
    if created != expected {
        return Err(TransitionError::FoundryCounterMismatch { created, expected });
    }

    Ok(())
}
