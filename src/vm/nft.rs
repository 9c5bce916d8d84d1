// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! State transition rules for NFT outputs.

use super::{issuer_unlocked, ChainOutputWithIds, TransitionError, VmParams};
use crate::model::{NftOutput, Output, TransitionType};

pub(crate) fn nft_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&NftOutput>,
) -> Result<(), TransitionError> {
    match (transition, input, next) {
        (TransitionType::Genesis, _, Some(next)) => genesis_transition(params, next),
        (TransitionType::StateChange, Some(input), Some(next)) => state_change_transition(input, next),
        (TransitionType::Destroy, Some(_), None) => destruction_transition(params),
        _ => unreachable!("NFT transition arguments do not match the transition type"),
    }
}

fn genesis_transition(params: &VmParams<'_>, next: &NftOutput) -> Result<(), TransitionError> {
    if !next.nft_id.is_null() {
        return Err(TransitionError::NonEmptyGenesisChainId);
    }

    issuer_unlocked(&next.immutable_features, params.working_set.unlocked_addresses)
}

fn state_change_transition(input: &ChainOutputWithIds<'_>, next: &NftOutput) -> Result<(), TransitionError> {
    let Output::Nft(current) = input.output else {
        unreachable!("dispatched input is not an NFT output");
    };

    if current.immutable_features != next.immutable_features {
        return Err(TransitionError::ImmutableFeaturesChanged);
    }

    Ok(())
}

fn destruction_transition(params: &VmParams<'_>) -> Result<(), TransitionError> {
    if !params.working_set.tx.capabilities.can_destroy_nft_outputs() {
        return Err(TransitionError::DestructionNotAllowed { kind: NftOutput::KIND });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::super::test::*;
    use super::*;
    use crate::model::{ChainId, Feature, IssuerFeature, NftId, TransactionCapabilities};

    #[test]
    fn test_genesis_requires_empty_id() {
        let input_id = rand_output_id();
        let setup = setup(
            vec![(input_id, basic_output(100, rand_address()))],
            vec![Output::Nft(nft_output(NftId([3; 32])))],
        );

        let params = setup.params();
        assert_eq!(
            validate_chain(&params, ChainId::Nft(NftId([3; 32]))),
            Err(TransitionError::NonEmptyGenesisChainId)
        );
    }

    #[test]
    fn test_genesis_with_unlocked_issuer() {
        let issuer = rand_address();
        let mut nft = nft_output(NftId::null());
        nft.immutable_features = vec![Feature::Issuer(IssuerFeature { address: issuer })].into();

        let input_id = rand_output_id();
        let mut setup = setup(
            vec![(input_id, basic_output(100, rand_address()))],
            vec![Output::Nft(nft)],
        );

        let params = setup.params();
        let chain_id = *params.working_set.out_chains.keys().next().unwrap();
        assert_eq!(validate_chain(&params, chain_id), Err(TransitionError::IssuerNotUnlocked));

        setup.unlocked.insert(issuer);
        let params = setup.params();
        assert_eq!(validate_chain(&params, chain_id), Ok(()));
    }

    #[test]
    fn test_state_change_keeps_immutable_features() {
        let nft_id = NftId([3; 32]);
        let mut current = nft_output(nft_id);
        current.immutable_features = vec![Feature::Issuer(IssuerFeature { address: rand_address() })].into();
        let mut next = current.clone();
        next.immutable_features = Default::default();

        let input_id = rand_output_id();
        let setup = setup(
            vec![(input_id, Output::Nft(current))],
            vec![Output::Nft(next)],
        );

        let params = setup.params();
        assert_eq!(
            validate_chain(&params, ChainId::Nft(nft_id)),
            Err(TransitionError::ImmutableFeaturesChanged)
        );
    }

    #[test]
    fn test_destruction_requires_capability() {
        let nft_id = NftId([3; 32]);
        let input_id = rand_output_id();
        let mut setup = setup(vec![(input_id, Output::Nft(nft_output(nft_id)))], Vec::new());
        setup.tx.capabilities = TransactionCapabilities::none();

        let params = setup.params();
        assert_eq!(
            validate_chain(&params, ChainId::Nft(nft_id)),
            Err(TransitionError::DestructionNotAllowed { kind: NftOutput::KIND })
        );

        setup.tx.capabilities = TransactionCapabilities::all();
        let params = setup.params();
        assert_eq!(validate_chain(&params, ChainId::Nft(nft_id)), Ok(()));
    }
}
