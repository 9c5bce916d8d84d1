// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Semantic validation of transactions, the chain state transition validation
//! function and the per-type transition rules.
//!
//! [`execute`] builds a fresh [`WorkingSet`] for the transaction and runs the
//! ordered execution steps over it. [`chain_stvf`] is the dispatcher routing
//! each chain output pairing to the validator of its concrete type.

mod account;
mod anchor;
mod delegation;
mod error;
mod foundry;
mod nft;
mod working_set;

use std::collections::HashSet;

use tracing::{debug, trace};

pub use self::{
    error::TransitionError,
    working_set::{ChainOutputWithIds, LedgerOutput, ResolvedInputs, UnlockedAddresses, WorkingSet},
};
use crate::{
    error::Error,
    model::{
        ChainId, Commitment, Features, FoundryId, ManaDecayProvider, Output, ProtocolParameters, Transaction,
        TransitionType, MAX_NATIVE_TOKEN_COUNT,
    },
};

/// The parameters under which the virtual machine operates.
pub struct VmParams<'a> {
    /// The protocol parameters validation happens under.
    pub protocol: &'a ProtocolParameters,
    /// The mana decay and generation arithmetic.
    pub mana_decay: &'a dyn ManaDecayProvider,
    /// The per-transaction working set.
    pub working_set: WorkingSet<'a>,
}

impl VmParams<'_> {
    /// The commitment input, required by commitment-bounded rules.
    pub(crate) fn commitment(&self) -> Result<Commitment, TransitionError> {
        self.working_set.commitment.ok_or(TransitionError::CommitmentInputRequired)
    }
}

/// A single step of the execution pipeline, operating over the shared working
/// set.
pub type ExecStep = fn(&VmParams<'_>) -> Result<(), Error>;

/// The ordered execution steps of the semantic validation pipeline.
///
/// Unlock resolution and the timelock and base token balance checks run
/// outside of this crate, before these steps.
pub const EXEC_STEPS: &[ExecStep] = &[balanced_native_tokens, chain_transitions, balanced_mana];

/// Semantically validates a transaction against its resolved inputs and
/// returns the resulting outputs.
pub fn execute(
    tx: &Transaction,
    resolved: &ResolvedInputs,
    unlocked_addresses: &UnlockedAddresses,
    protocol: &ProtocolParameters,
    mana_decay: &dyn ManaDecayProvider,
) -> Result<Vec<Output>, Error> {
    debug!(transaction = %tx.transaction_id, "executing transaction");

    let params = VmParams {
        protocol,
        mana_decay,
        working_set: WorkingSet::new(tx, resolved, unlocked_addresses, mana_decay)?,
    };

    for step in EXEC_STEPS {
        step(&params)?;
    }

    Ok(tx.outputs.clone())
}

/// Validates the native token balance between the input and output side.
///
/// A token may only grow if its foundry transitions within the same
/// transaction and may only shrink without its foundry if the transaction is
/// allowed to burn.
pub fn balanced_native_tokens(params: &VmParams<'_>) -> Result<(), Error> {
    let ws = &params.working_set;

    let distinct = ws
        .in_native_tokens
        .keys()
        .chain(ws.out_native_tokens.keys())
        .collect::<HashSet<_>>();
    if distinct.len() > MAX_NATIVE_TOKEN_COUNT {
        return Err(Error::MaxNativeTokensExceeded {
            count: distinct.len(),
            max: MAX_NATIVE_TOKEN_COUNT,
        });
    }

    for (token_id, in_amount) in &ws.in_native_tokens {
        if ws.out_chains.contains_key(&ChainId::Foundry(FoundryId::from(*token_id))) {
            continue;
        }
        let out_amount = ws.out_native_tokens.get(token_id).copied().unwrap_or_default();
        if *in_amount < out_amount {
            return Err(Error::NativeTokenSumUnbalanced { token_id: *token_id });
        }
        if *in_amount > out_amount && !ws.tx.capabilities.can_burn_native_tokens() {
            return Err(Error::NativeTokenBurningNotAllowed { token_id: *token_id });
        }
    }

    for token_id in ws.out_native_tokens.keys() {
        if ws.in_native_tokens.contains_key(token_id) {
            continue;
        }
        // A token appearing out of nowhere needs its minting foundry.
        if !ws.out_chains.contains_key(&ChainId::Foundry(FoundryId::from(*token_id))) {
            return Err(Error::NativeTokenSumUnbalanced { token_id: *token_id });
        }
    }

    Ok(())
}

/// Runs the chain state transition validation function over every chain
/// output pairing of the transaction.
pub fn chain_transitions(params: &VmParams<'_>) -> Result<(), Error> {
    let ws = &params.working_set;

    for (chain_id, input_chain) in &ws.in_chains {
        let (transition, next) = match ws.out_chains.get(chain_id) {
            Some(next) => (TransitionType::StateChange, Some(*next)),
            None => (TransitionType::Destroy, None),
        };
        trace!(chain = %chain_id, %transition, "validating chain transition");
        chain_stvf(params, transition, Some(input_chain), next).map_err(|source| Error::ChainTransition {
            chain_id: *chain_id,
            transition,
            source,
        })?;
    }

    for (chain_id, next) in &ws.out_chains {
        if ws.in_chains.contains_key(chain_id) {
            continue;
        }
        trace!(chain = %chain_id, "validating chain genesis");
        chain_stvf(params, TransitionType::Genesis, None, Some(*next)).map_err(|source| Error::ChainTransition {
            chain_id: *chain_id,
            transition: TransitionType::Genesis,
            source,
        })?;
    }

    Ok(())
}

/// Validates that the mana provided by the inputs and claimed rewards covers
/// the mana moved to outputs and allotments, and that a surplus is allowed to
/// be burned.
pub fn balanced_mana(params: &VmParams<'_>) -> Result<(), Error> {
    let ws = &params.working_set;

    // Whether claiming the rewards is legal is decided by the staking and
    // delegation transition rules.
    let mut mana_in = ws.total_mana_in;
    for reward in ws.rewards.values() {
        mana_in = mana_in.checked_add(*reward).ok_or(Error::ManaOverflow)?;
    }
    let mana_out = ws.total_mana_out;

    if mana_in < mana_out {
        return Err(Error::UnbalancedMana { mana_in, mana_out });
    }
    if mana_in > mana_out && !ws.tx.capabilities.can_burn_mana() {
        return Err(Error::ManaBurningNotAllowed);
    }

    Ok(())
}

/// Routes a chain output pairing to the validation function of its concrete
/// type.
///
/// The type anchor is the proposed next output at genesis and the prior
/// output otherwise. A non-chain output reaching this dispatcher is a
/// programming error, not a validation failure.
pub fn chain_stvf(
    params: &VmParams<'_>,
    transition: TransitionType,
    input: Option<&ChainOutputWithIds<'_>>,
    next: Option<&Output>,
) -> Result<(), TransitionError> {
    let transition_state = match transition {
        TransitionType::Genesis => next,
        _ => input.map(|input| input.output),
    };

    match transition_state {
        Some(Output::Account(_)) => {
            let next = match next {
                Some(Output::Account(account)) => Some(account),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            account::account_stvf(params, transition, input, next)
        }
        Some(Output::Basic(basic)) if basic.is_implicit_account() => {
            let next = match next {
                Some(Output::Account(account)) => Some(account),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            account::implicit_account_stvf(params, transition, input, next)
        }
        Some(Output::Anchor(_)) => {
            let next = match next {
                Some(Output::Anchor(anchor)) => Some(anchor),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            anchor::anchor_stvf(params, transition, input, next)
        }
        Some(Output::Foundry(_)) => {
            let next = match next {
                Some(Output::Foundry(foundry)) => Some(foundry),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            foundry::foundry_stvf(params, transition, input, next)
        }
        Some(Output::Nft(_)) => {
            let next = match next {
                Some(Output::Nft(nft)) => Some(nft),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            nft::nft_stvf(params, transition, input, next)
        }
        Some(Output::Delegation(_)) => {
            let next = match next {
                Some(Output::Delegation(delegation)) => Some(delegation),
                Some(_) => return Err(TransitionError::NextOutputTypeMismatch),
                None => None,
            };
            delegation::delegation_stvf(params, transition, input, next)
        }
        Some(Output::Basic(_)) | None => {
            unreachable!("no chain output routed to the chain state transition dispatcher")
        }
    }
}

/// Checks that the issuer of a newly created chain output has been unlocked.
/// This is a no-op if the output carries no issuer feature.
pub(crate) fn issuer_unlocked(
    immutable_features: &Features,
    unlocked_addresses: &UnlockedAddresses,
) -> Result<(), TransitionError> {
    if let Some(issuer) = immutable_features.issuer() {
        if !unlocked_addresses.is_unlocked(&issuer.address) {
            return Err(TransitionError::IssuerNotUnlocked);
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{
        AccountAddress, AccountId, AccountOutput, Address, AddressUnlockCondition, AnchorId, AnchorOutput,
        BasicOutput, BlockIssuerFeature, DelegationId, DelegationOutput, Ed25519Address, EpochIndex, Feature,
        FoundryOutput, GovernorAddressUnlockCondition, ImmutableAccountAddressUnlockCondition, ManaError, NativeToken,
        NftId, NftOutput, OutputId, SimpleTokenScheme, SlotIndex, StakingFeature,
        StateControllerAddressUnlockCondition, TokenAmount, TokenId, TokenScheme, TransactionCapabilities,
        TransactionId, Transaction,
    };

    /// Mana arithmetic with no decay and no generation, enough for testing
    /// the transition rules.
    pub(crate) struct NoManaDecay;

    pub(crate) const NO_MANA_DECAY: NoManaDecay = NoManaDecay;

    impl ManaDecayProvider for NoManaDecay {
        fn mana_with_decay(
            &self,
            mana: u64,
            creation_slot: SlotIndex,
            target_slot: SlotIndex,
        ) -> Result<u64, ManaError> {
            if creation_slot > target_slot {
                return Err(ManaError::InvalidSlotOrder {
                    creation_slot,
                    target_slot,
                });
            }
            Ok(mana)
        }

        fn mana_generation_with_decay(
            &self,
            _amount: u64,
            creation_slot: SlotIndex,
            target_slot: SlotIndex,
        ) -> Result<u64, ManaError> {
            if creation_slot > target_slot {
                return Err(ManaError::InvalidSlotOrder {
                    creation_slot,
                    target_slot,
                });
            }
            Ok(0)
        }
    }

    pub(crate) fn rand_output_id() -> OutputId {
        OutputId {
            transaction_id: TransactionId(rand::random()),
            index: 0,
        }
    }

    pub(crate) fn rand_address() -> Address {
        Address::Ed25519(Ed25519Address(rand::random()))
    }

    pub(crate) fn rand_account_id() -> AccountId {
        AccountId(rand::random())
    }

    pub(crate) fn basic_output(amount: u64, address: Address) -> Output {
        Output::Basic(BasicOutput {
            amount,
            mana: 0,
            native_tokens: Vec::new().into(),
            address_unlock_condition: AddressUnlockCondition { address },
            timelock_unlock_condition: None,
            features: Default::default(),
        })
    }

    pub(crate) fn account_output(account_id: AccountId) -> AccountOutput {
        AccountOutput {
            amount: 100,
            mana: 0,
            native_tokens: Vec::new().into(),
            account_id,
            foundry_counter: 0,
            address_unlock_condition: AddressUnlockCondition { address: rand_address() },
            features: Default::default(),
            immutable_features: Default::default(),
        }
    }

    pub(crate) fn anchor_output(anchor_id: AnchorId) -> AnchorOutput {
        AnchorOutput {
            amount: 100,
            mana: 0,
            native_tokens: Vec::new().into(),
            anchor_id,
            state_index: 0,
            state_metadata: Vec::new().into(),
            state_controller_address_unlock_condition: StateControllerAddressUnlockCondition {
                address: rand_address(),
            },
            governor_address_unlock_condition: GovernorAddressUnlockCondition { address: rand_address() },
            features: Default::default(),
            immutable_features: Default::default(),
        }
    }

    pub(crate) fn nft_output(nft_id: NftId) -> NftOutput {
        NftOutput {
            amount: 100,
            mana: 0,
            native_tokens: Vec::new().into(),
            nft_id,
            address_unlock_condition: AddressUnlockCondition { address: rand_address() },
            timelock_unlock_condition: None,
            features: Default::default(),
            immutable_features: Default::default(),
        }
    }

    pub(crate) fn delegation_output(delegation_id: DelegationId, amount: u64) -> DelegationOutput {
        DelegationOutput {
            amount,
            delegated_amount: amount,
            delegation_id,
            validator_address: AccountAddress(rand_account_id()),
            start_epoch: EpochIndex(0),
            end_epoch: EpochIndex(0),
            address_unlock_condition: AddressUnlockCondition { address: rand_address() },
        }
    }

    pub(crate) fn foundry_output(account_id: AccountId, serial_number: u32, token_scheme: TokenScheme) -> FoundryOutput {
        FoundryOutput {
            amount: 100,
            native_tokens: Vec::new().into(),
            serial_number,
            token_scheme,
            immutable_account_address_unlock_condition: ImmutableAccountAddressUnlockCondition {
                address: AccountAddress(account_id),
            },
            features: Default::default(),
            immutable_features: Default::default(),
        }
    }

    pub(crate) fn simple_scheme(minted: u64, melted: u64, maximum: u64) -> TokenScheme {
        TokenScheme::Simple(SimpleTokenScheme {
            minted_tokens: minted.into(),
            melted_tokens: melted.into(),
            maximum_supply: maximum.into(),
        })
    }

    pub(crate) fn native_token(token_id: TokenId, amount: u64) -> NativeToken {
        NativeToken {
            token_id,
            amount: TokenAmount::from(amount),
        }
    }

    pub(crate) fn block_issuer_feature(expiry_slot: SlotIndex) -> Feature {
        Feature::BlockIssuer(BlockIssuerFeature {
            expiry_slot,
            block_issuer_keys: vec![crate::model::Ed25519BlockIssuerKey(rand::random())].into(),
        })
    }

    pub(crate) fn staking_feature(staked_amount: u64, start_epoch: EpochIndex, end_epoch: EpochIndex) -> Feature {
        Feature::Staking(StakingFeature {
            staked_amount,
            fixed_cost: 1,
            start_epoch,
            end_epoch,
        })
    }

    /// The owned pieces needed to build [`VmParams`] for a validation call.
    pub(crate) struct VmSetup {
        pub(crate) protocol: ProtocolParameters,
        pub(crate) tx: Transaction,
        pub(crate) resolved: ResolvedInputs,
        pub(crate) unlocked: UnlockedAddresses,
    }

    impl VmSetup {
        pub(crate) fn params(&self) -> VmParams<'_> {
            VmParams {
                protocol: &self.protocol,
                mana_decay: &NO_MANA_DECAY,
                working_set: WorkingSet::new(&self.tx, &self.resolved, &self.unlocked, &NO_MANA_DECAY)
                    .expect("working set construction failed"),
            }
        }
    }

    pub(crate) fn setup(inputs: Vec<(OutputId, Output)>, outputs: Vec<Output>) -> VmSetup {
        let tx = Transaction {
            transaction_id: TransactionId(rand::random()),
            network_id: 0,
            creation_slot: SlotIndex(100),
            context_inputs: Vec::new(),
            inputs: inputs.iter().map(|(output_id, _)| *output_id).collect(),
            capabilities: TransactionCapabilities::all(),
            mana_allotments: Vec::new(),
            outputs,
        };
        let resolved = ResolvedInputs {
            inputs: inputs
                .into_iter()
                .map(|(output_id, output)| {
                    (
                        output_id,
                        LedgerOutput {
                            output_id,
                            slot_booked: SlotIndex(0),
                            output,
                        },
                    )
                })
                .collect(),
            block_issuance_credits: BTreeMap::new(),
            commitment: None,
            rewards: BTreeMap::new(),
        };

        VmSetup {
            protocol: ProtocolParameters::default(),
            tx,
            resolved,
            unlocked: UnlockedAddresses::default(),
        }
    }

    /// Pairs the chain like the execution step would and runs the dispatcher
    /// on it.
    pub(crate) fn validate_chain(params: &VmParams<'_>, chain_id: ChainId) -> Result<(), TransitionError> {
        let input = params.working_set.in_chains.get(&chain_id);
        let next = params.working_set.out_chains.get(&chain_id).copied();
        match (input, next) {
            (Some(input), Some(next)) => chain_stvf(params, TransitionType::StateChange, Some(input), Some(next)),
            (Some(input), None) => chain_stvf(params, TransitionType::Destroy, Some(input), None),
            (None, Some(next)) => chain_stvf(params, TransitionType::Genesis, None, Some(next)),
            (None, None) => panic!("chain {chain_id} is not part of the transaction"),
        }
    }

    mod dispatcher {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn test_next_output_type_mismatch() {
            let account_id = rand_account_id();
            let input_id = rand_output_id();
            let setup = setup(
                vec![(input_id, Output::Account(account_output(account_id)))],
                vec![Output::Nft(nft_output(NftId([1; 32])))],
            );
            let params = setup.params();

            let input = params.working_set.in_chains[&ChainId::Account(account_id)];
            let next = basic_output(100, rand_address());
            assert_eq!(
                chain_stvf(&params, TransitionType::StateChange, Some(&input), Some(&next)),
                Err(TransitionError::NextOutputTypeMismatch)
            );
        }

        #[test]
        fn test_execute_simple_transfer() {
            let input_id = rand_output_id();
            let setup = setup(
                vec![(input_id, basic_output(100, rand_address()))],
                vec![basic_output(100, rand_address())],
            );

            assert_eq!(
                execute(&setup.tx, &setup.resolved, &setup.unlocked, &setup.protocol, &NO_MANA_DECAY),
                Ok(setup.tx.outputs.clone())
            );
        }

        #[test]
        fn test_execute_wraps_transition_errors_with_chain_context() {
            let input_id = rand_output_id();
            // Destroying an account without the capability.
            let account_id = rand_account_id();
            let mut setup = setup(vec![(input_id, Output::Account(account_output(account_id)))], Vec::new());
            setup.tx.capabilities = TransactionCapabilities::none();

            assert_eq!(
                execute(&setup.tx, &setup.resolved, &setup.unlocked, &setup.protocol, &NO_MANA_DECAY),
                Err(Error::ChainTransition {
                    chain_id: ChainId::Account(account_id),
                    transition: TransitionType::Destroy,
                    source: TransitionError::DestructionNotAllowed {
                        kind: AccountOutput::KIND
                    },
                })
            );
        }
    }

    mod balanced_tokens {
        use pretty_assertions::assert_eq;

        use super::*;

        fn token_id() -> TokenId {
            foundry_output(rand_account_id(), 1, simple_scheme(100, 0, 1000)).native_token_id()
        }

        #[test]
        fn test_minting_without_foundry_is_rejected() {
            let token_id = token_id();
            let input_id = rand_output_id();
            let mut setup = setup(
                vec![(input_id, basic_output(100, rand_address()))],
                vec![basic_output(100, rand_address())],
            );
            let Output::Basic(ref mut output) = setup.tx.outputs[0] else {
                unreachable!()
            };
            output.native_tokens = vec![native_token(token_id, 10)].into();

            assert_eq!(
                balanced_native_tokens(&setup.params()),
                Err(Error::NativeTokenSumUnbalanced { token_id })
            );
        }

        #[test]
        fn test_burning_requires_capability() {
            let token_id = token_id();
            let input_id = rand_output_id();
            let mut input = basic_output(100, rand_address());
            let Output::Basic(ref mut basic) = input else { unreachable!() };
            basic.native_tokens = vec![native_token(token_id, 10)].into();

            let mut setup = setup(vec![(input_id, input)], vec![basic_output(100, rand_address())]);
            setup.tx.capabilities = TransactionCapabilities::none();
            assert_eq!(
                balanced_native_tokens(&setup.params()),
                Err(Error::NativeTokenBurningNotAllowed { token_id })
            );

            setup.tx.capabilities = TransactionCapabilities::all();
            assert_eq!(balanced_native_tokens(&setup.params()), Ok(()));
        }

        #[test]
        fn test_balanced_tokens_pass_without_foundry() {
            let token_id = token_id();
            let input_id = rand_output_id();
            let mut input = basic_output(100, rand_address());
            let Output::Basic(ref mut basic) = input else { unreachable!() };
            basic.native_tokens = vec![native_token(token_id, 10)].into();

            let mut setup = setup(vec![(input_id, input)], vec![basic_output(100, rand_address())]);
            let Output::Basic(ref mut output) = setup.tx.outputs[0] else {
                unreachable!()
            };
            output.native_tokens = vec![native_token(token_id, 10)].into();
            setup.tx.capabilities = TransactionCapabilities::none();

            assert_eq!(balanced_native_tokens(&setup.params()), Ok(()));
        }
    }

    mod balanced_mana {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn test_mana_deficit_is_rejected() {
            let input_id = rand_output_id();
            let mut setup = setup(
                vec![(input_id, basic_output(100, rand_address()))],
                vec![basic_output(100, rand_address())],
            );
            let Output::Basic(ref mut output) = setup.tx.outputs[0] else {
                unreachable!()
            };
            output.mana = 50;

            assert_eq!(
                super::super::balanced_mana(&setup.params()),
                Err(Error::UnbalancedMana { mana_in: 0, mana_out: 50 })
            );
        }

        #[test]
        fn test_mana_surplus_requires_burn_capability() {
            let input_id = rand_output_id();
            let mut input = basic_output(100, rand_address());
            let Output::Basic(ref mut basic) = input else { unreachable!() };
            basic.mana = 50;

            let mut setup = setup(vec![(input_id, input)], vec![basic_output(100, rand_address())]);
            setup.tx.capabilities = TransactionCapabilities::none();
            assert_eq!(
                super::super::balanced_mana(&setup.params()),
                Err(Error::ManaBurningNotAllowed)
            );

            setup.tx.capabilities = TransactionCapabilities::all();
            assert_eq!(super::super::balanced_mana(&setup.params()), Ok(()));
        }

        #[test]
        fn test_rewards_count_towards_mana_in() {
            let input_id = rand_output_id();
            let mut setup = setup(
                vec![(input_id, basic_output(100, rand_address()))],
                vec![basic_output(100, rand_address())],
            );
            let Output::Basic(ref mut output) = setup.tx.outputs[0] else {
                unreachable!()
            };
            output.mana = 50;
            setup
                .resolved
                .rewards
                .insert(ChainId::Delegation(DelegationId([9; 32])), 50);

            assert_eq!(super::super::balanced_mana(&setup.params()), Ok(()));
        }
    }
}
