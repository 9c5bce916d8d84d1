// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Common helpers for the integration tests.

use std::collections::BTreeMap;

use nova_vm::{
    model::{
        AccountId, AccountOutput, Address, AddressUnlockCondition, BasicOutput, Ed25519Address, ManaDecayProvider,
        ManaError, Output, OutputId, ProtocolParameters, SlotIndex, Transaction, TransactionCapabilities,
        TransactionId,
    },
    vm::{LedgerOutput, ResolvedInputs, UnlockedAddresses},
};

/// Mana arithmetic with no decay and no generation.
pub struct NoManaDecay;

impl ManaDecayProvider for NoManaDecay {
    fn mana_with_decay(&self, mana: u64, creation_slot: SlotIndex, target_slot: SlotIndex) -> Result<u64, ManaError> {
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

#[allow(unused)]
pub fn rand_output_id() -> OutputId {
    OutputId {
        transaction_id: TransactionId(rand::random()),
        index: 0,
    }
}

#[allow(unused)]
pub fn rand_address() -> Address {
    Address::Ed25519(Ed25519Address(rand::random()))
}

#[allow(unused)]
pub fn rand_account_id() -> AccountId {
    AccountId(rand::random())
}

#[allow(unused)]
pub fn basic_output(amount: u64, address: Address) -> Output {
    Output::Basic(BasicOutput {
        amount,
        mana: 0,
        native_tokens: Vec::new().into(),
        address_unlock_condition: AddressUnlockCondition { address },
        timelock_unlock_condition: None,
        features: Default::default(),
    })
}

#[allow(unused)]
pub fn account_output(account_id: AccountId) -> AccountOutput {
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

/// Builds a transaction consuming the given inputs, alongside the resolved
/// input set the ledger would supply for it.
#[allow(unused)]
pub fn transaction(
    inputs: Vec<(OutputId, Output)>,
    outputs: Vec<Output>,
) -> (Transaction, ResolvedInputs, UnlockedAddresses, ProtocolParameters) {
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

    (tx, resolved, UnlockedAddresses::default(), ProtocolParameters::default())
}
