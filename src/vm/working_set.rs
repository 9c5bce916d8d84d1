// Copyright 2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The per-transaction context the validation functions operate over.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    model::{
        AccountId, Address, BlockIssuanceCredits, ChainId, Commitment, ManaDecayProvider, Output, OutputId, SlotIndex,
        TokenAmount, TokenId, Transaction,
    },
};

/// An output as booked in the ledger, together with its identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOutput {
    /// The identifier of the output.
    pub output_id: OutputId,
    /// The slot the output was booked into the ledger.
    pub slot_booked: SlotIndex,
    /// The output itself.
    pub output: Output,
}

impl LedgerOutput {
    /// The chain identifier of this input, deriving empty embedded
    /// identifiers from the identifier of the output. A basic output held by
    /// an implicit account creation address is treated as an account chain.
    pub fn chain_id(&self) -> Option<ChainId> {
        match &self.output {
            Output::Basic(basic) if basic.is_implicit_account() => {
                Some(ChainId::Account(AccountId::from_output_id(&self.output_id)))
            }
            output => output.chain_id(&self.output_id),
        }
    }
}

/// The inputs of a transaction resolved against the ledger, supplied by the
/// caller.
#[derive(Clone, Debug, Default)]
pub struct ResolvedInputs {
    /// The consumed outputs by their identifier.
    pub inputs: BTreeMap<OutputId, LedgerOutput>,
    /// The block issuance credit balances of the accounts touched by the
    /// transaction.
    pub block_issuance_credits: BTreeMap<AccountId, BlockIssuanceCredits>,
    /// The commitment referenced by the transaction, if any.
    pub commitment: Option<Commitment>,
    /// The mana rewards claimable per chain.
    pub rewards: BTreeMap<ChainId, u64>,
}

/// The set of addresses unlocked on the input side of a transaction, produced
/// by the address unlock resolver outside of this crate.
#[derive(Clone, Debug, Default)]
pub struct UnlockedAddresses(HashSet<Address>);

impl UnlockedAddresses {
    /// Marks an address as unlocked.
    pub fn insert(&mut self, address: Address) {
        self.0.insert(address);
    }

    /// Whether the given address has been unlocked.
    pub fn is_unlocked(&self, address: &Address) -> bool {
        self.0.contains(address)
    }
}

impl FromIterator<Address> for UnlockedAddresses {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The resolved prior-state instance of a chain output. Read-only to the
/// validation functions.
#[derive(Copy, Clone, Debug)]
pub struct ChainOutputWithIds<'a> {
    /// The identifier of the chain.
    pub chain_id: ChainId,
    /// The identifier of the consumed output.
    pub output_id: OutputId,
    /// The consumed output.
    pub output: &'a Output,
}

/// The per-transaction working set: every map is populated exactly once at
/// construction and never mutated afterwards.
pub struct WorkingSet<'a> {
    /// The transaction being validated.
    pub tx: &'a Transaction,
    /// The addresses unlocked on the input side.
    pub unlocked_addresses: &'a UnlockedAddresses,
    /// The resolved UTXO inputs by their identifier.
    pub utxo_inputs: &'a BTreeMap<OutputId, LedgerOutput>,
    /// The chain outputs on the input side by their chain id.
    pub in_chains: BTreeMap<ChainId, ChainOutputWithIds<'a>>,
    /// The chain outputs on the output side by their (derived) chain id.
    pub out_chains: BTreeMap<ChainId, &'a Output>,
    /// The native token sums of the input side.
    pub in_native_tokens: BTreeMap<TokenId, TokenAmount>,
    /// The native token sums of the output side.
    pub out_native_tokens: BTreeMap<TokenId, TokenAmount>,
    /// The block issuance credit balances of the touched accounts.
    pub bic: &'a BTreeMap<AccountId, BlockIssuanceCredits>,
    /// The commitment referenced by the transaction, if any.
    pub commitment: Option<Commitment>,
    /// The mana rewards claimable per chain.
    pub rewards: &'a BTreeMap<ChainId, u64>,
    /// The decayed stored and generated mana of the whole input side.
    pub total_mana_in: u64,
    /// The stored and allotted mana of the whole output side.
    pub total_mana_out: u64,
}

impl<'a> WorkingSet<'a> {
    /// Builds the working set of a transaction from its resolved inputs.
    pub fn new(
        tx: &'a Transaction,
        resolved: &'a ResolvedInputs,
        unlocked_addresses: &'a UnlockedAddresses,
        mana_decay: &dyn ManaDecayProvider,
    ) -> Result<Self, Error> {
        for (index, input) in tx.inputs.iter().enumerate() {
            if !resolved.inputs.contains_key(input) {
                return Err(Error::MissingUtxo { index: index as u16 });
            }
        }

        let mut in_chains = BTreeMap::new();
        for ledger_output in resolved.inputs.values() {
            if let Some(chain_id) = ledger_output.chain_id() {
                in_chains.insert(
                    chain_id,
                    ChainOutputWithIds {
                        chain_id,
                        output_id: ledger_output.output_id,
                        output: &ledger_output.output,
                    },
                );
            }
        }

        let mut out_chains = BTreeMap::new();
        for (index, output) in tx.outputs.iter().enumerate() {
            if let Some(chain_id) = output.chain_id(&tx.output_id(index as u16)) {
                if out_chains.insert(chain_id, output).is_some() {
                    return Err(Error::DuplicateChainId { chain_id });
                }
            }
        }

        let in_native_tokens = native_token_sums(resolved.inputs.values().map(|input| &input.output))?;
        let out_native_tokens = native_token_sums(tx.outputs.iter())?;

        let mut total_mana_in = 0u64;
        for ledger_output in resolved.inputs.values() {
            if ledger_output.slot_booked > tx.creation_slot {
                return Err(Error::InputBookedAfterTransaction {
                    output_id: ledger_output.output_id,
                });
            }
            let stored =
                mana_decay.mana_with_decay(ledger_output.output.mana(), ledger_output.slot_booked, tx.creation_slot)?;
            let potential = mana_decay.mana_generation_with_decay(
                ledger_output.output.amount(),
                ledger_output.slot_booked,
                tx.creation_slot,
            )?;
            total_mana_in = total_mana_in
                .checked_add(stored)
                .and_then(|mana| mana.checked_add(potential))
                .ok_or(Error::ManaOverflow)?;
        }

        let mut total_mana_out = 0u64;
        for output in &tx.outputs {
            total_mana_out = total_mana_out.checked_add(output.mana()).ok_or(Error::ManaOverflow)?;
        }
        for allotment in &tx.mana_allotments {
            total_mana_out = total_mana_out.checked_add(allotment.mana).ok_or(Error::ManaOverflow)?;
        }

        Ok(Self {
            tx,
            unlocked_addresses,
            utxo_inputs: &resolved.inputs,
            in_chains,
            out_chains,
            in_native_tokens,
            out_native_tokens,
            bic: &resolved.block_issuance_credits,
            commitment: resolved.commitment,
            rewards: &resolved.rewards,
            total_mana_in,
            total_mana_out,
        })
    }

    /// The slot at which the given input was booked into the ledger. The
    /// caller must pass the identifier of a resolved input.
    pub fn slot_booked(&self, output_id: &OutputId) -> SlotIndex {
        self.utxo_inputs[output_id].slot_booked
    }

    /// Whether the transaction claims the rewards of the given chain.
    pub fn is_claiming_rewards(&self, chain_id: &ChainId) -> bool {
        self.rewards.contains_key(chain_id)
    }
}

/// Sums up the native token amounts of a set of outputs per token id,
/// detecting overflow.
fn native_token_sums<'a>(outputs: impl Iterator<Item = &'a Output>) -> Result<BTreeMap<TokenId, TokenAmount>, Error> {
    let mut sums = BTreeMap::<TokenId, TokenAmount>::new();
    for output in outputs {
        for token in output.native_tokens() {
            let sum = sums.entry(token.token_id).or_default();
            *sum = sum.checked_add(token.amount).ok_or(Error::NativeTokenOverflow)?;
        }
    }

    Ok(sums)
}
