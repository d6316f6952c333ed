//! Loading moves cold balance into a hot account.
//!
//! A load runs in three steps, each consuming the previous step's output:
//! [`plan_load`] validates the interface and selects inputs,
//! [`prove_load_plan`] fetches one validity proof per chunk concurrently,
//! and [`assemble_load_batches`] builds the instructions.
use std::collections::HashSet;

use futures::future::try_join_all;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use tracing::{debug, trace};

use crate::{
    address::{get_associated_token_address_interface, AtaType},
    compute_units::{estimate_compute_units, ComputeUnitShape},
    constants::MAX_INPUT_ACCOUNTS,
    error::{Result, TokenInterfaceError},
    fetch::get_ata_interface,
    indexer::{Indexer, ProofInput, TreeType, ValidityProofWithContext},
    instructions::{compute_budget_instruction, create_ata_idempotent_instruction, Decompress, Wrap},
    interface::{checked_sum, AccountInterface},
    options::{ComputeBudgetConfig, InterfaceOptions, SplInterfaceInfo},
    rpc::Rpc,
    selection::select_inputs_for_amount,
    source::{TokenAccountSource, TokenAccountSourceType},
    tx_size::check_bundle_sizes,
};

/// One independently submittable unit of load work.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalLoadBatch {
    pub instructions: Vec<Instruction>,
    /// Cold sources consumed by this batch.
    pub compressed_accounts: Vec<TokenAccountSource>,
    pub wrap_count: u32,
    pub has_ata_creation: bool,
}

impl InternalLoadBatch {
    pub fn compute_unit_shape(&self) -> ComputeUnitShape {
        let prove_by_index_inputs = self
            .compressed_accounts
            .iter()
            .filter(|s| s.load_context.is_some_and(|ctx| ctx.prove_by_index))
            .count() as u32;
        ComputeUnitShape {
            includes_transfer: false,
            account_creations: u32::from(self.has_ata_creation),
            wrap_count: self.wrap_count,
            prove_by_index_inputs,
            full_proof_inputs: self.compressed_accounts.len() as u32 - prove_by_index_inputs,
        }
    }

    pub fn amount(&self) -> Result<u64> {
        checked_sum(self.compressed_accounts.iter().map(|s| s.amount))
    }
}

/// A sibling-standard hot balance folded into the Light token account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapSource {
    pub address: Pubkey,
    pub amount: u64,
    pub spl_interface: SplInterfaceInfo,
}

/// Validated, selected load work. Holds everything needed to request
/// proofs and assemble instructions.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadPlan {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub payer: Pubkey,
    /// Signs for every input, as owner or as delegate.
    pub authority: Pubkey,
    pub destination: Pubkey,
    pub destination_type: AtaType,
    pub create_destination: bool,
    pub wraps: Vec<WrapSource>,
    pub chunks: Vec<Vec<TokenAccountSource>>,
    /// Pool used when decompressing into an SPL or Token-2022 account.
    pub spl_interface: Option<SplInterfaceInfo>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProvedLoadPlan {
    pub plan: LoadPlan,
    /// One per chunk, in chunk order.
    pub proofs: Vec<ValidityProofWithContext>,
}

/// Fails on the first hash that appears twice.
pub fn assert_unique_input_hashes<'a>(
    sources: impl IntoIterator<Item = &'a TokenAccountSource>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for source in sources {
        if let Some(hash) = source.hash() {
            if !seen.insert(hash) {
                return Err(TokenInterfaceError::DuplicateCommitment {
                    hash: source.hash_base58(),
                });
            }
        }
    }
    Ok(())
}

fn can_spend(source: &TokenAccountSource, authority: &Pubkey) -> bool {
    source.parsed.owner == *authority || source.parsed.delegate.as_ref() == Some(authority)
}

/// Validates `interface` and selects the work needed to load it.
///
/// With `target_amount` only enough cold balance to cover the target on top
/// of the spendable hot balance is selected. Returns `None` if there is
/// nothing to do.
pub fn plan_load(
    interface: &AccountInterface,
    payer: Pubkey,
    authority: Pubkey,
    options: &InterfaceOptions,
    target_amount: Option<u64>,
) -> Result<Option<LoadPlan>> {
    options.validate()?;
    let owner = interface.owner;
    let mint = interface.mint;
    let destination_type = options.ata_type;
    let destination = get_associated_token_address_interface(&owner, &mint, destination_type);
    let destination_hot = interface
        .sources
        .iter()
        .find(|s| s.source_type == destination_type.hot_source_type());

    if destination_hot.is_some_and(|s| s.is_frozen()) {
        return Err(TokenInterfaceError::AccountFrozen {
            address: destination,
        });
    }
    let sibling_hot = interface.sources.iter().filter(|s| {
        matches!(
            s.source_type,
            TokenAccountSourceType::Spl | TokenAccountSourceType::Token2022
        )
    });
    if options.wrap {
        if let Some(frozen) = sibling_hot.clone().find(|s| s.is_frozen()) {
            return Err(TokenInterfaceError::AccountFrozen {
                address: frozen.address,
            });
        }
    }
    if !interface.sources.is_empty() && interface.sources.iter().all(|s| s.is_frozen()) {
        return Err(TokenInterfaceError::AccountFrozen {
            address: interface.address,
        });
    }

    let wraps: Vec<WrapSource> = if options.wrap {
        sibling_hot
            .filter_map(|s| {
                let amount = s.spendable_for(&authority);
                (amount > 0).then(|| WrapSource {
                    address: s.address,
                    amount,
                    spl_interface: options
                        .spl_interface_for(mint, s.source_type.ata_type().token_program()),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let eligible: Vec<TokenAccountSource> = interface
        .cold_sources()
        .filter(|s| s.source_type == destination_type.cold_source_type())
        .filter(|s| !s.is_frozen() && can_spend(s, &authority))
        .cloned()
        .collect();
    for source in &eligible {
        if let Some(ctx) = source.load_context.as_ref() {
            if ctx.tree_info.tree_type != TreeType::StateV2 {
                return Err(TokenInterfaceError::UnsupportedTreeVersion {
                    hash: source.hash_base58(),
                    tree_type: ctx.tree_info.tree_type,
                });
            }
        }
    }

    let selected = match target_amount {
        None => eligible,
        Some(target) => {
            let hot_available = checked_sum(
                destination_hot
                    .map(|s| s.spendable_for(&authority))
                    .into_iter()
                    .chain(wraps.iter().map(|w| w.amount)),
            )?;
            select_inputs_for_amount(&eligible, target.saturating_sub(hot_available))
        }
    };

    if selected.is_empty() && wraps.is_empty() {
        debug!("Nothing to load for owner {} mint {}", owner, mint);
        return Ok(None);
    }

    let chunks: Vec<Vec<TokenAccountSource>> = selected
        .chunks(MAX_INPUT_ACCOUNTS)
        .map(<[TokenAccountSource]>::to_vec)
        .collect();
    assert_unique_input_hashes(chunks.iter().flatten())?;
    debug!(
        "Planned load of {} cold inputs in {} chunks and {} wraps into {}",
        selected.len(),
        chunks.len(),
        wraps.len(),
        destination
    );

    Ok(Some(LoadPlan {
        owner,
        mint,
        payer,
        authority,
        destination,
        destination_type,
        create_destination: destination_hot.is_none(),
        wraps,
        chunks,
        spl_interface: (destination_type != AtaType::LightToken)
            .then(|| options.spl_interface_for(mint, destination_type.token_program())),
    }))
}

fn proof_inputs(chunk: &[TokenAccountSource]) -> Vec<ProofInput> {
    chunk
        .iter()
        .filter_map(|s| s.load_context.as_ref())
        .map(|ctx| ctx.proof_input())
        .collect()
}

/// Requests every chunk's proof concurrently. One failure fails the plan.
pub async fn prove_load_plan<I: Indexer>(indexer: &I, plan: LoadPlan) -> Result<ProvedLoadPlan> {
    let requests = plan.chunks.iter().enumerate().map(|(i, chunk)| {
        let inputs = proof_inputs(chunk);
        trace!("Requesting proof for chunk {} with {} inputs", i, inputs.len());
        indexer.get_validity_proof(inputs)
    });
    let proofs = try_join_all(requests)
        .await
        .map_err(|e| TokenInterfaceError::ProofUnavailable(e.to_string()))?;
    Ok(ProvedLoadPlan { plan, proofs })
}

/// Batch 0 carries the one time setup, every later batch an idempotent
/// create of the destination, so batches land in any order.
pub fn assemble_load_batches(proved: ProvedLoadPlan) -> Result<Vec<InternalLoadBatch>> {
    let ProvedLoadPlan { plan, proofs } = proved;
    if proofs.len() != plan.chunks.len() {
        return Err(TokenInterfaceError::ProofUnavailable(format!(
            "expected {} proofs, got {}",
            plan.chunks.len(),
            proofs.len()
        )));
    }
    let create_destination = || {
        create_ata_idempotent_instruction(plan.payer, plan.owner, plan.mint, plan.destination_type)
    };

    let mut setup = Vec::with_capacity(1 + plan.wraps.len());
    if plan.create_destination {
        setup.push(create_destination()?);
    }
    for wrap in &plan.wraps {
        setup.push(
            Wrap {
                amount: wrap.amount,
                source_spl_token_account: wrap.address,
                destination_light_token_account: plan.destination,
                authority: plan.authority,
                payer: plan.payer,
                spl_interface: wrap.spl_interface,
            }
            .instruction()?,
        );
    }
    let wrap_count = plan.wraps.len() as u32;

    if plan.chunks.is_empty() {
        return Ok(vec![InternalLoadBatch {
            instructions: setup,
            compressed_accounts: Vec::new(),
            wrap_count,
            has_ata_creation: plan.create_destination,
        }]);
    }

    let mut batches = Vec::with_capacity(plan.chunks.len());
    for (i, (chunk, proof)) in plan.chunks.iter().zip(&proofs).enumerate() {
        let (mut instructions, batch_wraps, has_ata_creation) = if i == 0 {
            (std::mem::take(&mut setup), wrap_count, plan.create_destination)
        } else {
            (vec![create_destination()?], 0, true)
        };
        instructions.push(
            Decompress {
                payer: plan.payer,
                authority: plan.authority,
                inputs: chunk,
                proof,
                destination: plan.destination,
                spl_interface: plan.spl_interface,
            }
            .instruction()?,
        );
        batches.push(InternalLoadBatch {
            instructions,
            compressed_accounts: chunk.clone(),
            wrap_count: batch_wraps,
            has_ata_creation,
        });
    }
    assert_unique_input_hashes(batches.iter().flat_map(|b| &b.compressed_accounts))?;
    Ok(batches)
}

/// Plans, proves and assembles the load of `interface`.
pub async fn build_load_batches<I: Indexer>(
    indexer: &I,
    interface: &AccountInterface,
    payer: Pubkey,
    authority: Pubkey,
    options: &InterfaceOptions,
    target_amount: Option<u64>,
) -> Result<Vec<InternalLoadBatch>> {
    let Some(plan) = plan_load(interface, payer, authority, options, target_amount)? else {
        return Ok(Vec::new());
    };
    let proved = prove_load_plan(indexer, plan).await?;
    assemble_load_batches(proved)
}

/// Prefixes each batch with its compute budget request.
pub fn load_batches_to_bundles(
    batches: &[InternalLoadBatch],
    config: &ComputeBudgetConfig,
) -> Vec<Vec<Instruction>> {
    batches
        .iter()
        .map(|batch| {
            let units = estimate_compute_units(&batch.compute_unit_shape(), config);
            let mut bundle = Vec::with_capacity(batch.instructions.len() + 1);
            bundle.push(compute_budget_instruction(units));
            bundle.extend(batch.instructions.iter().cloned());
            bundle
        })
        .collect()
}

/// Bundles loading all cold balance of an already fetched interface.
pub async fn load_instruction_batches_from_interface<I: Indexer>(
    indexer: &I,
    interface: &AccountInterface,
    payer: Pubkey,
    options: &InterfaceOptions,
) -> Result<Vec<Vec<Instruction>>> {
    let batches =
        build_load_batches(indexer, interface, payer, interface.owner, options, None).await?;
    let bundles = load_batches_to_bundles(&batches, &options.compute_budget);
    check_bundle_sizes(&bundles, &payer)?;
    debug!("Built {} load bundles", bundles.len());
    Ok(bundles)
}

/// Bundles loading all cold balance of `(owner, mint)`. An empty list means
/// there is nothing to load.
pub async fn create_load_instruction_batches<R: Rpc + Indexer>(
    rpc: &R,
    owner: Pubkey,
    mint: Pubkey,
    payer: Pubkey,
    options: &InterfaceOptions,
) -> Result<Vec<Vec<Instruction>>> {
    options.validate()?;
    let ata = get_associated_token_address_interface(&owner, &mint, options.ata_type);
    let interface = match get_ata_interface(rpc, ata, owner, mint, options).await {
        Ok(interface) => interface,
        Err(TokenInterfaceError::AccountNotFound(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    load_instruction_batches_from_interface(rpc, &interface, payer, options).await
}
