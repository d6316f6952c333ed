//! Transfers that spend hot and cold balance alike.
//!
//! Cold balance is loaded just enough to cover the amount, then one
//! transfer instruction moves it. The returned bundles are ordered: every
//! bundle but the last may land in any order, the last must land after
//! all others.
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use tracing::debug;

use crate::{
    address::{get_associated_token_address_interface, is_wallet_address, AtaType},
    compute_units::{estimate_compute_units, ComputeUnitShape},
    error::{Result, TokenInterfaceError},
    fetch::get_ata_interface,
    indexer::Indexer,
    instructions::{
        compute_budget_instruction, create_ata_idempotent_instruction, Transfer, TransferChecked,
    },
    interface::{
        checked_sum, filter_interface_for_authority, is_authority_for_interface, AccountInterface,
    },
    layout::has_compressed_only_extension,
    load::{assemble_load_batches, load_batches_to_bundles, plan_load, prove_load_plan},
    options::TransferOptions,
    rpc::Rpc,
    tx_size::check_bundle_sizes,
};

/// Narrows `interface` to what `authority` may spend and checks it covers
/// `amount`.
fn spendable_interface(
    interface: AccountInterface,
    authority: &Pubkey,
    amount: u64,
) -> Result<AccountInterface> {
    if *authority == interface.owner {
        let available = interface.unfrozen_amount()?;
        if available < amount {
            return Err(TokenInterfaceError::InsufficientBalance {
                required: amount,
                available,
                frozen: interface.frozen_amount()?,
            });
        }
        return Ok(interface);
    }

    if !is_authority_for_interface(&interface, authority) {
        return Err(TokenInterfaceError::NotOwnerOrDelegate(*authority));
    }
    let filtered = filter_interface_for_authority(&interface, authority)?;
    let available = checked_sum(
        filtered
            .sources
            .iter()
            .filter(|s| !s.is_frozen())
            .map(|s| s.spendable_for(authority)),
    )?;
    if available < amount {
        return Err(TokenInterfaceError::InsufficientDelegatedBalance {
            required: amount,
            available,
        });
    }
    Ok(filtered)
}

/// Builds the bundles transferring `amount` of `mint` from the account
/// `authority` controls to `recipient`'s associated account.
///
/// `recipient` must be a wallet address. The standard of both accounts is
/// `options.interface.ata_type`.
pub async fn create_transfer_instructions<R: Rpc + Indexer>(
    rpc: &R,
    payer: Pubkey,
    mint: Pubkey,
    amount: u64,
    authority: Pubkey,
    recipient: Pubkey,
    options: &TransferOptions,
) -> Result<Vec<Vec<Instruction>>> {
    if amount == 0 {
        return Err(TokenInterfaceError::InvalidAmount);
    }
    if !is_wallet_address(&recipient) {
        return Err(TokenInterfaceError::InvalidRecipient(recipient));
    }
    let interface_options = &options.interface;
    interface_options.validate()?;

    let owner = options.owner.unwrap_or(authority);
    let ata_type = interface_options.ata_type;
    let source = get_associated_token_address_interface(&owner, &mint, ata_type);
    let interface = match get_ata_interface(rpc, source, owner, mint, interface_options).await {
        Ok(interface) => interface,
        Err(TokenInterfaceError::AccountNotFound(_)) => {
            return Err(TokenInterfaceError::SenderNotFound(source))
        }
        Err(e) => return Err(e),
    };
    if interface
        .sources
        .iter()
        .any(|s| s.source_type == ata_type.hot_source_type() && s.is_frozen())
    {
        return Err(TokenInterfaceError::AccountFrozen { address: source });
    }
    let interface = spendable_interface(interface, &authority, amount)?;

    let batches = match plan_load(&interface, payer, authority, interface_options, Some(amount))? {
        Some(plan) => {
            // Approve-style delegation does not survive decompression.
            if authority != owner
                && plan
                    .chunks
                    .iter()
                    .flatten()
                    .any(|s| !has_compressed_only_extension(&s.parsed.tlv_data))
            {
                return Err(TokenInterfaceError::ApproveStyleColdDelegation);
            }
            assemble_load_batches(prove_load_plan(rpc, plan).await?)?
        }
        None => Vec::new(),
    };

    let destination = get_associated_token_address_interface(&recipient, &mint, ata_type);
    let transfer = match ata_type {
        AtaType::LightToken => Transfer {
            source,
            destination,
            amount,
            authority,
            fee_payer: (payer != authority).then_some(payer),
        }
        .instruction(),
        AtaType::Spl | AtaType::Token2022 => TransferChecked {
            source,
            mint,
            destination,
            amount,
            decimals: rpc.get_mint_decimals(mint).await?,
            authority,
            token_program: ata_type.token_program(),
        }
        .instruction(),
    };
    let create_recipient = if options.ensure_recipient_ata {
        Some(create_ata_idempotent_instruction(
            payer, recipient, mint, ata_type,
        )?)
    } else {
        None
    };

    let config = &interface_options.compute_budget;
    let transfer_shape = ComputeUnitShape {
        includes_transfer: true,
        account_creations: u32::from(create_recipient.is_some()),
        ..Default::default()
    };
    let (last, load_only) = match batches.split_last() {
        Some((last, rest)) => (Some(last), rest),
        None => (None, &batches[..]),
    };
    let shape = last
        .map(|batch| batch.compute_unit_shape().merge(transfer_shape))
        .unwrap_or(transfer_shape);

    let mut bundles = load_batches_to_bundles(load_only, config);
    let mut final_bundle = vec![compute_budget_instruction(estimate_compute_units(
        &shape, config,
    ))];
    final_bundle.extend(create_recipient);
    if let Some(last) = last {
        final_bundle.extend(last.instructions.iter().cloned());
    }
    final_bundle.push(transfer);
    bundles.push(final_bundle);

    check_bundle_sizes(&bundles, &payer)?;
    debug!(
        "Transfer of {} from {} to {} in {} bundles",
        amount,
        source,
        destination,
        bundles.len()
    );
    Ok(bundles)
}
