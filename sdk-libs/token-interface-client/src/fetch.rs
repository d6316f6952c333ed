//! Reads every source of a balance and aggregates them into an
//! [`AccountInterface`].
use futures::future::try_join_all;
use solana_account::Account;
use solana_pubkey::Pubkey;
use tracing::{debug, warn};

use crate::{
    address::{
        check_ata_address, derive_light_token_ata, get_associated_token_address_interface, AtaType,
    },
    constants::{LIGHT_TOKEN_PROGRAM_ID, SPL_TOKEN_2022_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID},
    error::{Result, TokenInterfaceError},
    indexer::{Base58Conversions, Indexer},
    interface::{build_account_interface_from_sources, AccountInterface},
    options::InterfaceOptions,
    rpc::Rpc,
    source::{TokenAccountSource, TokenAccountSourceType},
};

fn hot_source_type_for_program(program_id: &Pubkey) -> Option<TokenAccountSourceType> {
    if *program_id == LIGHT_TOKEN_PROGRAM_ID {
        Some(TokenAccountSourceType::LightTokenHot)
    } else if *program_id == SPL_TOKEN_PROGRAM_ID {
        Some(TokenAccountSourceType::Spl)
    } else if *program_id == SPL_TOKEN_2022_PROGRAM_ID {
        Some(TokenAccountSourceType::Token2022)
    } else {
        None
    }
}

/// Decodes a fetched hot account, skipping it if it does not belong to
/// `(owner, mint)` under the expected program.
fn hot_source(
    source_type: TokenAccountSourceType,
    address: Pubkey,
    account: Account,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Option<TokenAccountSource> {
    if account.owner != source_type.ata_type().token_program() {
        warn!(
            "Skipping {}: owned by {} instead of {}",
            address,
            account.owner,
            source_type.ata_type().token_program()
        );
        return None;
    }
    match TokenAccountSource::hot(source_type, address, account) {
        Ok(source) if source.parsed.owner == *owner && source.parsed.mint == *mint => Some(source),
        Ok(_) => {
            warn!("Skipping {}: owner or mint mismatch", address);
            None
        }
        Err(e) => {
            warn!("Skipping {}: {}", address, e);
            None
        }
    }
}

/// Cold sources of `(owner, mint)`, reported under `address`.
async fn fetch_cold_sources<I: Indexer>(
    indexer: &I,
    owner: &Pubkey,
    mint: &Pubkey,
    source_type: TokenAccountSourceType,
    address: Pubkey,
) -> Result<Vec<TokenAccountSource>> {
    let accounts = indexer
        .get_compressed_token_accounts_by_owner(owner, mint)
        .await?;
    let sources: Vec<TokenAccountSource> = accounts
        .iter()
        .filter_map(|compressed| {
            match TokenAccountSource::cold(source_type, address, compressed) {
                Some(source) if source.parsed.owner == *owner && source.parsed.mint == *mint => {
                    Some(source)
                }
                Some(_) => {
                    warn!(
                        "Skipping compressed account {}: owner or mint mismatch",
                        compressed.hash.to_base58()
                    );
                    None
                }
                None => {
                    warn!(
                        "Skipping undecodable compressed account {}",
                        compressed.hash.to_base58()
                    );
                    None
                }
            }
        })
        .collect();
    debug!(
        "Fetched {} cold sources of {} for mint {}",
        sources.len(),
        owner,
        mint
    );
    Ok(sources)
}

/// Fetches the associated token account `ata` of `(owner, mint)` together
/// with its cold balance. With `options.wrap` the SPL and Token-2022
/// associated accounts are folded in as well.
pub async fn get_ata_interface<R: Rpc + Indexer>(
    rpc: &R,
    ata: Pubkey,
    owner: Pubkey,
    mint: Pubkey,
    options: &InterfaceOptions,
) -> Result<AccountInterface> {
    let ata_type = check_ata_address(&ata, &mint, &owner)?;
    if options.wrap && ata_type != AtaType::LightToken {
        return Err(TokenInterfaceError::WrapRequiresLightTokenAta(ata_type));
    }

    let mut targets = vec![(ata_type.hot_source_type(), ata)];
    if options.wrap {
        for sibling in [AtaType::Spl, AtaType::Token2022] {
            targets.push((
                sibling.hot_source_type(),
                get_associated_token_address_interface(&owner, &mint, sibling),
            ));
        }
    }

    let hot = try_join_all(targets.into_iter().map(|(source_type, address)| async move {
        let account = rpc.get_account(address).await?;
        Ok::<_, TokenInterfaceError>(account.map(|account| (source_type, address, account)))
    }));
    let cold = fetch_cold_sources(rpc, &owner, &mint, ata_type.cold_source_type(), ata);
    let (hot, cold) = futures::try_join!(hot, cold)?;

    let mut sources: Vec<TokenAccountSource> = hot
        .into_iter()
        .flatten()
        .filter_map(|(source_type, address, account)| {
            hot_source(source_type, address, account, &owner, &mint)
        })
        .collect();
    sources.extend(cold);

    let mut interface = build_account_interface_from_sources(sources, ata)?;
    interface.ata_type = Some(ata_type);
    Ok(interface)
}

/// Fetches the token account at `address`. Cold balance is included when
/// `address` is a Light token associated account.
pub async fn get_account_interface<R: Rpc + Indexer>(
    rpc: &R,
    address: Pubkey,
) -> Result<AccountInterface> {
    let account = rpc
        .get_account(address)
        .await?
        .ok_or(TokenInterfaceError::AccountNotFound(address))?;
    let source_type = hot_source_type_for_program(&account.owner).ok_or_else(|| {
        TokenInterfaceError::MalformedAccount {
            address,
            reason: format!("owned by {}, not a token program", account.owner),
        }
    })?;
    let source = TokenAccountSource::hot(source_type, address, account)?;
    let owner = source.parsed.owner;
    let mint = source.parsed.mint;

    let ata_type = source_type.ata_type();
    let is_ata = get_associated_token_address_interface(&owner, &mint, ata_type) == address;
    let mut sources = vec![source];
    if source_type == TokenAccountSourceType::LightTokenHot
        && derive_light_token_ata(&owner, &mint).0 == address
    {
        sources.extend(
            fetch_cold_sources(
                rpc,
                &owner,
                &mint,
                TokenAccountSourceType::LightTokenCold,
                address,
            )
            .await?,
        );
    }

    let mut interface = build_account_interface_from_sources(sources, address)?;
    interface.ata_type = is_ata.then_some(ata_type);
    Ok(interface)
}
