use std::collections::HashMap;

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use super::transfer2::{MultiInputTokenDataWithContext, PackedMerkleContext};
use crate::source::{LoadContext, TokenAccountSource};

/// Deduplicated accounts referenced by index from instruction data.
#[derive(Default, Debug)]
pub struct PackedAccounts {
    next_index: u8,
    map: HashMap<Pubkey, (u8, AccountMeta)>,
}

impl PackedAccounts {
    /// Returns the index of the provided `pubkey` in the collection.
    ///
    /// If the provided `pubkey` is not a part of the collection, it gets
    /// inserted with a `next_index`.
    ///
    /// If the provided `pubkey` already exists in the collection, its already
    /// existing index is returned.
    pub fn insert_or_get(&mut self, pubkey: Pubkey) -> u8 {
        self.insert_or_get_config(pubkey, false, true)
    }

    pub fn insert_or_get_read_only(&mut self, pubkey: Pubkey) -> u8 {
        self.insert_or_get_config(pubkey, false, false)
    }

    /// Signer and writable flags of an existing entry are widened, never
    /// narrowed.
    pub fn insert_or_get_config(
        &mut self,
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    ) -> u8 {
        let (index, meta) = self.map.entry(pubkey).or_insert_with(|| {
            let index = self.next_index;
            self.next_index += 1;
            (
                index,
                AccountMeta {
                    pubkey,
                    is_signer,
                    is_writable,
                },
            )
        });
        meta.is_signer |= is_signer;
        meta.is_writable |= is_writable;
        *index
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        let mut packed_accounts = self.map.values().collect::<Vec<_>>();
        // hash maps are not sorted so we need to sort manually
        packed_accounts.sort_by_key(|(index, _)| *index);
        packed_accounts
            .into_iter()
            .map(|(_, meta)| meta.clone())
            .collect()
    }
}

/// Packs a cold source as a Transfer2 input. `authority` signs either as
/// owner or as delegate.
pub fn pack_input_token_account(
    source: &TokenAccountSource,
    load_context: &LoadContext,
    root_index: Option<u16>,
    authority: &Pubkey,
    packed_accounts: &mut PackedAccounts,
) -> MultiInputTokenDataWithContext {
    let merkle_tree_pubkey_index = packed_accounts.insert_or_get(load_context.tree_info.tree);
    let queue_pubkey_index = packed_accounts.insert_or_get(load_context.tree_info.queue);
    let mint = packed_accounts.insert_or_get_read_only(source.parsed.mint);

    let owner_signs = source.parsed.owner == *authority;
    let owner = packed_accounts.insert_or_get_config(source.parsed.owner, owner_signs, false);
    let (has_delegate, delegate) = match source.parsed.delegate {
        Some(delegate) => (
            true,
            packed_accounts.insert_or_get_config(delegate, !owner_signs, false),
        ),
        None => (false, 0),
    };

    MultiInputTokenDataWithContext {
        owner,
        amount: source.amount,
        has_delegate,
        delegate,
        mint,
        version: source.token_data_version(),
        merkle_context: PackedMerkleContext {
            merkle_tree_pubkey_index,
            queue_pubkey_index,
            leaf_index: load_context.leaf_index,
            prove_by_index: load_context.prove_by_index,
        },
        root_index: root_index.unwrap_or_default(),
    }
}
