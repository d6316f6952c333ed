use borsh::BorshSerialize;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    constants::{
        ACCOUNT_COMPRESSION_AUTHORITY_PDA, ACCOUNT_COMPRESSION_PROGRAM_ID, CPI_AUTHORITY_PDA,
        LIGHT_SYSTEM_PROGRAM_ID, LIGHT_TOKEN_PROGRAM_ID, REGISTERED_PROGRAM_PDA,
        SYSTEM_PROGRAM_ID, TRANSFER2,
    },
    error::Result,
    indexer::CompressedProof,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize)]
#[repr(u8)]
pub enum CompressionMode {
    Compress,
    Decompress,
    CompressAndClose,
}

/// Moves tokens between a compressed balance and a decompressed account.
/// Indices point into the packed accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize)]
pub struct Compression {
    pub mode: CompressionMode,
    pub amount: u64,
    pub mint: u8,
    pub source_or_recipient: u8,
    pub authority: u8,
    pub pool_account_index: u8,
    pub pool_index: u8,
    pub bump: u8,
}

impl Compression {
    /// Compress from an SPL or Token-2022 account into the token pool.
    pub fn compress_spl(
        amount: u64,
        mint: u8,
        source: u8,
        authority: u8,
        pool_account_index: u8,
        pool_index: u8,
        bump: u8,
    ) -> Self {
        Self {
            mode: CompressionMode::Compress,
            amount,
            mint,
            source_or_recipient: source,
            authority,
            pool_account_index,
            pool_index,
            bump,
        }
    }

    pub fn decompress_light_token(amount: u64, mint: u8, recipient: u8) -> Self {
        Self {
            mode: CompressionMode::Decompress,
            amount,
            mint,
            source_or_recipient: recipient,
            authority: 0,
            pool_account_index: 0,
            pool_index: 0,
            bump: 0,
        }
    }

    /// Decompress out of the token pool into an SPL or Token-2022 account.
    pub fn decompress_spl(
        amount: u64,
        mint: u8,
        recipient: u8,
        pool_account_index: u8,
        pool_index: u8,
        bump: u8,
    ) -> Self {
        Self {
            mode: CompressionMode::Decompress,
            amount,
            mint,
            source_or_recipient: recipient,
            authority: 0,
            pool_account_index,
            pool_index,
            bump,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct PackedMerkleContext {
    pub merkle_tree_pubkey_index: u8,
    pub queue_pubkey_index: u8,
    pub leaf_index: u32,
    pub prove_by_index: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct MultiInputTokenDataWithContext {
    pub owner: u8,
    pub amount: u64,
    pub has_delegate: bool,
    pub delegate: u8,
    pub mint: u8,
    pub version: u8,
    pub merkle_context: PackedMerkleContext,
    pub root_index: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct MultiTokenTransferOutputData {
    pub owner: u8,
    pub amount: u64,
    pub has_delegate: bool,
    pub delegate: u8,
    pub mint: u8,
    pub version: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct CompressedCpiContext {
    pub set_context: bool,
    pub first_set_context: bool,
    pub cpi_context_account_index: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize)]
pub struct CompressedTokenInstructionDataTransfer2 {
    pub with_transaction_hash: bool,
    pub with_lamports_change_account_merkle_tree_index: bool,
    pub lamports_change_account_merkle_tree_index: u8,
    pub lamports_change_account_owner_index: u8,
    pub output_queue: u8,
    pub cpi_context: Option<CompressedCpiContext>,
    pub compressions: Option<Vec<Compression>>,
    pub proof: Option<CompressedProof>,
    pub in_token_data: Vec<MultiInputTokenDataWithContext>,
    pub out_token_data: Vec<MultiTokenTransferOutputData>,
    pub in_lamports: Option<Vec<u64>>,
    pub out_lamports: Option<Vec<u64>>,
    /// Raw extension list per input.
    pub in_tlv: Option<Vec<Vec<u8>>>,
    pub out_tlv: Option<Vec<Vec<u8>>>,
}

/// Account metadata configuration for Transfer2 instructions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Transfer2AccountsMetaConfig {
    pub fee_payer: Pubkey,
    /// Compressions only, no compressed inputs or outputs.
    pub decompressed_accounts_only: bool,
    pub packed_accounts: Vec<AccountMeta>,
}

impl Transfer2AccountsMetaConfig {
    pub fn new(fee_payer: Pubkey, packed_accounts: Vec<AccountMeta>) -> Self {
        Self {
            fee_payer,
            decompressed_accounts_only: false,
            packed_accounts,
        }
    }

    pub fn new_decompressed_accounts_only(
        fee_payer: Pubkey,
        packed_accounts: Vec<AccountMeta>,
    ) -> Self {
        Self {
            fee_payer,
            decompressed_accounts_only: true,
            packed_accounts,
        }
    }
}

pub fn get_transfer2_instruction_account_metas(
    config: Transfer2AccountsMetaConfig,
) -> Vec<AccountMeta> {
    let mut metas = Vec::with_capacity(7 + config.packed_accounts.len());
    if config.decompressed_accounts_only {
        metas.push(AccountMeta::new_readonly(CPI_AUTHORITY_PDA, false));
        metas.push(AccountMeta::new(config.fee_payer, true));
    } else {
        metas.extend([
            AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM_ID, false),
            AccountMeta::new(config.fee_payer, true),
            AccountMeta::new_readonly(CPI_AUTHORITY_PDA, false),
            AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
            AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
            AccountMeta::new_readonly(ACCOUNT_COMPRESSION_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ]);
    }
    metas.extend(config.packed_accounts);
    metas
}

pub fn create_transfer2_instruction(
    instruction_data: &CompressedTokenInstructionDataTransfer2,
    meta_config: Transfer2AccountsMetaConfig,
) -> Result<Instruction> {
    let mut data = vec![TRANSFER2];
    instruction_data.serialize(&mut data)?;

    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: get_transfer2_instruction_account_metas(meta_config),
        data,
    })
}
