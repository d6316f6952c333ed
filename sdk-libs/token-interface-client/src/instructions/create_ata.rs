use borsh::BorshSerialize;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    address::{derive_light_token_ata, derive_spl_ata, AtaType},
    constants::{
        CREATE_ATA_IDEMPOTENT, LIGHT_TOKEN_PROGRAM_ID, SPL_ASSOCIATED_TOKEN_PROGRAM_ID,
        SPL_ATA_CREATE_IDEMPOTENT, SYSTEM_PROGRAM_ID,
    },
    error::Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize)]
pub struct CompressibleExtensionInstructionData {
    pub token_account_version: u8,
    pub rent_payment: u8,
    pub compression_only: u8,
    pub write_top_up: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize)]
pub struct CreateAssociatedTokenAccountInstructionData {
    pub bump: u8,
    pub compressible_config: Option<CompressibleExtensionInstructionData>,
}

/// Idempotent creation of a Light token associated account. Succeeds as a
/// no-op if the account exists.
/// ```rust
/// # use solana_pubkey::Pubkey;
/// # use light_token_interface_client::instructions::CreateAssociatedTokenAccount;
/// # let payer = Pubkey::new_unique();
/// # let owner = Pubkey::new_unique();
/// # let mint = Pubkey::new_unique();
/// let instruction = CreateAssociatedTokenAccount::new(payer, owner, mint).instruction()?;
/// # Ok::<(), light_token_interface_client::TokenInterfaceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CreateAssociatedTokenAccount {
    pub payer: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub associated_token_account: Pubkey,
    pub bump: u8,
}

impl CreateAssociatedTokenAccount {
    pub fn new(payer: Pubkey, owner: Pubkey, mint: Pubkey) -> Self {
        let (associated_token_account, bump) = derive_light_token_ata(&owner, &mint);
        Self {
            payer,
            owner,
            mint,
            associated_token_account,
            bump,
        }
    }

    pub fn instruction(self) -> Result<Instruction> {
        let instruction_data = CreateAssociatedTokenAccountInstructionData {
            bump: self.bump,
            compressible_config: None,
        };
        let mut data = vec![CREATE_ATA_IDEMPOTENT];
        instruction_data.serialize(&mut data)?;

        Ok(Instruction {
            program_id: LIGHT_TOKEN_PROGRAM_ID,
            accounts: vec![
                AccountMeta::new_readonly(self.owner, false),
                AccountMeta::new_readonly(self.mint, false),
                AccountMeta::new(self.payer, true),
                AccountMeta::new(self.associated_token_account, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data,
        })
    }
}

/// `CreateIdempotent` of the associated token account program.
pub fn create_spl_ata_idempotent_instruction(
    payer: Pubkey,
    owner: Pubkey,
    mint: Pubkey,
    token_program: Pubkey,
) -> Instruction {
    Instruction {
        program_id: SPL_ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(derive_spl_ata(&owner, &mint, &token_program), false),
            AccountMeta::new_readonly(owner, false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(token_program, false),
        ],
        data: vec![SPL_ATA_CREATE_IDEMPOTENT],
    }
}

/// Idempotent create of the `(owner, mint)` associated account of `ata_type`.
pub fn create_ata_idempotent_instruction(
    payer: Pubkey,
    owner: Pubkey,
    mint: Pubkey,
    ata_type: AtaType,
) -> Result<Instruction> {
    match ata_type {
        AtaType::LightToken => CreateAssociatedTokenAccount::new(payer, owner, mint).instruction(),
        AtaType::Spl | AtaType::Token2022 => Ok(create_spl_ata_idempotent_instruction(
            payer,
            owner,
            mint,
            ata_type.token_program(),
        )),
    }
}
