use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use super::transfer2::{
    create_transfer2_instruction, CompressedTokenInstructionDataTransfer2, Compression,
    Transfer2AccountsMetaConfig,
};
use crate::{error::Result, options::SplInterfaceInfo};

/// Moves an SPL or Token-2022 balance into a Light token account through
/// the token pool.
#[derive(Debug, Clone)]
pub struct Wrap {
    pub amount: u64,
    pub source_spl_token_account: Pubkey,
    pub destination_light_token_account: Pubkey,
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub spl_interface: SplInterfaceInfo,
}

impl Wrap {
    pub fn instruction(self) -> Result<Instruction> {
        let packed_accounts = vec![
            // Mint (index 0)
            AccountMeta::new_readonly(self.spl_interface.mint, false),
            // Destination Light token account (index 1)
            AccountMeta::new(self.destination_light_token_account, false),
            // Authority (index 2)
            AccountMeta::new_readonly(self.authority, true),
            // Source SPL token account (index 3)
            AccountMeta::new(self.source_spl_token_account, false),
            // Token pool PDA (index 4)
            AccountMeta::new(self.spl_interface.pool_pda, false),
            // SPL token program (index 5)
            AccountMeta::new_readonly(self.spl_interface.token_program, false),
        ];

        let instruction_data = CompressedTokenInstructionDataTransfer2 {
            compressions: Some(vec![
                Compression::compress_spl(
                    self.amount,
                    0,
                    3,
                    2,
                    4,
                    self.spl_interface.pool_index,
                    self.spl_interface.pool_bump,
                ),
                Compression::decompress_light_token(self.amount, 0, 1),
            ]),
            ..Default::default()
        };

        create_transfer2_instruction(
            &instruction_data,
            Transfer2AccountsMetaConfig::new_decompressed_accounts_only(
                self.payer,
                packed_accounts,
            ),
        )
    }
}
