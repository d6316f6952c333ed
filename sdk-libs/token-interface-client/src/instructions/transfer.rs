use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::constants::{LIGHT_TOKEN_PROGRAM_ID, SPL_TRANSFER_CHECKED, SYSTEM_PROGRAM_ID, TRANSFER};

/// Light token transfer between two hot accounts.
///
/// Without `fee_payer` the authority is writable since it pays for
/// top-ups. Data: discriminator (1) + amount (8).
#[derive(Debug, Clone, Copy)]
pub struct Transfer {
    pub source: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    pub authority: Pubkey,
    pub fee_payer: Option<Pubkey>,
}

impl Transfer {
    pub fn instruction(self) -> Instruction {
        let mut accounts = vec![
            AccountMeta::new(self.source, false),
            AccountMeta::new(self.destination, false),
        ];
        match self.fee_payer {
            Some(fee_payer) => {
                accounts.push(AccountMeta::new_readonly(self.authority, true));
                accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false));
                accounts.push(AccountMeta::new(fee_payer, true));
            }
            None => {
                accounts.push(AccountMeta::new(self.authority, true));
                accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false));
            }
        }

        let mut data = Vec::with_capacity(9);
        data.push(TRANSFER);
        data.extend_from_slice(&self.amount.to_le_bytes());

        Instruction {
            program_id: LIGHT_TOKEN_PROGRAM_ID,
            accounts,
            data,
        }
    }
}

/// `TransferChecked` of the SPL token and Token-2022 programs.
#[derive(Debug, Clone, Copy)]
pub struct TransferChecked {
    pub source: Pubkey,
    pub mint: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    pub decimals: u8,
    pub authority: Pubkey,
    pub token_program: Pubkey,
}

impl TransferChecked {
    pub fn instruction(self) -> Instruction {
        let mut data = Vec::with_capacity(10);
        data.push(SPL_TRANSFER_CHECKED);
        data.extend_from_slice(&self.amount.to_le_bytes());
        data.push(self.decimals);

        Instruction {
            program_id: self.token_program,
            accounts: vec![
                AccountMeta::new(self.source, false),
                AccountMeta::new_readonly(self.mint, false),
                AccountMeta::new(self.destination, false),
                AccountMeta::new_readonly(self.authority, true),
            ],
            data,
        }
    }
}
