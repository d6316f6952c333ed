use solana_pubkey::Pubkey;

use crate::{
    address::{find_token_pool_pda_with_index, AtaType},
    error::{Result, TokenInterfaceError},
};

/// Token pool through which SPL or Token-2022 balances move in and out of
/// Light token accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplInterfaceInfo {
    pub mint: Pubkey,
    pub pool_pda: Pubkey,
    pub pool_bump: u8,
    pub pool_index: u8,
    pub token_program: Pubkey,
}

impl SplInterfaceInfo {
    pub fn derive(mint: Pubkey, token_program: Pubkey, pool_index: u8) -> Self {
        let (pool_pda, pool_bump) = find_token_pool_pda_with_index(&mint, pool_index);
        Self {
            mint,
            pool_pda,
            pool_bump,
            pool_index,
            token_program,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComputeBudgetConfig {
    pub min_units: u32,
    pub max_units: u32,
    /// Safety margin in basis points, 13_000 adds 30%.
    pub buffer_bps: u32,
}

impl Default for ComputeBudgetConfig {
    fn default() -> Self {
        Self {
            min_units: 10_000,
            max_units: 1_400_000,
            buffer_bps: 13_000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterfaceOptions {
    /// Fold SPL and Token-2022 hot balances into the Light token account.
    pub wrap: bool,
    /// Standard of the account balances are loaded into and sent from.
    pub ata_type: AtaType,
    /// Overrides the pool derived at index 0.
    pub spl_interface: Option<SplInterfaceInfo>,
    pub compute_budget: ComputeBudgetConfig,
}

impl InterfaceOptions {
    /// Unified view over every standard, loading into the Light token account.
    pub fn unified() -> Self {
        Self {
            wrap: true,
            ..Default::default()
        }
    }

    pub fn standard(ata_type: AtaType) -> Self {
        Self {
            ata_type,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.wrap && self.ata_type != AtaType::LightToken {
            return Err(TokenInterfaceError::WrapRequiresLightTokenAta(self.ata_type));
        }
        Ok(())
    }

    pub fn spl_interface_for(&self, mint: Pubkey, token_program: Pubkey) -> SplInterfaceInfo {
        match self.spl_interface {
            Some(info) if info.mint == mint && info.token_program == token_program => info,
            _ => SplInterfaceInfo::derive(mint, token_program, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferOptions {
    pub interface: InterfaceOptions,
    /// Prepend an idempotent create of the recipient's account.
    pub ensure_recipient_ata: bool,
    /// Account owner when the signer is a delegate.
    pub owner: Option<Pubkey>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            interface: InterfaceOptions::default(),
            ensure_recipient_ata: true,
            owner: None,
        }
    }
}
