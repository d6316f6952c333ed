use solana_pubkey::Pubkey;

use crate::{
    constants::{
        LIGHT_TOKEN_PROGRAM_ID, POOL_SEED, SPL_ASSOCIATED_TOKEN_PROGRAM_ID,
        SPL_TOKEN_2022_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID,
    },
    error::{Result, TokenInterfaceError},
    source::TokenAccountSourceType,
};

/// Token standard of an associated token account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AtaType {
    #[default]
    LightToken,
    Spl,
    Token2022,
}

impl AtaType {
    pub fn token_program(self) -> Pubkey {
        match self {
            AtaType::LightToken => LIGHT_TOKEN_PROGRAM_ID,
            AtaType::Spl => SPL_TOKEN_PROGRAM_ID,
            AtaType::Token2022 => SPL_TOKEN_2022_PROGRAM_ID,
        }
    }

    pub fn hot_source_type(self) -> TokenAccountSourceType {
        match self {
            AtaType::LightToken => TokenAccountSourceType::LightTokenHot,
            AtaType::Spl => TokenAccountSourceType::Spl,
            AtaType::Token2022 => TokenAccountSourceType::Token2022,
        }
    }

    pub fn cold_source_type(self) -> TokenAccountSourceType {
        match self {
            AtaType::LightToken => TokenAccountSourceType::LightTokenCold,
            AtaType::Spl => TokenAccountSourceType::SplCold,
            AtaType::Token2022 => TokenAccountSourceType::Token2022Cold,
        }
    }
}

pub fn derive_light_token_ata(owner: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            owner.as_ref(),
            LIGHT_TOKEN_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &LIGHT_TOKEN_PROGRAM_ID,
    )
}

pub fn derive_spl_ata(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &SPL_ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

pub fn get_associated_token_address_interface(
    owner: &Pubkey,
    mint: &Pubkey,
    ata_type: AtaType,
) -> Pubkey {
    match ata_type {
        AtaType::LightToken => derive_light_token_ata(owner, mint).0,
        AtaType::Spl | AtaType::Token2022 => {
            derive_spl_ata(owner, mint, &ata_type.token_program())
        }
    }
}

/// Classifies `ata` as one of the associated token accounts of
/// `(owner, mint)`.
pub fn check_ata_address(ata: &Pubkey, mint: &Pubkey, owner: &Pubkey) -> Result<AtaType> {
    [AtaType::LightToken, AtaType::Spl, AtaType::Token2022]
        .into_iter()
        .find(|ata_type| get_associated_token_address_interface(owner, mint, *ata_type) == *ata)
        .ok_or(TokenInterfaceError::InvalidAta { actual: *ata })
}

/// Wallet addresses are on the ed25519 curve. PDAs, including every ATA,
/// are not.
#[inline]
pub fn is_wallet_address(address: &Pubkey) -> bool {
    address.is_on_curve()
}

pub fn find_token_pool_pda_with_index(mint: &Pubkey, token_pool_index: u8) -> (Pubkey, u8) {
    let index = [token_pool_index];
    let mut seeds: Vec<&[u8]> = vec![POOL_SEED, mint.as_ref()];
    if token_pool_index != 0 {
        seeds.push(&index);
    }
    Pubkey::find_program_address(&seeds, &LIGHT_TOKEN_PROGRAM_ID)
}
