//! Byte layouts of hot token accounts, cold token data and the
//! delegation-detail extension.
//!
//! Hot accounts (SPL, Token-2022, Light token) share the 165 byte base
//! layout:
//!
//! | offset | size | field                              |
//! |--------|------|------------------------------------|
//! | 0      | 32   | mint                               |
//! | 32     | 32   | owner                              |
//! | 64     | 8    | amount                             |
//! | 72     | 36   | delegate (u32 tag + pubkey)        |
//! | 108    | 1    | state                              |
//! | 109    | 12   | is_native (u32 tag + u64)          |
//! | 121    | 8    | delegated_amount                   |
//! | 129    | 36   | close_authority (u32 tag + pubkey) |
//!
//! Extension data follows the account type byte at offset 165.
use solana_pubkey::Pubkey;
use tracing::warn;

use crate::error::{Result, TokenInterfaceError};

pub const ACCOUNT_LEN: usize = 165;
const ACCOUNT_TYPE_LEN: usize = 1;
const MINT_DECIMALS_OFFSET: usize = 44;

/// Discriminator of the CompressedOnly extension, which records the
/// delegated amount of a compressed account.
pub const COMPRESSED_ONLY_DISCRIMINATOR: u8 = 31;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum AccountState {
    Uninitialized = 0,
    #[default]
    Initialized = 1,
    Frozen = 2,
}

impl TryFrom<u8> for AccountState {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountState::Uninitialized),
            1 => Ok(AccountState::Initialized),
            2 => Ok(AccountState::Frozen),
            other => Err(other),
        }
    }
}

/// Standard-format view of a token account, hot or cold.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTokenAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
    pub state: AccountState,
    pub is_native: Option<u64>,
    pub close_authority: Option<Pubkey>,
    pub tlv_data: Vec<u8>,
}

impl ParsedTokenAccount {
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.state == AccountState::Frozen
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state != AccountState::Uninitialized
    }
}

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    data.get(offset..offset.checked_add(N)?)?.try_into().ok()
}

fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
    read_array(data, offset).map(u64::from_le_bytes)
}

/// Decodes a hot token account. Fails on short data and on option tags or
/// states that no token program writes.
pub fn decode_hot(address: Pubkey, data: &[u8]) -> Result<ParsedTokenAccount> {
    let malformed = |reason: String| TokenInterfaceError::MalformedAccount { address, reason };
    if data.len() < ACCOUNT_LEN {
        return Err(malformed(format!(
            "expected at least {} bytes, got {}",
            ACCOUNT_LEN,
            data.len()
        )));
    }

    let pubkey_at = |offset: usize| {
        read_array::<32>(data, offset)
            .map(Pubkey::new_from_array)
            .ok_or_else(|| malformed(format!("truncated pubkey at offset {}", offset)))
    };
    let u64_at = |offset: usize| {
        read_u64(data, offset).ok_or_else(|| malformed(format!("truncated u64 at offset {}", offset)))
    };
    let tag_at = |offset: usize| -> Result<bool> {
        match read_array::<4>(data, offset).map(u32::from_le_bytes) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(tag) => Err(malformed(format!(
                "invalid option tag {} at offset {}",
                tag, offset
            ))),
            None => Err(malformed(format!("truncated option tag at offset {}", offset))),
        }
    };

    let mint = pubkey_at(0)?;
    let owner = pubkey_at(32)?;
    let amount = u64_at(64)?;
    let delegate = if tag_at(72)? {
        Some(pubkey_at(76)?)
    } else {
        None
    };
    let state = AccountState::try_from(data[108])
        .map_err(|state| malformed(format!("invalid account state {}", state)))?;
    let is_native = if tag_at(109)? {
        Some(u64_at(113)?)
    } else {
        None
    };
    let delegated_amount = u64_at(121)?;
    let close_authority = if tag_at(129)? {
        Some(pubkey_at(133)?)
    } else {
        None
    };
    let tlv_data = data
        .get(ACCOUNT_LEN + ACCOUNT_TYPE_LEN..)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    Ok(ParsedTokenAccount {
        address,
        mint,
        owner,
        amount,
        delegate,
        delegated_amount,
        state,
        is_native,
        close_authority,
        tlv_data,
    })
}

/// Sequential reader over borsh encoded cold token data.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let value = read_array::<N>(self.data, self.offset)?;
        self.offset += N;
        Some(value)
    }

    fn pubkey(&mut self) -> Option<Pubkey> {
        self.array::<32>().map(Pubkey::new_from_array)
    }

    fn u64(&mut self) -> Option<u64> {
        self.array::<8>().map(u64::from_le_bytes)
    }

    fn u8(&mut self) -> Option<u8> {
        self.array::<1>().map(|[byte]| byte)
    }

    fn rest(&self) -> &'a [u8] {
        self.data.get(self.offset..).unwrap_or_default()
    }
}

/// Decodes cold token data. Returns `None` if the data is truncated or
/// carries an unknown option flag or state.
pub fn decode_cold(address: Pubkey, data: &[u8]) -> Option<ParsedTokenAccount> {
    let mut reader = Reader::new(data);
    let mint = reader.pubkey()?;
    let owner = reader.pubkey()?;
    let amount = reader.u64()?;
    let delegate = match reader.u8()? {
        0 => None,
        1 => Some(reader.pubkey()?),
        _ => return None,
    };
    let state = AccountState::try_from(reader.u8()?).ok()?;
    // Token data written before extensions existed ends after the state.
    let tlv_data = match reader.u8() {
        None | Some(0) => Vec::new(),
        Some(1) => reader.rest().to_vec(),
        Some(_) => return None,
    };
    let delegated_amount = resolve_delegated_amount(amount, delegate.as_ref(), &tlv_data);

    Some(ParsedTokenAccount {
        address,
        mint,
        owner,
        amount,
        delegate,
        delegated_amount,
        state,
        is_native: None,
        close_authority: None,
        tlv_data,
    })
}

/// Delegated amount of a cold account: the CompressedOnly extension's value
/// when recoverable, otherwise the full amount if a delegate is set.
pub fn resolve_delegated_amount(amount: u64, delegate: Option<&Pubkey>, tlv: &[u8]) -> u64 {
    match compressed_only_delegated_amount(tlv) {
        Some(delegated_amount) => delegated_amount,
        None if delegate.is_some() => amount,
        None => 0,
    }
}

/// Payload size of extensions that may precede CompressedOnly in a cold
/// account's extension list. `None` for variable or unknown sizes.
fn extension_data_size(discriminator: u8) -> Option<usize> {
    match discriminator {
        0..=18 | 20..=28 => Some(0),
        29 => Some(8),
        30 => Some(1),
        31 => Some(17),
        _ => None,
    }
}

/// Reads `delegated_amount` from the CompressedOnly extension. The
/// extension list is a borsh `Vec` of `(u8 discriminator, payload)`.
pub fn compressed_only_delegated_amount(tlv: &[u8]) -> Option<u64> {
    let len = read_array::<4>(tlv, 0).map(u32::from_le_bytes)?;
    let mut offset = 4;
    for _ in 0..len {
        let discriminator = *tlv.get(offset)?;
        offset += 1;
        if discriminator == COMPRESSED_ONLY_DISCRIMINATOR {
            return read_u64(tlv, offset);
        }
        match extension_data_size(discriminator) {
            Some(size) => offset += size,
            None => {
                warn!(
                    "Cannot skip extension {} while looking for delegation details",
                    discriminator
                );
                return None;
            }
        }
    }
    None
}

#[inline]
pub fn has_compressed_only_extension(tlv: &[u8]) -> bool {
    compressed_only_delegated_amount(tlv).is_some()
}

pub fn decode_mint_decimals(data: &[u8]) -> Option<u8> {
    data.get(MINT_DECIMALS_OFFSET).copied()
}
