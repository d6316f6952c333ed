use solana_account::Account;
use solana_pubkey::Pubkey;

use crate::{
    address::AtaType,
    error::Result,
    indexer::{Base58Conversions, CompressedTokenAccount, ProofInput, TreeInfo},
    layout::{decode_cold, decode_hot, ParsedTokenAccount},
};

/// Origin of a balance source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenAccountSourceType {
    Spl,
    Token2022,
    SplCold,
    Token2022Cold,
    LightTokenHot,
    LightTokenCold,
}

impl TokenAccountSourceType {
    #[inline]
    pub fn is_cold(self) -> bool {
        matches!(
            self,
            TokenAccountSourceType::SplCold
                | TokenAccountSourceType::Token2022Cold
                | TokenAccountSourceType::LightTokenCold
        )
    }

    /// Lower is preferred when choosing the primary source.
    pub fn priority(self) -> u8 {
        match self {
            TokenAccountSourceType::LightTokenHot => 0,
            TokenAccountSourceType::LightTokenCold => 1,
            TokenAccountSourceType::Spl => 2,
            TokenAccountSourceType::Token2022 => 3,
            TokenAccountSourceType::SplCold => 4,
            TokenAccountSourceType::Token2022Cold => 5,
        }
    }

    pub fn ata_type(self) -> AtaType {
        match self {
            TokenAccountSourceType::Spl | TokenAccountSourceType::SplCold => AtaType::Spl,
            TokenAccountSourceType::Token2022 | TokenAccountSourceType::Token2022Cold => {
                AtaType::Token2022
            }
            TokenAccountSourceType::LightTokenHot | TokenAccountSourceType::LightTokenCold => {
                AtaType::LightToken
            }
        }
    }
}

/// Where a cold source lives and how to prove it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadContext {
    pub tree_info: TreeInfo,
    pub hash: [u8; 32],
    pub leaf_index: u32,
    pub prove_by_index: bool,
}

impl LoadContext {
    pub fn proof_input(&self) -> ProofInput {
        ProofInput {
            hash: self.hash,
            tree: self.tree_info.tree,
            queue: self.tree_info.queue,
        }
    }
}

/// One place a balance lives. `load_context` is set iff the source is cold.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenAccountSource {
    pub source_type: TokenAccountSourceType,
    pub address: Pubkey,
    pub amount: u64,
    pub account: Account,
    pub load_context: Option<LoadContext>,
    pub parsed: ParsedTokenAccount,
}

impl TokenAccountSource {
    /// Decodes a hot account read from the ledger.
    pub fn hot(
        source_type: TokenAccountSourceType,
        address: Pubkey,
        account: Account,
    ) -> Result<Self> {
        debug_assert!(!source_type.is_cold());
        let parsed = decode_hot(address, &account.data)?;
        Ok(Self {
            source_type,
            address,
            amount: parsed.amount,
            account,
            load_context: None,
            parsed,
        })
    }

    /// Decodes a compressed token account. `address` is the associated
    /// account the balance belongs to. Returns `None` for undecodable data.
    pub fn cold(
        source_type: TokenAccountSourceType,
        address: Pubkey,
        compressed: &CompressedTokenAccount,
    ) -> Option<Self> {
        debug_assert!(source_type.is_cold());
        let parsed = decode_cold(address, &compressed.data)?;
        let mut data = Vec::with_capacity(compressed.discriminator.len() + compressed.data.len());
        data.extend_from_slice(&compressed.discriminator);
        data.extend_from_slice(&compressed.data);
        Some(Self {
            source_type,
            address,
            amount: parsed.amount,
            account: Account {
                lamports: compressed.lamports,
                data,
                owner: compressed.owner,
                executable: false,
                rent_epoch: 0,
            },
            load_context: Some(LoadContext {
                tree_info: compressed.tree_info,
                hash: compressed.hash,
                leaf_index: compressed.leaf_index,
                prove_by_index: compressed.prove_by_index,
            }),
            parsed,
        })
    }

    #[inline]
    pub fn is_cold(&self) -> bool {
        self.load_context.is_some()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.parsed.is_frozen()
    }

    #[inline]
    pub fn hash(&self) -> Option<[u8; 32]> {
        self.load_context.as_ref().map(|ctx| ctx.hash)
    }

    pub fn hash_base58(&self) -> String {
        self.hash()
            .map(|hash| hash.to_base58())
            .unwrap_or_default()
    }

    /// Amount `authority` may move out of this source.
    pub fn spendable_for(&self, authority: &Pubkey) -> u64 {
        if self.parsed.owner == *authority {
            self.amount
        } else if self.parsed.delegate.as_ref() == Some(authority) {
            self.amount.min(self.parsed.delegated_amount)
        } else {
            0
        }
    }

    /// Token data version the program expects for this cold source, read
    /// from the compressed account discriminator.
    pub fn token_data_version(&self) -> u8 {
        match self.account.data.get(..8) {
            Some([2, 0, 0, 0, 0, 0, 0, 0]) => 1,
            Some([0, 0, 0, 0, 0, 0, 0, 3]) => 2,
            _ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::LIGHT_TOKEN_PROGRAM_ID,
        layout::{test_utils::*, AccountState},
    };

    fn compressed(data: Vec<u8>) -> CompressedTokenAccount {
        CompressedTokenAccount {
            hash: [9u8; 32],
            tree_info: TreeInfo::default(),
            leaf_index: 4,
            prove_by_index: true,
            owner: LIGHT_TOKEN_PROGRAM_ID,
            lamports: 0,
            discriminator: [0, 0, 0, 0, 0, 0, 0, 4],
            data,
        }
    }

    #[test]
    fn test_priority_order() {
        let mut types = vec![
            TokenAccountSourceType::Token2022Cold,
            TokenAccountSourceType::Spl,
            TokenAccountSourceType::LightTokenCold,
            TokenAccountSourceType::SplCold,
            TokenAccountSourceType::Token2022,
            TokenAccountSourceType::LightTokenHot,
        ];
        types.sort_by_key(|t| t.priority());
        assert_eq!(
            types,
            vec![
                TokenAccountSourceType::LightTokenHot,
                TokenAccountSourceType::LightTokenCold,
                TokenAccountSourceType::Spl,
                TokenAccountSourceType::Token2022,
                TokenAccountSourceType::SplCold,
                TokenAccountSourceType::Token2022Cold,
            ]
        );
    }

    #[test]
    fn test_cold_source_has_load_context() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let address = Pubkey::new_unique();
        let data = cold_token_data(mint, owner, 42, None, AccountState::Initialized, None);

        let source = TokenAccountSource::cold(
            TokenAccountSourceType::LightTokenCold,
            address,
            &compressed(data),
        )
        .unwrap();
        assert!(source.is_cold());
        assert_eq!(source.amount, 42);
        assert_eq!(source.hash(), Some([9u8; 32]));
        assert_eq!(source.load_context.unwrap().leaf_index, 4);
        assert_eq!(source.parsed.address, address);
        assert_eq!(source.token_data_version(), 3);
    }

    #[test]
    fn test_cold_source_rejects_truncated_data() {
        assert!(TokenAccountSource::cold(
            TokenAccountSourceType::LightTokenCold,
            Pubkey::new_unique(),
            &compressed(vec![1, 2, 3]),
        )
        .is_none());
    }

    #[test]
    fn test_hot_source() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let account = Account {
            lamports: 1,
            data: hot_account_data(mint, owner, 7, None, AccountState::Initialized),
            owner: LIGHT_TOKEN_PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        };
        let source = TokenAccountSource::hot(
            TokenAccountSourceType::LightTokenHot,
            Pubkey::new_unique(),
            account,
        )
        .unwrap();
        assert!(!source.is_cold());
        assert_eq!(source.amount, 7);
        assert_eq!(source.hash(), None);
    }

    #[test]
    fn test_spendable_for() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let delegate = Pubkey::new_unique();
        let account = Account {
            lamports: 1,
            data: hot_account_data(
                mint,
                owner,
                100,
                Some((delegate, 30)),
                AccountState::Initialized,
            ),
            owner: LIGHT_TOKEN_PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        };
        let source = TokenAccountSource::hot(
            TokenAccountSourceType::LightTokenHot,
            Pubkey::new_unique(),
            account,
        )
        .unwrap();
        assert_eq!(source.spendable_for(&owner), 100);
        assert_eq!(source.spendable_for(&delegate), 30);
        assert_eq!(source.spendable_for(&Pubkey::new_unique()), 0);
    }
}
