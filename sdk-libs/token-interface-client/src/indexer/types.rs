use borsh::BorshSerialize;
use solana_pubkey::Pubkey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum TreeType {
    StateV1 = 1,
    AddressV1 = 2,
    #[default]
    StateV2 = 3,
    AddressV2 = 4,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct TreeInfo {
    pub tree: Pubkey,
    pub queue: Pubkey,
    pub tree_type: TreeType,
}

/// A compressed token account as served by the indexer. `data` is the
/// token data without the 8 byte discriminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedTokenAccount {
    pub hash: [u8; 32],
    pub tree_info: TreeInfo,
    pub leaf_index: u32,
    pub prove_by_index: bool,
    /// Program owning the compressed account.
    pub owner: Pubkey,
    pub lamports: u64,
    pub discriminator: [u8; 8],
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofInput {
    pub hash: [u8; 32],
    pub tree: Pubkey,
    pub queue: Pubkey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

impl Default for CompressedProof {
    fn default() -> Self {
        Self {
            a: [0; 32],
            b: [0; 64],
            c: [0; 32],
        }
    }
}

/// `proof` is `None` when every input is proven by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidityProofWithContext {
    pub proof: Option<CompressedProof>,
    pub root_indices: Vec<Option<u16>>,
}
