mod base58;
mod error;
mod types;

use async_trait::async_trait;
pub use base58::Base58Conversions;
pub use error::IndexerError;
pub use types::{
    CompressedProof, CompressedTokenAccount, ProofInput, TreeInfo, TreeType,
    ValidityProofWithContext,
};
use solana_pubkey::Pubkey;

/// Reader for cold (compressed) token accounts and their validity proofs.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// All compressed token accounts of `owner` for `mint`.
    async fn get_compressed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<CompressedTokenAccount>, IndexerError>;

    /// One proof covering every input, with one root index per input in
    /// input order. Inputs provable by index carry `None`.
    async fn get_validity_proof(
        &self,
        inputs: Vec<ProofInput>,
    ) -> Result<ValidityProofWithContext, IndexerError>;
}
