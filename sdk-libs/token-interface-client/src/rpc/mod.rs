mod errors;

use async_trait::async_trait;
pub use errors::RpcError;
use solana_account::Account;
use solana_pubkey::Pubkey;

use crate::layout::decode_mint_decimals;

/// Ledger reader for hot (on-chain) accounts.
#[async_trait]
pub trait Rpc: Send + Sync {
    /// Returns `None` if no account exists at `address`.
    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    async fn get_mint_decimals(&self, mint: Pubkey) -> Result<u8, RpcError> {
        let account = self
            .get_account(mint)
            .await?
            .ok_or_else(|| RpcError::AccountDoesNotExist(mint.to_string()))?;
        decode_mint_decimals(&account.data)
            .ok_or_else(|| RpcError::CustomError(format!("Invalid mint account data: {}", mint)))
    }
}
