use solana_pubkey::Pubkey;
use thiserror::Error;

use crate::{
    address::AtaType,
    indexer::{IndexerError, TreeType},
    rpc::RpcError,
};

pub type Result<T> = std::result::Result<T, TokenInterfaceError>;

#[derive(Debug, Error)]
pub enum TokenInterfaceError {
    #[error("Malformed token account {address}: {reason}")]
    MalformedAccount { address: Pubkey, reason: String },

    #[error("Token account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Sender token account not found: {0}")]
    SenderNotFound(Pubkey),

    #[error("Account is frozen: {address}")]
    AccountFrozen { address: Pubkey },

    #[error(
        "Insufficient balance. Required: {required}, Available: {available}{}",
        frozen_note(.frozen)
    )]
    InsufficientBalance {
        required: u64,
        available: u64,
        frozen: u64,
    },

    #[error("Recipient must be a wallet public key (on-curve), not a PDA or ATA: {0}")]
    InvalidRecipient(Pubkey),

    #[error("Duplicate compressed account hash across chunks: {hash}")]
    DuplicateCommitment { hash: String },

    #[error("Transaction {index} is {size} bytes, exceeds the {max} byte limit")]
    TransactionTooLarge { index: usize, size: usize, max: usize },

    #[error("Validity proof unavailable: {0}")]
    ProofUnavailable(String),

    #[error("Compressed account {hash} lives in a {tree_type:?} tree, only StateV2 trees are supported")]
    UnsupportedTreeVersion { hash: String, tree_type: TreeType },

    #[error("Transfer amount must be greater than zero")]
    InvalidAmount,

    #[error("{actual} is not an associated token account of the given owner and mint")]
    InvalidAta { actual: Pubkey },

    #[error("For wrap=true, ata must be the light token ATA. Got {0:?} ATA instead.")]
    WrapRequiresLightTokenAta(AtaType),

    #[error("Signer is not the owner or a delegate of the sender's account: {0}")]
    NotOwnerOrDelegate(Pubkey),

    #[error("Insufficient delegated balance. Required: {required}, Available: {available}")]
    InsufficientDelegatedBalance { required: u64, available: u64 },

    #[error("Cold balance delegated via approve cannot be loaded by the delegate, the owner must load it first")]
    ApproveStyleColdDelegation,

    #[error("Token amount overflow")]
    ArithmeticOverflow,

    #[error("Failed to serialize instruction data: {0}")]
    Serialization(String),

    #[error("Rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),
}

fn frozen_note(frozen: &u64) -> String {
    if *frozen > 0 {
        format!(" ({} frozen, not usable)", frozen)
    } else {
        String::new()
    }
}

impl From<std::io::Error> for TokenInterfaceError {
    fn from(err: std::io::Error) -> Self {
        TokenInterfaceError::Serialization(err.to_string())
    }
}
