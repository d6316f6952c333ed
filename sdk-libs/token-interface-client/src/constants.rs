use solana_pubkey::{pubkey, Pubkey};

/// Light token program, owner of Light token accounts hot and cold.
pub const LIGHT_TOKEN_PROGRAM_ID: Pubkey = pubkey!("cTokenmWW8bLPjZEBAUgYy3zKxQZW6VKi7bqNFEVv3m");

// SPL Token Program ID
pub const SPL_TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

// SPL Token 2022 Program ID
pub const SPL_TOKEN_2022_PROGRAM_ID: Pubkey =
    pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

pub const SPL_ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

// Light System Program ID
pub const LIGHT_SYSTEM_PROGRAM_ID: Pubkey = pubkey!("SySTEM1eSU2p4BGQfQpimFEWWSC1XDFeun3Nqzz3rT7");

// Account Compression Program ID
pub const ACCOUNT_COMPRESSION_PROGRAM_ID: Pubkey =
    pubkey!("compr6CUsB5m2jS4Y3831ztGSTnDpnKJTKS95d64XVq");

pub const ACCOUNT_COMPRESSION_AUTHORITY_PDA: Pubkey =
    pubkey!("HwXnGK3tPkkVY6P439H2p68AxpeuWXd5PcrAxFpbmfbA");

pub const CPI_AUTHORITY_PDA: Pubkey = pubkey!("GXtd2izAiMJPwMEjfgTRH3d7k9mjn4Jq3JrWFv9gySYy");

pub const REGISTERED_PROGRAM_PDA: Pubkey = pubkey!("35hkDgaAKwMCaxRz2ocSZ6NaUrtKkyNqU6c4RV3tYJRh");

pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

pub const POOL_SEED: &[u8] = b"pool";

// Light token program instruction discriminators.
pub const TRANSFER: u8 = 3;
pub const CREATE_ATA_IDEMPOTENT: u8 = 102;
pub const TRANSFER2: u8 = 101;

// SPL token instruction discriminators.
pub const SPL_TRANSFER_CHECKED: u8 = 12;
pub const SPL_ATA_CREATE_IDEMPOTENT: u8 = 1;

/// Maximum number of compressed inputs consumed by one decompress instruction.
pub const MAX_INPUT_ACCOUNTS: usize = 8;

/// Maximum serialized transaction size.
pub const PACKET_DATA_SIZE: usize = 1232;
