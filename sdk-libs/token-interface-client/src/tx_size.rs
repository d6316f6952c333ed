//! Serialized size of a legacy transaction built from a bundle.
use smallvec::SmallVec;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use tracing::debug;

use crate::{
    constants::PACKET_DATA_SIZE,
    error::{Result, TokenInterfaceError},
};

const SIGNATURE_LEN: usize = 64;
const MESSAGE_HEADER_LEN: usize = 3;
const BLOCKHASH_LEN: usize = 32;

/// Length of a compact-u16 encoding of `value`.
fn compact_len(value: usize) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        _ => 3,
    }
}

/// Size of the signed legacy transaction paying with `payer` and running
/// `instructions`.
pub fn estimate_transaction_size(instructions: &[Instruction], payer: &Pubkey) -> usize {
    let mut keys: SmallVec<[Pubkey; 32]> = SmallVec::new();
    let mut signers: SmallVec<[Pubkey; 4]> = SmallVec::new();
    keys.push(*payer);
    signers.push(*payer);
    for instruction in instructions {
        for meta in &instruction.accounts {
            if !keys.contains(&meta.pubkey) {
                keys.push(meta.pubkey);
            }
            if meta.is_signer && !signers.contains(&meta.pubkey) {
                signers.push(meta.pubkey);
            }
        }
        if !keys.contains(&instruction.program_id) {
            keys.push(instruction.program_id);
        }
    }

    let instructions_len: usize = instructions
        .iter()
        .map(|ix| {
            1 + compact_len(ix.accounts.len())
                + ix.accounts.len()
                + compact_len(ix.data.len())
                + ix.data.len()
        })
        .sum();

    compact_len(signers.len())
        + signers.len() * SIGNATURE_LEN
        + MESSAGE_HEADER_LEN
        + compact_len(keys.len())
        + keys.len() * 32
        + BLOCKHASH_LEN
        + compact_len(instructions.len())
        + instructions_len
}

/// Fails with `TransactionTooLarge` naming the first bundle over the limit.
pub fn check_bundle_sizes(bundles: &[Vec<Instruction>], payer: &Pubkey) -> Result<()> {
    for (index, bundle) in bundles.iter().enumerate() {
        let size = estimate_transaction_size(bundle, payer);
        debug!("Bundle {} estimated at {} bytes", index, size);
        if size > PACKET_DATA_SIZE {
            return Err(TokenInterfaceError::TransactionTooLarge {
                index,
                size,
                max: PACKET_DATA_SIZE,
            });
        }
    }
    Ok(())
}
