mod create_ata;
mod decompress;
pub mod pack;
mod transfer;
pub mod transfer2;
mod wrap;

pub use create_ata::{
    create_ata_idempotent_instruction, create_spl_ata_idempotent_instruction,
    CreateAssociatedTokenAccount,
};
pub use decompress::Decompress;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction::Instruction;
pub use transfer::{Transfer, TransferChecked};
pub use wrap::Wrap;

pub fn compute_budget_instruction(units: u32) -> Instruction {
    ComputeBudgetInstruction::set_compute_unit_limit(units)
}
