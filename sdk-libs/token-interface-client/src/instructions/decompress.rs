use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use super::{
    pack::{pack_input_token_account, PackedAccounts},
    transfer2::{
        create_transfer2_instruction, CompressedTokenInstructionDataTransfer2, Compression,
        Transfer2AccountsMetaConfig,
    },
};
use crate::{
    error::{Result, TokenInterfaceError},
    indexer::ValidityProofWithContext,
    interface::checked_sum,
    options::SplInterfaceInfo,
    source::TokenAccountSource,
};

/// Consumes cold sources and credits their sum to one hot account.
///
/// The destination is a Light token account unless `spl_interface` is set,
/// in which case tokens leave through the pool into an SPL or Token-2022
/// account.
#[derive(Debug, Clone)]
pub struct Decompress<'a> {
    pub payer: Pubkey,
    /// Owner, or delegate of every input.
    pub authority: Pubkey,
    pub inputs: &'a [TokenAccountSource],
    pub proof: &'a ValidityProofWithContext,
    pub destination: Pubkey,
    pub spl_interface: Option<SplInterfaceInfo>,
}

impl Decompress<'_> {
    pub fn instruction(self) -> Result<Instruction> {
        if self.proof.root_indices.len() != self.inputs.len() {
            return Err(TokenInterfaceError::ProofUnavailable(format!(
                "expected {} root indices, got {}",
                self.inputs.len(),
                self.proof.root_indices.len()
            )));
        }

        let mut packed_accounts = PackedAccounts::default();
        let mut in_token_data = Vec::with_capacity(self.inputs.len());
        for (source, root_index) in self.inputs.iter().zip(&self.proof.root_indices) {
            let load_context = source.load_context.as_ref().ok_or_else(|| {
                TokenInterfaceError::MalformedAccount {
                    address: source.address,
                    reason: "hot account passed as decompress input".to_string(),
                }
            })?;
            in_token_data.push(pack_input_token_account(
                source,
                load_context,
                *root_index,
                &self.authority,
                &mut packed_accounts,
            ));
        }
        let in_tlv: Option<Vec<Vec<u8>>> = self
            .inputs
            .iter()
            .any(|s| !s.parsed.tlv_data.is_empty())
            .then(|| self.inputs.iter().map(|s| s.parsed.tlv_data.clone()).collect());

        let amount = checked_sum(self.inputs.iter().map(|s| s.amount))?;
        let mint = in_token_data.first().map(|input| input.mint).unwrap_or_default();
        let recipient = packed_accounts.insert_or_get(self.destination);
        let compression = match self.spl_interface {
            None => Compression::decompress_light_token(amount, mint, recipient),
            Some(spl_interface) => {
                let pool_account_index = packed_accounts.insert_or_get(spl_interface.pool_pda);
                packed_accounts.insert_or_get_read_only(spl_interface.token_program);
                Compression::decompress_spl(
                    amount,
                    mint,
                    recipient,
                    pool_account_index,
                    spl_interface.pool_index,
                    spl_interface.pool_bump,
                )
            }
        };

        let instruction_data = CompressedTokenInstructionDataTransfer2 {
            compressions: Some(vec![compression]),
            proof: self.proof.proof,
            in_token_data,
            in_tlv,
            ..Default::default()
        };

        create_transfer2_instruction(
            &instruction_data,
            Transfer2AccountsMetaConfig::new(self.payer, packed_accounts.to_account_metas()),
        )
    }
}
