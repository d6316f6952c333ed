//! In-memory ledger and indexer for client tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use light_token_interface_client::{
    address::{derive_light_token_ata, get_associated_token_address_interface, AtaType},
    constants::{LIGHT_TOKEN_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID},
    indexer::{
        CompressedProof, CompressedTokenAccount, IndexerError, ProofInput, TreeInfo, TreeType,
        ValidityProofWithContext,
    },
    layout::{AccountState, ACCOUNT_LEN, COMPRESSED_ONLY_DISCRIMINATOR},
    rpc::RpcError,
    Indexer, InternalLoadBatch, Rpc,
};
use solana_account::Account;
use solana_pubkey::{pubkey, Pubkey};

pub const STATE_TREE: Pubkey = pubkey!("smt1NamzXdq4AMqS2fS2F1i5KTYPZRhoHgWx38d8WsT");
pub const OUTPUT_QUEUE: Pubkey = pubkey!("nfq1NvQDJ2GEgnS8zt9prAe8rjjpAW1zFkrvZoBR148");

/// Unique pubkey on the ed25519 curve, usable as a wallet.
pub fn wallet() -> Pubkey {
    loop {
        let key = Pubkey::new_unique();
        if key.is_on_curve() {
            return key;
        }
    }
}

pub fn hot_account_data(
    mint: Pubkey,
    owner: Pubkey,
    amount: u64,
    delegate: Option<(Pubkey, u64)>,
    state: AccountState,
) -> Vec<u8> {
    let mut data = vec![0u8; ACCOUNT_LEN];
    data[0..32].copy_from_slice(mint.as_ref());
    data[32..64].copy_from_slice(owner.as_ref());
    data[64..72].copy_from_slice(&amount.to_le_bytes());
    if let Some((delegate, delegated_amount)) = delegate {
        data[72..76].copy_from_slice(&1u32.to_le_bytes());
        data[76..108].copy_from_slice(delegate.as_ref());
        data[121..129].copy_from_slice(&delegated_amount.to_le_bytes());
    }
    data[108] = state as u8;
    data
}

/// Extension list holding only CompressedOnly.
pub fn compressed_only_tlv(delegated_amount: u64) -> Vec<u8> {
    let mut tlv = 1u32.to_le_bytes().to_vec();
    tlv.push(COMPRESSED_ONLY_DISCRIMINATOR);
    tlv.extend_from_slice(&delegated_amount.to_le_bytes());
    tlv.extend_from_slice(&[0u8; 9]);
    tlv
}

#[derive(Clone, Debug)]
pub struct ColdEntry {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub state: AccountState,
    pub tlv: Option<Vec<u8>>,
    pub tree_type: TreeType,
    pub prove_by_index: bool,
}

impl ColdEntry {
    pub fn new(mint: Pubkey, owner: Pubkey, amount: u64) -> Self {
        Self {
            mint,
            owner,
            amount,
            delegate: None,
            state: AccountState::Initialized,
            tlv: None,
            tree_type: TreeType::StateV2,
            prove_by_index: true,
        }
    }

    pub fn frozen(mut self) -> Self {
        self.state = AccountState::Frozen;
        self
    }

    /// Requires a root proof instead of proof by index.
    pub fn proven_by_root(mut self) -> Self {
        self.prove_by_index = false;
        self
    }

    pub fn delegate(mut self, delegate: Pubkey, tlv: Option<Vec<u8>>) -> Self {
        self.delegate = Some(delegate);
        self.tlv = tlv;
        self
    }

    fn token_data(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(self.mint.as_ref());
        data.extend_from_slice(self.owner.as_ref());
        data.extend_from_slice(&self.amount.to_le_bytes());
        match self.delegate {
            Some(delegate) => {
                data.push(1);
                data.extend_from_slice(delegate.as_ref());
            }
            None => data.push(0),
        }
        data.push(self.state as u8);
        match &self.tlv {
            Some(tlv) => {
                data.push(1);
                data.extend_from_slice(tlv);
            }
            None => data.push(0),
        }
        data
    }
}

#[derive(Default)]
pub struct MockChain {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    compressed: Mutex<Vec<CompressedTokenAccount>>,
    next_leaf: AtomicUsize,
    pub account_reads: AtomicUsize,
    pub compressed_reads: AtomicUsize,
    pub proof_requests: AtomicUsize,
    pub fail_proofs: AtomicBool,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst) + self.compressed_reads.load(Ordering::SeqCst)
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn add_mint(&self, decimals: u8) -> Pubkey {
        let mint = Pubkey::new_unique();
        let mut data = vec![0u8; 82];
        data[44] = decimals;
        data[45] = 1;
        self.set_account(
            mint,
            Account {
                lamports: 1_461_600,
                data,
                owner: SPL_TOKEN_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
        mint
    }

    /// Writes the `ata_type` associated account of `(owner, mint)`.
    pub fn set_hot(
        &self,
        ata_type: AtaType,
        owner: Pubkey,
        mint: Pubkey,
        amount: u64,
        delegate: Option<(Pubkey, u64)>,
        state: AccountState,
    ) -> Pubkey {
        let address = get_associated_token_address_interface(&owner, &mint, ata_type);
        self.set_account(
            address,
            Account {
                lamports: 2_039_280,
                data: hot_account_data(mint, owner, amount, delegate, state),
                owner: ata_type.token_program(),
                executable: false,
                rent_epoch: 0,
            },
        );
        address
    }

    pub fn add_cold(&self, entry: ColdEntry) -> [u8; 32] {
        let leaf_index = self.next_leaf.fetch_add(1, Ordering::SeqCst) as u32;
        let mut hash = [0u8; 32];
        hash[0] = 0xc0;
        hash[28..].copy_from_slice(&leaf_index.to_be_bytes());
        self.compressed.lock().unwrap().push(CompressedTokenAccount {
            hash,
            tree_info: TreeInfo {
                tree: STATE_TREE,
                queue: OUTPUT_QUEUE,
                tree_type: entry.tree_type,
            },
            leaf_index,
            prove_by_index: entry.prove_by_index,
            owner: LIGHT_TOKEN_PROGRAM_ID,
            lamports: 0,
            discriminator: [0, 0, 0, 0, 0, 0, 0, 4],
            data: entry.token_data(),
        });
        hash
    }

    pub fn add_cold_amounts(&self, mint: Pubkey, owner: Pubkey, amounts: &[u64]) {
        for amount in amounts {
            self.add_cold(ColdEntry::new(mint, owner, *amount));
        }
    }

    pub fn cold_count(&self) -> usize {
        self.compressed.lock().unwrap().len()
    }

    pub fn light_token_balance(&self, owner: Pubkey, mint: Pubkey) -> Option<u64> {
        let address = derive_light_token_ata(&owner, &mint).0;
        let accounts = self.accounts.lock().unwrap();
        accounts
            .get(&address)
            .map(|account| u64::from_le_bytes(account.data[64..72].try_into().unwrap()))
    }

    /// Applies the effect of landing `batches`: consumed cold accounts are
    /// nullified and their amount credited to the Light token account.
    pub fn apply_load_batches(&self, owner: Pubkey, mint: Pubkey, batches: &[InternalLoadBatch]) {
        for batch in batches {
            for source in &batch.compressed_accounts {
                let hash = source.hash().unwrap();
                let mut compressed = self.compressed.lock().unwrap();
                let position = compressed.iter().position(|c| c.hash == hash).unwrap();
                compressed.remove(position);
            }
            let credited: u64 = batch.compressed_accounts.iter().map(|s| s.amount).sum();
            let balance = self.light_token_balance(owner, mint).unwrap_or(0);
            self.set_hot(
                AtaType::LightToken,
                owner,
                mint,
                balance + credited,
                None,
                AccountState::Initialized,
            );
        }
    }
}

#[async_trait]
impl Rpc for MockChain {
    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(&address).cloned())
    }
}

#[async_trait]
impl Indexer for MockChain {
    async fn get_compressed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<CompressedTokenAccount>, IndexerError> {
        self.compressed_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .compressed
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.data[0..32] == mint.to_bytes() && c.data[32..64] == owner.to_bytes())
            .cloned()
            .collect())
    }

    async fn get_validity_proof(
        &self,
        inputs: Vec<ProofInput>,
    ) -> Result<ValidityProofWithContext, IndexerError> {
        self.proof_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_proofs.load(Ordering::SeqCst) {
            return Err(IndexerError::CustomError("prover unavailable".to_string()));
        }
        let compressed = self.compressed.lock().unwrap();
        let mut root_indices = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let account = compressed
                .iter()
                .find(|c| c.hash == input.hash)
                .ok_or(IndexerError::EmptyResult)?;
            root_indices.push((!account.prove_by_index).then_some(7));
        }
        let proof = root_indices
            .iter()
            .any(Option::is_some)
            .then(CompressedProof::default);
        Ok(ValidityProofWithContext {
            proof,
            root_indices,
        })
    }
}
