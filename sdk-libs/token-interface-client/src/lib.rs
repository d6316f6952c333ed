//! Client for unified Light token balances.
//!
//! A balance of one `(owner, mint)` may be spread over a hot Light token
//! account, SPL and Token-2022 accounts, and any number of cold compressed
//! token accounts. This crate reads all of them into one
//! [`AccountInterface`], and builds the instruction bundles that load cold
//! balance into a hot account or transfer from it.
//!
//! | Function                               | Description                                   |
//! |----------------------------------------|-----------------------------------------------|
//! | [`get_account_interface`]              | Balance of a token account address            |
//! | [`get_ata_interface`]                  | Balance of an associated token account        |
//! | [`create_load_instruction_batches`]    | Load all cold balance of `(owner, mint)`      |
//! | [`create_transfer_instructions`]       | Transfer, loading cold balance as needed      |

pub mod address;
pub mod compute_units;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod indexer;
pub mod instructions;
pub mod interface;
pub mod layout;
pub mod load;
pub mod options;
pub mod rpc;
pub mod selection;
pub mod source;
pub mod transfer;
pub mod tx_size;

pub use address::{get_associated_token_address_interface, AtaType};
pub use error::TokenInterfaceError;
pub use fetch::{get_account_interface, get_ata_interface};
pub use indexer::Indexer;
pub use interface::AccountInterface;
pub use load::{
    create_load_instruction_batches, load_instruction_batches_from_interface, InternalLoadBatch,
};
pub use options::{ComputeBudgetConfig, InterfaceOptions, SplInterfaceInfo, TransferOptions};
pub use rpc::Rpc;
pub use selection::select_inputs_for_amount;
pub use source::{TokenAccountSource, TokenAccountSourceType};
pub use transfer::create_transfer_instructions;
