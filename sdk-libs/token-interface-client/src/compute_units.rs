//! Compute unit estimates for load and transfer bundles.
use crate::options::ComputeBudgetConfig;

pub const TRANSFER_BASE_CU: u64 = 10_000;
pub const ATA_CREATION_CU: u64 = 30_000;
pub const WRAP_CU: u64 = 50_000;
pub const DECOMPRESS_BASE_CU: u64 = 50_000;
pub const FULL_PROOF_CU: u64 = 100_000;
pub const PROVE_BY_INDEX_INPUT_CU: u64 = 10_000;
pub const FULL_PROOF_INPUT_CU: u64 = 30_000;

const BPS_DENOMINATOR: u64 = 10_000;

/// What a bundle does, as far as compute cost is concerned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComputeUnitShape {
    pub includes_transfer: bool,
    pub account_creations: u32,
    pub wrap_count: u32,
    pub prove_by_index_inputs: u32,
    pub full_proof_inputs: u32,
}

impl ComputeUnitShape {
    /// Shape of a bundle running both `self` and `other`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            includes_transfer: self.includes_transfer || other.includes_transfer,
            account_creations: self.account_creations.saturating_add(other.account_creations),
            wrap_count: self.wrap_count.saturating_add(other.wrap_count),
            prove_by_index_inputs: self
                .prove_by_index_inputs
                .saturating_add(other.prove_by_index_inputs),
            full_proof_inputs: self.full_proof_inputs.saturating_add(other.full_proof_inputs),
        }
    }

    fn raw_units(&self) -> u64 {
        let mut units = 0u64;
        if self.includes_transfer {
            units += TRANSFER_BASE_CU;
        }
        units += ATA_CREATION_CU * u64::from(self.account_creations);
        units += WRAP_CU * u64::from(self.wrap_count);
        if self.prove_by_index_inputs > 0 || self.full_proof_inputs > 0 {
            units += DECOMPRESS_BASE_CU;
        }
        if self.full_proof_inputs > 0 {
            units += FULL_PROOF_CU;
        }
        units += PROVE_BY_INDEX_INPUT_CU * u64::from(self.prove_by_index_inputs);
        units += FULL_PROOF_INPUT_CU * u64::from(self.full_proof_inputs);
        units
    }
}

/// Buffered, clamped compute unit limit for a bundle of `shape`.
pub fn estimate_compute_units(shape: &ComputeUnitShape, config: &ComputeBudgetConfig) -> u32 {
    let buffered = shape
        .raw_units()
        .saturating_mul(u64::from(config.buffer_bps))
        / BPS_DENOMINATOR;
    let clamped = buffered
        .max(u64::from(config.min_units))
        .min(u64::from(config.max_units));
    u32::try_from(clamped).unwrap_or(u32::MAX)
}
