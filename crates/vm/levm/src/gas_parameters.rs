//! Configurable gas constants and per-frame selectors.
//!
//! Everything here deserializes with `#[serde(default)]`, so a configuration
//! document only has to name the values it overrides.

use crate::revision::Revision;
use ethereum_types::U256;
use serde::{Deserialize, Serialize};

/// Gas constants that versioned chains may tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GasParameters {
    /// New-account cost when the account is created by a transaction.
    pub tx_new_account: u64,
    /// New-account cost when the account is created by an internal call.
    pub new_account: u64,
    /// Base cost of contract creation.
    pub tx_create: u64,
    /// Cost per byte of deployed code.
    pub code_deposit: u64,
    /// Cost of setting a zero storage slot to nonzero.
    pub sset: u64,
}

impl Default for GasParameters {
    fn default() -> Self {
        Self {
            tx_new_account: 0,
            new_account: 25000,
            tx_create: 32000,
            code_deposit: 200,
            sset: 20000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GasParametersError {
    #[error("Discount factor denominator is zero")]
    ZeroDenominator,
    #[error("Scaled value of {field} does not fit in 64 bits")]
    ScaledValueTooLarge { field: &'static str },
}

impl GasParameters {
    pub fn new(
        tx_new_account: u64,
        new_account: u64,
        tx_create: u64,
        code_deposit: u64,
        sset: u64,
    ) -> Self {
        Self {
            tx_new_account,
            new_account,
            tx_create,
            code_deposit,
            sset,
        }
    }

    /// Scales every constant by `numerator / denominator`, rounding down.
    pub fn apply_discount_factor(
        &self,
        numerator: U256,
        denominator: U256,
    ) -> Result<Self, GasParametersError> {
        if denominator.is_zero() {
            return Err(GasParametersError::ZeroDenominator);
        }

        let scale = |field: &'static str, value: u64| -> Result<u64, GasParametersError> {
            let scaled = U256::from(value)
                .full_mul(numerator)
                .checked_div(denominator.into())
                .ok_or(GasParametersError::ZeroDenominator)?;
            U256::try_from(scaled)
                .ok()
                .filter(|v| v.bits() <= 64)
                .map(|v| v.low_u64())
                .ok_or(GasParametersError::ScaledValueTooLarge { field })
        };

        Ok(Self {
            tx_new_account: scale("tx_new_account", self.tx_new_account)?,
            new_account: scale("new_account", self.new_account)?,
            tx_create: scale("tx_create", self.tx_create)?,
            code_deposit: scale("code_deposit", self.code_deposit)?,
            sset: scale("sset", self.sset)?,
        })
    }
}

/// The selectors a frame is reset with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    pub revision: Revision,
    /// Gas accounting version. Zero prices storage by revision, versions from
    /// one read [`GasParameters`], versions from three split the gas pool.
    pub version: u64,
    pub gas_parameters: GasParameters,
}

impl VmConfig {
    pub fn new(revision: Revision, version: u64, gas_parameters: GasParameters) -> Self {
        Self {
            revision,
            version,
            gas_parameters,
        }
    }
}
