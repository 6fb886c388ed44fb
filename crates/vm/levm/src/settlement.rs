use crate::{
    errors::{InternalError, StatusCode, VMError},
    execution_state::FrameResult,
    gas_state::GasState,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Final accounting of a top-level frame, after its ledger is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub status: StatusCode,
    pub gas_used: i64,
    pub gas_left: i64,
    /// Compute refund left for transaction-level refund capping.
    pub gas_refund: i64,
    pub storage_gas_consumed: i64,
    pub storage_gas_refund: i64,
    pub speculative_cpu_gas_consumed: i64,
    pub output: Bytes,
}

impl Settlement {
    /// Collapses the ledger of a top-level frame that was given `gas_limit`.
    ///
    /// Gas charged and then cancelled by a refund of the same kind is given
    /// back, so it shows up in `gas_left` and not in `gas_used`.
    pub fn from_result(
        gas_limit: i64,
        result: &FrameResult,
        version: u64,
    ) -> Result<Self, VMError> {
        let mut gas_state = GasState::from_result(version, result);
        let netted = gas_state.collapse();

        let gas_left = result
            .gas_left
            .checked_add(netted)
            .ok_or(InternalError::Overflow)?;
        let gas_used = gas_limit
            .checked_sub(gas_left)
            .filter(|used| *used >= 0)
            .ok_or(InternalError::Underflow)?;

        Ok(Self {
            status: result.status,
            gas_used,
            gas_left,
            gas_refund: gas_state.cpu_gas_refund(),
            storage_gas_consumed: gas_state.storage_gas_consumed(),
            storage_gas_refund: gas_state.storage_gas_refund(),
            speculative_cpu_gas_consumed: gas_state.speculative_cpu_gas_consumed(),
            output: result.output.clone(),
        })
    }

    /// Gas used that was neither storage nor speculative compute gas.
    pub fn real_cpu_gas_used(&self) -> i64 {
        self.gas_used - self.storage_gas_consumed - self.speculative_cpu_gas_consumed
    }
}
