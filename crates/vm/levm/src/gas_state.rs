//! Per-frame gas ledger.
//!
//! From version 3 on, the single gas pool is split in two: compute gas and
//! storage gas. Each has a consumed counter and a refund pool, and a positive
//! delta always draws down the matching refund pool before it turns into a
//! real charge (and a negative one cancels consumption before it builds a
//! refund). Compute charges tied to storage transitions are tracked as
//! *speculative* so that a slot that is set and later restored nets to zero.
//!
//! Before version 3 every delta passes straight through as gas to charge and
//! only the compute refund pool is used.

use crate::{
    constants::is_split_gas,
    errors::{InternalError, VMError},
    execution_state::FrameResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasState {
    version: u64,
    cpu_gas_refund: i64,
    storage_gas_consumed: i64,
    storage_gas_refund: i64,
    speculative_cpu_gas_consumed: i64,
}

impl GasState {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn from_parts(
        version: u64,
        cpu_gas_refund: i64,
        storage_gas_consumed: i64,
        storage_gas_refund: i64,
        speculative_cpu_gas_consumed: i64,
    ) -> Self {
        Self {
            version,
            cpu_gas_refund,
            storage_gas_consumed,
            storage_gas_refund,
            speculative_cpu_gas_consumed,
        }
    }

    /// Rebuilds the ledger a child frame reported on exit.
    pub fn from_result(version: u64, result: &FrameResult) -> Self {
        Self::from_parts(
            version,
            result.gas_refund,
            result.storage_gas_consumed,
            result.storage_gas_refund,
            result.speculative_cpu_gas_consumed,
        )
    }

    /// Zeroes every pool and installs `version`.
    pub fn reset(&mut self, version: u64) {
        *self = Self::new(version);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cpu_gas_refund(&self) -> i64 {
        self.cpu_gas_refund
    }

    pub fn storage_gas_consumed(&self) -> i64 {
        self.storage_gas_consumed
    }

    pub fn storage_gas_refund(&self) -> i64 {
        self.storage_gas_refund
    }

    pub fn speculative_cpu_gas_consumed(&self) -> i64 {
        self.speculative_cpu_gas_consumed
    }

    pub fn is_split(&self) -> bool {
        is_split_gas(self.version)
    }

    /// Nets a storage delta against the storage refund pool and returns the
    /// gas to charge now.
    pub fn apply_storage_gas_delta(&mut self, storage_gas_delta: i64) -> i64 {
        if !self.is_split() {
            return storage_gas_delta;
        }
        let consumed = net(
            storage_gas_delta,
            &mut self.storage_gas_refund,
            &mut self.storage_gas_consumed,
        );
        tracing::trace!(
            delta = storage_gas_delta,
            consumed,
            storage_gas_consumed = self.storage_gas_consumed,
            storage_gas_refund = self.storage_gas_refund,
            "storage gas netted"
        );
        consumed
    }

    /// Nets a compute delta against the compute refund pool and returns the
    /// gas to charge now.
    pub fn apply_speculative_cpu_gas_delta(&mut self, cpu_gas_delta: i64) -> i64 {
        if !self.is_split() {
            return cpu_gas_delta;
        }
        let consumed = net(
            cpu_gas_delta,
            &mut self.cpu_gas_refund,
            &mut self.speculative_cpu_gas_consumed,
        );
        tracing::trace!(
            delta = cpu_gas_delta,
            consumed,
            speculative_cpu_gas_consumed = self.speculative_cpu_gas_consumed,
            cpu_gas_refund = self.cpu_gas_refund,
            "speculative compute gas netted"
        );
        consumed
    }

    pub fn add_cpu_gas_refund(&mut self, cpu_refund: i64) {
        self.cpu_gas_refund = self.cpu_gas_refund.saturating_add(cpu_refund);
    }

    /// Folds a returned child ledger into this one.
    ///
    /// `child_total_gas_to_consume` is everything the child used out of the
    /// gas it was given. Returns the gas this frame has to deduct for the
    /// call. The child's consumed counters are re-netted against this frame's
    /// refund pools, which is what makes the result independent of the depth
    /// at which a charge was made.
    pub fn integrate(
        &mut self,
        child_total_gas_to_consume: i64,
        child: &GasState,
    ) -> Result<i64, VMError> {
        if child.version != self.version {
            tracing::error!(
                parent = self.version,
                child = child.version,
                "gas state version mismatch across a call boundary"
            );
            return Err(InternalError::GasStateVersionMismatch {
                parent: self.version,
                child: child.version,
            }
            .into());
        }

        // The child used at least what its own pools account for.
        let child_real_cpu_gas_consumed = child_total_gas_to_consume
            .checked_sub(child.storage_gas_consumed)
            .and_then(|gas| gas.checked_sub(child.speculative_cpu_gas_consumed))
            .filter(|gas| *gas >= 0)
            .ok_or(InternalError::Underflow)?;
        let cpu_gas_refund = self
            .cpu_gas_refund
            .checked_add(child.cpu_gas_refund)
            .ok_or(InternalError::Overflow)?;
        let storage_gas_refund = self
            .storage_gas_refund
            .checked_add(child.storage_gas_refund)
            .ok_or(InternalError::Overflow)?;
        self.cpu_gas_refund = cpu_gas_refund;
        self.storage_gas_refund = storage_gas_refund;

        let storage = self.apply_storage_gas_delta(child.storage_gas_consumed);
        let speculative = self.apply_speculative_cpu_gas_delta(child.speculative_cpu_gas_consumed);

        let total = storage
            .checked_add(child_real_cpu_gas_consumed)
            .and_then(|gas| gas.checked_add(speculative))
            .ok_or(InternalError::Overflow)?;

        tracing::debug!(
            version = self.version,
            child_total_gas_to_consume,
            child_real_cpu_gas_consumed,
            total,
            "child gas state integrated"
        );
        Ok(total)
    }

    /// Cancels each consumed counter against its refund pool.
    ///
    /// Returns the cancelled amount, i.e. gas that was charged and is now
    /// given back.
    pub fn collapse(&mut self) -> i64 {
        let storage = self.storage_gas_consumed.min(self.storage_gas_refund);
        self.storage_gas_consumed -= storage;
        self.storage_gas_refund -= storage;

        let cpu = self.speculative_cpu_gas_consumed.min(self.cpu_gas_refund);
        self.speculative_cpu_gas_consumed -= cpu;
        self.cpu_gas_refund -= cpu;

        let netted = storage + cpu;
        tracing::debug!(
            version = self.version,
            netted,
            storage_gas_consumed = self.storage_gas_consumed,
            storage_gas_refund = self.storage_gas_refund,
            speculative_cpu_gas_consumed = self.speculative_cpu_gas_consumed,
            cpu_gas_refund = self.cpu_gas_refund,
            "gas state collapsed"
        );
        netted
    }
}

/// Applies `delta` to a (refund, consumed) pair and returns the increase of
/// `consumed`.
///
/// `consumed - refund` grows by exactly `delta` and neither side goes
/// negative.
fn net(delta: i64, refund: &mut i64, consumed: &mut i64) -> i64 {
    let d = delta.saturating_sub(*refund);
    *refund = d.saturating_neg().max(0);
    let increment = d.max(0);
    *consumed = consumed.saturating_add(increment);
    increment
}
