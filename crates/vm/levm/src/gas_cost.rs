use crate::{
    errors::{ExceptionalHalt, VMError},
    host::AccessStatus,
    revision::Revision,
};
use ExceptionalHalt::OutOfGas;

// Gas amounts are signed: split-regime deltas and refunds can be negative.

pub const VERYLOW: i64 = 3;

pub const WARM_STORAGE_READ_COST: i64 = 100;
pub const COLD_SLOAD_COST: i64 = 2100;
pub const COLD_ACCOUNT_ACCESS_COST: i64 = 2600;

pub const SLOAD_FRONTIER: i64 = 50;
pub const SLOAD_TANGERINE_WHISTLE: i64 = 200;
pub const SLOAD_ISTANBUL: i64 = 800;

/// Storage modification cost before EIP-2929 moved the cold part of it into
/// the access cost.
pub const SSTORE_RESET_BASE: i64 = 5000;
pub const SSTORE_CLEAR_REFUND: i64 = 4800;
pub const SSTORE_STIPEND: i64 = 2300;

pub const CALL_STATIC_TANGERINE_WHISTLE: i64 = 700;
pub const CALL_STATIC_FRONTIER: i64 = 40;
pub const CALL_POSITIVE_VALUE: i64 = 9000;
pub const CALL_POSITIVE_VALUE_STIPEND: i64 = 2300;
pub const CALL_TO_EMPTY_ACCOUNT: i64 = 25000;

pub const SELFDESTRUCT_STATIC: i64 = 5000;

pub const CREATE_BASE_COST: i64 = 32000;
pub const CODE_DEPOSIT_COST: i64 = 200;

/// Base cost of SLOAD, before any cold surcharge.
pub fn sload(revision: Revision) -> i64 {
    if revision.has_access_lists() {
        WARM_STORAGE_READ_COST
    } else if revision >= Revision::Istanbul {
        SLOAD_ISTANBUL
    } else if revision >= Revision::TangerineWhistle {
        SLOAD_TANGERINE_WHISTLE
    } else {
        SLOAD_FRONTIER
    }
}

/// Extra cost of reading a cold slot on top of the warm read.
pub fn sload_cold_surcharge(revision: Revision, access: AccessStatus) -> i64 {
    if revision.has_access_lists() && access.is_cold() {
        COLD_SLOAD_COST - WARM_STORAGE_READ_COST
    } else {
        0
    }
}

/// Cold access cost of the written slot, charged on top of the table entry.
pub fn sstore_cold_surcharge(revision: Revision, access: AccessStatus) -> i64 {
    if revision.has_access_lists() && access.is_cold() {
        COLD_SLOAD_COST
    } else {
        0
    }
}

/// Cost of touching the target account of a call.
pub fn call_account_access(revision: Revision, access: AccessStatus) -> i64 {
    if revision.has_access_lists() {
        match access {
            AccessStatus::Cold => COLD_ACCOUNT_ACCESS_COST,
            AccessStatus::Warm => WARM_STORAGE_READ_COST,
        }
    } else if revision.caps_call_gas() {
        CALL_STATIC_TANGERINE_WHISTLE
    } else {
        CALL_STATIC_FRONTIER
    }
}

/// Value transfer cost, net of the stipend handed to the callee.
pub const fn call_value_transfer() -> i64 {
    CALL_POSITIVE_VALUE - CALL_POSITIVE_VALUE_STIPEND
}

/// All but one 64th of `gas_left` (EIP-150).
pub fn max_message_call_gas(gas_left: i64) -> i64 {
    gas_left - gas_left / 64
}

/// Subtracts `cost` from `gas_left`, failing when the result would be negative.
#[inline]
pub fn consume(gas_left: i64, cost: i64) -> Result<i64, VMError> {
    gas_left
        .checked_sub(cost)
        .filter(|left| *left >= 0)
        .ok_or(OutOfGas.into())
}
