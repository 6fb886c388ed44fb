use crate::{
    constants::is_split_gas,
    errors::{ExceptionalHalt, OpcodeResult, VMError},
    execution_state::ExecutionState,
    gas_cost::{self, SSTORE_STIPEND, WARM_STORAGE_READ_COST},
    host::{AccessStatus, Host},
    opcode_handlers::OpcodeHandler,
};
use ethereum_types::{H256, U256};

fn storage_key(word: U256) -> H256 {
    H256(word.to_big_endian())
}

/// Implementation for the `SLOAD` opcode.
pub struct OpSLoadHandler;
impl OpcodeHandler for OpSLoadHandler {
    fn eval(state: &mut ExecutionState, host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        state.charge(gas_cost::sload(state.rev))?;

        let key = storage_key(*state.stack.top()?);
        let address = state.msg.recipient;

        if state.rev.has_access_lists() {
            let access = host.access_storage(address, key);
            state.charge(gas_cost::sload_cold_surcharge(state.rev, access))?;
        }

        *state.stack.top_mut()? = host.get_storage(address, key);

        Ok(OpcodeResult::Continue)
    }
}

/// Implementation for the `SSTORE` opcode.
///
/// From version 3 on, only the warm access and the cold surcharge are charged
/// as real compute gas. The table entry is split into a storage delta and a
/// speculative compute delta that are netted through the gas ledger.
pub struct OpSStoreHandler;
impl OpcodeHandler for OpSStoreHandler {
    fn eval(state: &mut ExecutionState, host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        if state.in_static_mode() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }

        // EIP-2200
        if state.rev.enforces_sstore_stipend() && state.gas_left <= SSTORE_STIPEND {
            return Err(ExceptionalHalt::OutOfGas.into());
        }

        let [key, value] = state.stack.pop()?;
        let key = storage_key(key);
        let address = state.msg.recipient;

        let access = if state.rev.has_access_lists() {
            host.access_storage(address, key)
        } else {
            AccessStatus::Warm
        };
        let cold_surcharge = gas_cost::sstore_cold_surcharge(state.rev, access);

        let status = host.set_storage(address, key, value);
        let cost = state.storage_cost_table()[status];

        if is_split_gas(state.version) {
            let real_cpu_gas = WARM_STORAGE_READ_COST + cold_surcharge;
            let storage_gas = state.gas_state.apply_storage_gas_delta(cost.gas_refund);
            let speculative_cpu_gas = state.gas_state.apply_speculative_cpu_gas_delta(cost.gas_cost);
            state.charge(real_cpu_gas + storage_gas + speculative_cpu_gas)?;
        } else {
            state.charge(cost.gas_cost + cold_surcharge)?;
            state.gas_state.add_cpu_gas_refund(cost.gas_refund);
        }

        tracing::trace!(?status, %key, gas_left = state.gas_left, "sstore");
        Ok(OpcodeResult::Continue)
    }
}
