use crate::{
    errors::{ExceptionalHalt, InternalError, OpcodeResult, StatusCode, VMError},
    execution_state::{ExecutionState, FrameResult},
    gas_cost::{
        self, CALL_POSITIVE_VALUE_STIPEND, CALL_TO_EMPTY_ACCOUNT, CODE_DEPOSIT_COST,
        CREATE_BASE_COST, SELFDESTRUCT_STATIC,
    },
    gas_state::GasState,
    host::{AccessStatus, Host},
    opcode_handlers::{OpcodeHandler, size_offset_to_usize},
};
use ethereum_types::{Address, U256};

// System Operations
// Opcodes: RETURN, REVERT, plus the gas accounting shared by CALL*, CREATE*
// and SELFDESTRUCT.

/// Implementation for the `RETURN` opcode.
pub struct OpReturnHandler;
impl OpcodeHandler for OpReturnHandler {
    fn eval(state: &mut ExecutionState, _host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        set_output_window(state)?;
        Ok(OpcodeResult::Halt)
    }
}

/// Implementation for the `REVERT` opcode.
pub struct OpRevertHandler;
impl OpcodeHandler for OpRevertHandler {
    fn eval(state: &mut ExecutionState, _host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        set_output_window(state)?;
        state.status = StatusCode::Revert;
        Ok(OpcodeResult::Halt)
    }
}

fn set_output_window(state: &mut ExecutionState) -> Result<(), VMError> {
    let [offset, len] = state.stack.pop()?;
    let (len, offset) = size_offset_to_usize(len, offset)?;
    if len != 0 {
        state.expand_memory(offset, len)?;
    }
    state.set_output(offset, len);
    Ok(())
}

impl ExecutionState {
    /// Charges a storage-attributed cost through the ledger.
    pub fn charge_storage_gas(&mut self, delta: i64) -> Result<(), VMError> {
        let gas = self.gas_state.apply_storage_gas_delta(delta);
        self.charge(gas)
    }

    /// Charges a compute cost that later storage transitions may refund.
    pub fn charge_speculative_cpu_gas(&mut self, delta: i64) -> Result<(), VMError> {
        let gas = self.gas_state.apply_speculative_cpu_gas_delta(delta);
        self.charge(gas)
    }

    fn versioned_cost(&self, version_zero: i64, configured: u64) -> Result<i64, VMError> {
        if self.version == 0 {
            Ok(version_zero)
        } else {
            i64::try_from(configured).map_err(|_| ExceptionalHalt::VeryLargeNumber.into())
        }
    }

    /// Charges for creating an account. `from_tx` selects the cost paid when
    /// the account is created by the transaction itself.
    pub fn charge_new_account(&mut self, from_tx: bool) -> Result<(), VMError> {
        let cost = if from_tx {
            self.versioned_cost(0, self.gas_params.tx_new_account)?
        } else {
            self.versioned_cost(CALL_TO_EMPTY_ACCOUNT, self.gas_params.new_account)?
        };
        self.charge_storage_gas(cost)
    }

    /// Charges the base cost of CREATE/CREATE2 and returns the gas limit of
    /// the init code frame.
    pub fn charge_create(&mut self) -> Result<i64, VMError> {
        if self.in_static_mode() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }
        let cost = self.versioned_cost(CREATE_BASE_COST, self.gas_params.tx_create)?;
        self.charge_storage_gas(cost)?;

        Ok(if self.rev.caps_call_gas() {
            gas_cost::max_message_call_gas(self.gas_left)
        } else {
            self.gas_left
        })
    }

    /// Charges for storing `code_len` bytes of deployed code.
    pub fn charge_code_deposit(&mut self, code_len: usize) -> Result<(), VMError> {
        let per_byte = self.versioned_cost(CODE_DEPOSIT_COST, self.gas_params.code_deposit)?;
        let cost = i64::try_from(code_len)
            .ok()
            .and_then(|len| len.checked_mul(per_byte))
            .ok_or(ExceptionalHalt::OutOfGas)?;
        self.charge_storage_gas(cost)
    }

    /// Charges everything a CALL pays up front and returns the gas limit of
    /// the callee frame, stipend included.
    ///
    /// The callee's gas is not deducted here. [`Self::return_from_child`]
    /// deducts what the callee actually used.
    pub fn charge_call(
        &mut self,
        host: &mut dyn Host,
        target: Address,
        value: U256,
        requested_gas: U256,
    ) -> Result<i64, VMError> {
        let access = if self.rev.has_access_lists() {
            host.access_account(target)
        } else {
            AccessStatus::Warm
        };
        self.charge(gas_cost::call_account_access(self.rev, access))?;

        let has_value = !value.is_zero();
        if has_value {
            if self.in_static_mode() {
                return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
            }
            self.charge_speculative_cpu_gas(gas_cost::call_value_transfer())?;
        }

        let creates_account = !host.account_exists(target)
            && (has_value || !self.rev.has_empty_account_cleanup());
        if creates_account {
            self.charge_new_account(false)?;
        }

        let stipend = if has_value {
            CALL_POSITIVE_VALUE_STIPEND
        } else {
            0
        };
        let requested = requested_gas.min(U256::from(i64::MAX.unsigned_abs()));
        let requested = i64::try_from(requested.low_u64()).unwrap_or(i64::MAX);
        // Only the value cost net of the stipend was charged, so the stipend is
        // still part of gas_left here.
        let available = self.gas_left.saturating_sub(stipend).max(0);
        let gas = if self.rev.caps_call_gas() {
            requested.min(gas_cost::max_message_call_gas(available))
        } else if requested > available {
            return Err(ExceptionalHalt::OutOfGas.into());
        } else {
            requested
        };

        let child_gas_limit = gas.checked_add(stipend).ok_or(InternalError::Overflow)?;
        tracing::debug!(
            depth = self.msg.depth,
            %target,
            cold = access.is_cold(),
            creates_account,
            child_gas_limit,
            gas_left = self.gas_left,
            "call charged"
        );
        Ok(child_gas_limit)
    }

    /// Charges SELFDESTRUCT. `has_balance` tells whether funds move to the
    /// beneficiary.
    pub fn charge_selfdestruct(
        &mut self,
        host: &mut dyn Host,
        beneficiary: Address,
        has_balance: bool,
    ) -> Result<(), VMError> {
        if self.in_static_mode() {
            return Err(ExceptionalHalt::OpcodeNotAllowedInStaticContext.into());
        }
        if self.rev.caps_call_gas() {
            self.charge(SELFDESTRUCT_STATIC)?;
        }
        if self.rev.has_access_lists() && host.access_account(beneficiary).is_cold() {
            self.charge(gas_cost::COLD_ACCOUNT_ACCESS_COST)?;
        }
        let creates_account = !host.account_exists(beneficiary)
            && (has_balance || !self.rev.has_empty_account_cleanup());
        if creates_account && self.rev.caps_call_gas() {
            self.charge_new_account(false)?;
        }
        Ok(())
    }

    /// Folds the result of a callee that was given `child_gas_limit` into
    /// this frame and deducts what the call cost.
    pub fn return_from_child(
        &mut self,
        child_gas_limit: i64,
        result: &FrameResult,
    ) -> Result<(), VMError> {
        let child = GasState::from_result(self.version, result);
        let used = child_gas_limit
            .checked_sub(result.gas_left)
            .filter(|used| *used >= 0)
            .ok_or(InternalError::Underflow)?;
        let cost = self.gas_state.integrate(used, &child)?;
        self.charge(cost)?;
        self.return_data = result.output.clone();
        Ok(())
    }
}
