use crate::{
    analysis::CodeAnalysis,
    constants::GAS_PARAMETERS_VERSION,
    errors::{ExceptionalHalt, OpcodeResult, StatusCode, VMError},
    gas_cost,
    gas_parameters::{GasParameters, VmConfig},
    gas_state::GasState,
    host::{Host, TxContext},
    memory::{self, Memory},
    message::Message,
    opcode_handlers::OpcodeHandler,
    revision::Revision,
    stack::Stack,
    storage_cost::{StorageCostCache, StorageCostTable},
};
use bytes::Bytes;
use derive_more::derive::Debug;
use ethereum_types::Address;
use serde::{Deserialize, Serialize};

/// What a frame reports to its caller when it exits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameResult {
    pub status: StatusCode,
    pub gas_left: i64,
    pub gas_refund: i64,
    pub output: Bytes,
    pub storage_gas_consumed: i64,
    pub storage_gas_refund: i64,
    pub speculative_cpu_gas_consumed: i64,
}

impl FrameResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// State of one frame.
///
/// Built once and [`reset`](Self::reset) for every frame that reuses it.
/// Memory capacity, the stack space and generated storage cost tables
/// survive resets.
#[derive(Debug)]
pub struct ExecutionState {
    pub gas_state: GasState,
    pub memory: Memory,
    pub stack: Stack,
    pub msg: Message,
    pub rev: Revision,
    pub version: u64,
    pub gas_params: GasParameters,
    pub gas_left: i64,
    #[debug(skip)]
    pub return_data: Bytes,
    #[debug(skip)]
    pub original_code: Bytes,
    pub status: StatusCode,
    pub output_offset: usize,
    pub output_size: usize,
    #[debug(skip)]
    pub analysis: CodeAnalysis,
    /// Recipients of the frames leading to this one, outermost first.
    call_stack: Vec<Address>,
    #[debug(skip)]
    storage_costs: StorageCostCache,
    tx_context: Option<TxContext>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self {
            gas_state: GasState::default(),
            memory: Memory::new(),
            stack: Stack::default(),
            msg: Message::default(),
            rev: Revision::default(),
            version: 0,
            gas_params: GasParameters::default(),
            gas_left: 0,
            return_data: Bytes::new(),
            original_code: Bytes::new(),
            status: StatusCode::Success,
            output_offset: 0,
            output_size: 0,
            analysis: CodeAnalysis::None,
            call_stack: Vec::new(),
            storage_costs: StorageCostCache::default(),
            tx_context: None,
        }
    }

    pub fn with_config(msg: Message, config: &VmConfig, code: Bytes) -> Self {
        let mut state = Self::new();
        state.reset_with_config(msg, config, code);
        state
    }

    /// Prepares the state for a new frame.
    pub fn reset(
        &mut self,
        msg: Message,
        rev: Revision,
        code: Bytes,
        gas_params: GasParameters,
        version: u64,
    ) {
        self.memory.clear();
        self.stack.clear();
        self.gas_state.reset(version);
        self.gas_left = msg.gas;
        self.call_stack.clear();
        self.call_stack.push(msg.recipient);
        self.msg = msg;
        self.rev = rev;
        self.version = version;
        self.gas_params = gas_params;
        self.return_data = Bytes::new();
        self.original_code = code;
        self.status = StatusCode::Success;
        self.output_offset = 0;
        self.output_size = 0;
        self.analysis = CodeAnalysis::None;
        self.tx_context = None;

        tracing::debug!(
            depth = self.msg.depth,
            version,
            revision = %rev,
            gas = self.gas_left,
            "frame reset"
        );
    }

    pub fn reset_with_config(&mut self, msg: Message, config: &VmConfig, code: Bytes) {
        self.reset(
            msg,
            config.revision,
            code,
            config.gas_parameters,
            config.version,
        );
    }

    pub fn in_static_mode(&self) -> bool {
        self.msg.is_static
    }

    pub fn depth(&self) -> usize {
        self.msg.depth
    }

    pub fn call_stack(&self) -> &[Address] {
        &self.call_stack
    }

    /// Prefixes this frame's trace with the caller chain of its parent.
    pub fn inherit_call_stack(&mut self, parent: &[Address]) {
        let own = self.msg.recipient;
        self.call_stack.clear();
        self.call_stack.extend_from_slice(parent);
        self.call_stack.push(own);
    }

    /// Deducts `cost` from the remaining gas.
    #[inline]
    pub fn charge(&mut self, cost: i64) -> Result<(), VMError> {
        self.gas_left = gas_cost::consume(self.gas_left, cost)?;
        Ok(())
    }

    /// Charges for and performs the memory growth needed to address
    /// `[offset, offset + size)`.
    pub fn expand_memory(&mut self, offset: usize, size: usize) -> Result<(), VMError> {
        let new_size = memory::calculate_memory_size(offset, size)?;
        let cost = memory::expansion_cost(new_size, self.memory.len())?;
        self.charge(i64::try_from(cost).map_err(|_| ExceptionalHalt::OutOfGas)?)?;
        self.memory.resize_to(offset, size)
    }

    /// The storage cost table for the frame's version and revision.
    pub fn storage_cost_table(&mut self) -> StorageCostTable {
        if self.version >= GAS_PARAMETERS_VERSION {
            self.storage_costs.get(self.version, &self.gas_params)
        } else {
            *StorageCostTable::for_revision(self.rev)
        }
    }

    /// Fetches the transaction context from the host on first use.
    pub fn tx_context(&mut self, host: &dyn Host) -> &TxContext {
        self.tx_context.get_or_insert_with(|| host.get_tx_context())
    }

    pub fn set_output(&mut self, offset: usize, size: usize) {
        self.output_offset = offset;
        self.output_size = size;
    }

    /// Runs one handler against this frame.
    ///
    /// Exceptional halts end the frame and are reported through its status,
    /// so the caller only ever sees internal errors.
    pub fn execute<H: OpcodeHandler>(&mut self, host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        match H::eval(self, host) {
            Ok(result) => Ok(result),
            Err(err) => {
                self.halt(err)?;
                Ok(OpcodeResult::Halt)
            }
        }
    }

    /// Ends the frame because of `err`.
    ///
    /// Halts set the status and burn the remaining gas. Internal errors are
    /// handed back untouched.
    pub fn halt(&mut self, err: VMError) -> Result<(), VMError> {
        match err {
            VMError::ExceptionalHalt(halt) => {
                tracing::debug!(
                    depth = self.msg.depth,
                    call_stack = ?self.call_stack,
                    %halt,
                    "frame halted"
                );
                self.status = halt.into();
                self.gas_left = 0;
                Ok(())
            }
            VMError::Internal(ref internal) => {
                tracing::error!(
                    depth = self.msg.depth,
                    call_stack = ?self.call_stack,
                    %internal,
                    "internal error"
                );
                Err(err)
            }
        }
    }

    /// Produces the exit report of the frame.
    ///
    /// Only a successful frame keeps its ledger. Anything else undoes its
    /// state changes, so what it used counts as plain compute gas.
    pub fn finalize(&self) -> Result<FrameResult, VMError> {
        let output = self
            .memory
            .copy_out(self.output_offset, self.output_size)?
            .into();

        let gas_left = if self.status.burns_remaining_gas() {
            0
        } else {
            self.gas_left
        };

        let result = if self.status.is_success() {
            FrameResult {
                status: self.status,
                gas_left,
                gas_refund: self.gas_state.cpu_gas_refund(),
                output,
                storage_gas_consumed: self.gas_state.storage_gas_consumed(),
                storage_gas_refund: self.gas_state.storage_gas_refund(),
                speculative_cpu_gas_consumed: self.gas_state.speculative_cpu_gas_consumed(),
            }
        } else {
            FrameResult {
                status: self.status,
                gas_left,
                output,
                ..Default::default()
            }
        };

        tracing::debug!(
            depth = self.msg.depth,
            status = ?result.status,
            gas_left = result.gas_left,
            "frame finalized"
        );
        Ok(result)
    }
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::new()
    }
}
