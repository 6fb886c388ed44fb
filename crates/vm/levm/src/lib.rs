//! # dualgas-levm
//!
//! Per-frame execution state and gas ledger of an EVM interpreter that can
//! split its gas pool into compute and storage gas.
//!
//! ## Overview
//!
//! The crate does not run bytecode on its own. An interpreter loop creates an
//! [`ExecutionState`] once, [resets](ExecutionState::reset) it for every
//! frame, and drives it through opcode handlers. This crate provides:
//! - **Frame state**: memory, operand stack, remaining gas and exit status
//! - **Gas ledger**: netting of storage and speculative compute deltas,
//!   integration of child frames and the final collapse
//! - **Storage pricing**: SLOAD/SSTORE and the versioned cost tables behind
//!   them
//! - **Account pricing**: CALL, CREATE, code deposit and SELFDESTRUCT charges
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ExecutionState                        │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐ │
//! │  │  Memory  │  │  Stack   │  │ GasState │  │ CostCache │ │
//! │  └──────────┘  └──────────┘  └──────────┘  └───────────┘ │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Host                              │
//! │          (storage, warm/cold access, tx context)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Gas accounting versions
//!
//! | Version | Storage costs | Gas pools |
//! |---------|---------------|-----------|
//! | 0 | fixed by [`Revision`] | single |
//! | 1, 2 | derived from [`GasParameters`] | single |
//! | 3+ | derived from [`GasParameters`] | compute + storage |
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`execution_state`] | Frame state, reset and exit report |
//! | [`gas_state`] | Gas ledger |
//! | [`storage_cost`] | SSTORE cost tables and their cache |
//! | [`gas_parameters`] | Tunable gas constants and frame configuration |
//! | [`opcode_handlers`] | Storage and system operations |
//! | [`settlement`] | Top-level collapse |
//! | [`host`] | World state interface and an in-memory host |
//! | [`memory`] | Frame memory |
//! | [`stack`] | Operand stack |
//! | [`analysis`] | Code analysis a frame carries for its interpreter |
//! | [`errors`] | VMError, ExceptionalHalt, StatusCode |
//!
//! ## Quick Start
//!
//! ```ignore
//! use dualgas_levm::{ExecutionState, InMemoryHost, Message, VmConfig};
//! use dualgas_levm::opcode_handlers::storage::OpSStoreHandler;
//!
//! let mut state = ExecutionState::with_config(msg, &config, code);
//! state.execute::<OpSStoreHandler>(&mut host)?;
//!
//! let result = state.finalize()?;
//! let settlement = Settlement::from_result(gas_limit, &result, config.version)?;
//! ```

pub mod analysis;
pub mod constants;
pub mod errors;
pub mod execution_state;
pub mod gas_cost;
pub mod gas_parameters;
pub mod gas_state;
pub mod host;
pub mod memory;
pub mod message;
pub mod opcode_handlers;
pub mod revision;
pub mod settlement;
pub mod stack;
pub mod storage_cost;

pub use errors::{ExceptionalHalt, InternalError, OpcodeResult, StatusCode, VMError};
pub use execution_state::{ExecutionState, FrameResult};
pub use gas_parameters::{GasParameters, GasParametersError, VmConfig};
pub use gas_state::GasState;
pub use host::{AccessStatus, Host, InMemoryHost, StorageStatus, TxContext};
pub use message::{CallKind, Message};
pub use revision::Revision;
pub use settlement::Settlement;
