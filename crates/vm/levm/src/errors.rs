use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VMError {
    #[error("Exceptional halt: {0}")]
    ExceptionalHalt(#[from] ExceptionalHalt),
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
}

impl VMError {
    /// Internal errors are fatal: the frame status cannot express them and the
    /// outer driver must abort the whole operation.
    pub fn is_internal(&self) -> bool {
        matches!(self, VMError::Internal(_))
    }

    pub fn should_propagate(&self) -> bool {
        self.is_internal()
    }
}

/// Conditions that abort the current frame but let the caller continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ExceptionalHalt {
    #[error("Out of gas")]
    OutOfGas,
    #[error("Opcode not allowed in static context")]
    OpcodeNotAllowedInStaticContext,
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Stack overflow")]
    StackOverflow,
    #[error("Memory access out of bounds")]
    OutOfBounds,
    #[error("Very large number")]
    VeryLargeNumber,
}

/// Invariant violations in the surrounding system. Never recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum InternalError {
    #[error("Gas state version mismatch: parent is v{parent}, child is v{child}")]
    GasStateVersionMismatch { parent: u64, child: u64 },
    #[error("Failed to allocate {requested} bytes of frame memory")]
    MemoryAllocation { requested: usize },
    #[error("Invalid memory growth from {current} to {requested} bytes")]
    InvalidMemoryGrowth { current: usize, requested: usize },
    #[error("Arithmetic operation overflowed")]
    Overflow,
    #[error("Arithmetic operation underflowed")]
    Underflow,
    #[error("Conversion error")]
    ConversionError,
}

/// Status reported by a frame when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    #[default]
    Success,
    Failure,
    Revert,
    OutOfGas,
    StaticModeViolation,
    StackOverflow,
    StackUnderflow,
    InvalidMemoryAccess,
}

impl StatusCode {
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Success)
    }

    /// Every status except success and revert consumes the whole remaining gas.
    pub fn burns_remaining_gas(&self) -> bool {
        !matches!(self, StatusCode::Success | StatusCode::Revert)
    }
}

impl From<ExceptionalHalt> for StatusCode {
    fn from(halt: ExceptionalHalt) -> Self {
        match halt {
            ExceptionalHalt::OutOfGas | ExceptionalHalt::VeryLargeNumber => StatusCode::OutOfGas,
            ExceptionalHalt::OpcodeNotAllowedInStaticContext => StatusCode::StaticModeViolation,
            ExceptionalHalt::StackUnderflow => StatusCode::StackUnderflow,
            ExceptionalHalt::StackOverflow => StatusCode::StackOverflow,
            ExceptionalHalt::OutOfBounds => StatusCode::InvalidMemoryAccess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeResult {
    Continue,
    Halt,
}
