use crate::{
    errors::{ExceptionalHalt, OpcodeResult, VMError},
    execution_state::ExecutionState,
    host::Host,
};
use ethereum_types::U256;

pub mod storage;
pub mod system;

pub trait OpcodeHandler {
    fn eval(state: &mut ExecutionState, host: &mut dyn Host) -> Result<OpcodeResult, VMError>;
}

pub struct OpStopHandler;
impl OpcodeHandler for OpStopHandler {
    fn eval(_state: &mut ExecutionState, _host: &mut dyn Host) -> Result<OpcodeResult, VMError> {
        Ok(OpcodeResult::Halt)
    }
}

/// Converts a memory window taken from the stack. A zero size never touches
/// memory, so its offset is ignored.
pub fn size_offset_to_usize(size: U256, offset: U256) -> Result<(usize, usize), VMError> {
    if size.is_zero() {
        return Ok((0, 0));
    }
    let size = usize::try_from(size).map_err(|_| ExceptionalHalt::VeryLargeNumber)?;
    let offset = usize::try_from(offset).map_err(|_| ExceptionalHalt::VeryLargeNumber)?;
    Ok((size, offset))
}
