use crate::{constants::STACK_LIMIT, errors::ExceptionalHalt};
use ethereum_types::U256;
use std::fmt;

/// Backing storage for the operand stack: room for exactly [`STACK_LIMIT`]
/// words, allocated once and never grown.
pub struct StackSpace(Box<[U256; STACK_LIMIT]>);

impl StackSpace {
    pub fn new() -> Self {
        Self(Box::new([U256::zero(); STACK_LIMIT]))
    }

    pub fn as_slice(&self) -> &[U256] {
        self.0.as_slice()
    }
}

impl Default for StackSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// Operand stack on top of a [`StackSpace`].
///
/// Values are stored from the end of the space towards the beginning, so
/// `offset` is the index of the current top and `STACK_LIMIT` means empty.
pub struct Stack {
    space: StackSpace,
    offset: usize,
}

impl Stack {
    pub fn len(&self) -> usize {
        STACK_LIMIT.wrapping_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.offset == STACK_LIMIT
    }

    /// Logically empties the stack. The space is not zeroed.
    pub fn clear(&mut self) {
        self.offset = STACK_LIMIT;
    }

    pub fn push(&mut self, value: U256) -> Result<(), ExceptionalHalt> {
        let next = self
            .offset
            .checked_sub(1)
            .ok_or(ExceptionalHalt::StackOverflow)?;
        let slot = self
            .space
            .0
            .get_mut(next)
            .ok_or(ExceptionalHalt::StackOverflow)?;
        *slot = value;
        self.offset = next;
        Ok(())
    }

    pub fn pop1(&mut self) -> Result<U256, ExceptionalHalt> {
        let value = *self
            .space
            .0
            .get(self.offset)
            .ok_or(ExceptionalHalt::StackUnderflow)?;
        self.offset = self.offset.wrapping_add(1);
        Ok(value)
    }

    /// Pops `N` values, top first.
    pub fn pop<const N: usize>(&mut self) -> Result<[U256; N], ExceptionalHalt> {
        if self.len() < N {
            return Err(ExceptionalHalt::StackUnderflow);
        }
        let mut values = [U256::zero(); N];
        for value in values.iter_mut() {
            *value = self.pop1()?;
        }
        Ok(values)
    }

    pub fn top(&self) -> Result<&U256, ExceptionalHalt> {
        self.space
            .0
            .get(self.offset)
            .ok_or(ExceptionalHalt::StackUnderflow)
    }

    pub fn top_mut(&mut self) -> Result<&mut U256, ExceptionalHalt> {
        self.space
            .0
            .get_mut(self.offset)
            .ok_or(ExceptionalHalt::StackUnderflow)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            space: StackSpace::new(),
            offset: STACK_LIMIT,
        }
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.space.as_slice().get(self.offset..).unwrap_or_default();
        f.debug_list().entries(values.iter().rev()).finish()
    }
}
