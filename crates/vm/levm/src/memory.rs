#![warn(clippy::arithmetic_side_effects)]

use crate::{
    constants::{MEMORY_EXPANSION_QUOTIENT, MEMORY_PAGE_SIZE, WORD_SIZE_IN_BYTES_USIZE},
    errors::{ExceptionalHalt, InternalError, VMError},
};
use ethereum_types::U256;
use std::fmt;

/// Frame scratch memory.
///
/// The buffer is allocated in pages and grows by doubling. Only the first
/// `size` bytes are visible to the frame; the rest is spare capacity kept
/// around so that a pooled frame does not have to allocate again.
pub struct Memory {
    buffer: Vec<u8>,
    size: usize,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            buffer: vec![0; MEMORY_PAGE_SIZE],
            size: 0,
        }
    }

    /// Virtual size. Always a multiple of 32.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grows the virtual size to `new_size`, zero-filling the newly exposed
    /// bytes.
    ///
    /// `new_size` must be a multiple of 32 and larger than the current size.
    /// The caller charges for the expansion before calling this, which is what
    /// keeps `new_size` bounded.
    pub fn grow(&mut self, new_size: usize) -> Result<(), VMError> {
        if new_size % WORD_SIZE_IN_BYTES_USIZE != 0 || new_size <= self.size {
            return Err(InternalError::InvalidMemoryGrowth {
                current: self.size,
                requested: new_size,
            }
            .into());
        }

        if new_size > self.capacity() {
            let mut new_capacity = self.capacity().saturating_mul(2);
            if new_capacity < new_size {
                new_capacity = new_size
                    .checked_next_multiple_of(MEMORY_PAGE_SIZE)
                    .ok_or(InternalError::MemoryAllocation {
                        requested: new_size,
                    })?;
            }
            self.allocate_capacity(new_capacity)?;
        }

        // Bytes past the old size may hold data from a previous frame.
        self.buffer
            .get_mut(self.size..new_size)
            .ok_or(InternalError::InvalidMemoryGrowth {
                current: self.size,
                requested: new_size,
            })?
            .fill(0);
        self.size = new_size;

        Ok(())
    }

    fn allocate_capacity(&mut self, new_capacity: usize) -> Result<(), VMError> {
        let additional = new_capacity
            .checked_sub(self.buffer.len())
            .ok_or(InternalError::Underflow)?;
        if self.buffer.try_reserve_exact(additional).is_err() {
            tracing::error!(requested = new_capacity, "frame memory allocation failed");
            return Err(InternalError::MemoryAllocation {
                requested: new_capacity,
            }
            .into());
        }
        self.buffer.resize(new_capacity, 0);
        Ok(())
    }

    /// Sets the virtual size to zero. Capacity and contents are kept.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Grows the memory so that `[offset, offset + size)` is addressable.
    pub fn resize_to(&mut self, offset: usize, size: usize) -> Result<(), VMError> {
        let new_size = calculate_memory_size(offset, size)?;
        if new_size > self.size {
            self.grow(new_size)?;
        }
        Ok(())
    }

    pub fn load_range(&mut self, offset: usize, size: usize) -> Result<&[u8], VMError> {
        if size == 0 {
            return Ok(&[]);
        }
        self.resize_to(offset, size)?;
        let end = offset.checked_add(size).ok_or(ExceptionalHalt::OutOfBounds)?;
        self.buffer
            .get(offset..end)
            .ok_or(ExceptionalHalt::OutOfBounds.into())
    }

    pub fn store_data(&mut self, offset: usize, data: &[u8]) -> Result<(), VMError> {
        if data.is_empty() {
            return Ok(());
        }
        self.resize_to(offset, data.len())?;
        let end = offset
            .checked_add(data.len())
            .ok_or(ExceptionalHalt::OutOfBounds)?;
        self.buffer
            .get_mut(offset..end)
            .ok_or(ExceptionalHalt::OutOfBounds)?
            .copy_from_slice(data);
        Ok(())
    }

    pub fn load_word(&mut self, offset: usize) -> Result<U256, VMError> {
        let bytes = self.load_range(offset, WORD_SIZE_IN_BYTES_USIZE)?;
        Ok(U256::from_big_endian(bytes))
    }

    pub fn store_word(&mut self, offset: usize, word: U256) -> Result<(), VMError> {
        self.store_data(offset, &word.to_big_endian())
    }

    /// Copies `[offset, offset + size)` out of the visible memory without
    /// growing it. Used to extract a frame's output window.
    pub fn copy_out(&self, offset: usize, size: usize) -> Result<Vec<u8>, VMError> {
        if size == 0 {
            return Ok(Vec::new());
        }
        let end = offset.checked_add(size).ok_or(ExceptionalHalt::OutOfBounds)?;
        if end > self.size {
            return Err(ExceptionalHalt::OutOfBounds.into());
        }
        self.buffer
            .get(offset..end)
            .map(<[u8]>::to_vec)
            .ok_or(ExceptionalHalt::OutOfBounds.into())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// When a memory expansion is triggered, only the additional bytes of memory
/// must be paid for.
#[inline]
pub fn expansion_cost(new_memory_size: usize, current_memory_size: usize) -> Result<u64, VMError> {
    let cost = if new_memory_size <= current_memory_size {
        0
    } else {
        // cost(x) > cost(y) where x > y, so this cannot underflow.
        cost(new_memory_size)?.wrapping_sub(cost(current_memory_size)?)
    };
    Ok(cost)
}

/// The total cost for a given memory size.
#[inline]
fn cost(memory_size: usize) -> Result<u64, VMError> {
    let memory_size_word = memory_size
        .checked_add(WORD_SIZE_IN_BYTES_USIZE.wrapping_sub(1))
        .ok_or(ExceptionalHalt::OutOfGas)?
        / WORD_SIZE_IN_BYTES_USIZE;

    let memory_size_word: u64 = memory_size_word
        .try_into()
        .map_err(|_| ExceptionalHalt::VeryLargeNumber)?;

    let gas_cost = (memory_size_word
        .checked_mul(memory_size_word)
        .ok_or(ExceptionalHalt::OutOfGas)?
        / MEMORY_EXPANSION_QUOTIENT)
        .checked_add(
            3u64.checked_mul(memory_size_word)
                .ok_or(ExceptionalHalt::OutOfGas)?,
        )
        .ok_or(ExceptionalHalt::OutOfGas)?;

    Ok(gas_cost)
}

#[inline]
pub fn calculate_memory_size(offset: usize, size: usize) -> Result<usize, VMError> {
    if size == 0 {
        return Ok(0);
    }

    offset
        .checked_add(size)
        .and_then(|sum| sum.checked_next_multiple_of(WORD_SIZE_IN_BYTES_USIZE))
        .ok_or(ExceptionalHalt::OutOfBounds.into())
}
