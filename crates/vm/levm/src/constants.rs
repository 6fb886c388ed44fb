pub const WORD_SIZE_IN_BYTES_USIZE: usize = 32;

pub const STACK_LIMIT: usize = 1024;

pub const MEMORY_EXPANSION_QUOTIENT: u64 = 512;

/// Allocation granularity of the frame memory. Also its initial capacity.
pub const MEMORY_PAGE_SIZE: usize = 4 * 1024;

/// First version that splits the gas pool into compute and storage ledgers.
pub const SPLIT_GAS_VERSION: u64 = 3;

/// First version that reads its storage costs from [`crate::GasParameters`]
/// instead of the per-revision schedule.
pub const GAS_PARAMETERS_VERSION: u64 = 1;

pub const fn is_split_gas(version: u64) -> bool {
    version >= SPLIT_GAS_VERSION
}
