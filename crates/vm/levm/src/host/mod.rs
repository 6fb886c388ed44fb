//! Interface to the world state.
//!
//! The execution core never owns account or storage data. Every storage read,
//! write and warm/cold classification goes through a [`Host`], and the effects
//! of a call are visible to the next call within the same frame.

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

pub mod in_memory;

pub use in_memory::InMemoryHost;

/// How a storage write changed a slot, relative to its value at the start of
/// the transaction (`original`) and before this write (`current`).
///
/// The discriminants index the storage cost tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, Serialize, Deserialize,
)]
pub enum StorageStatus {
    /// The value did not change in a way that matters for gas.
    Assigned = 0,
    /// Zero to nonzero, first write.
    Added = 1,
    /// Nonzero to zero, first write.
    Deleted = 2,
    /// Nonzero to a different nonzero, first write.
    Modified = 3,
    /// Previously deleted, now set to a nonzero value other than the original.
    DeletedAdded = 4,
    /// Previously modified, now deleted.
    ModifiedDeleted = 5,
    /// Previously deleted, now restored to the original value.
    DeletedRestored = 6,
    /// Previously added, now deleted again.
    AddedDeleted = 7,
    /// Previously modified, now restored to the original value.
    ModifiedRestored = 8,
}

impl StorageStatus {
    /// Position of this status in a storage cost table.
    #[expect(clippy::as_conversions, reason = "fieldless enum with explicit discriminants")]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Classifies writing `new` to a slot with the given `original` and
    /// `current` values (net gas metering rules).
    pub fn classify(original: U256, current: U256, new: U256) -> Self {
        if current == new {
            return StorageStatus::Assigned;
        }

        if original == current {
            return if original.is_zero() {
                StorageStatus::Added
            } else if new.is_zero() {
                StorageStatus::Deleted
            } else {
                StorageStatus::Modified
            };
        }

        // The slot was already written in this transaction.
        if original.is_zero() {
            return if new.is_zero() {
                StorageStatus::AddedDeleted
            } else {
                StorageStatus::Assigned
            };
        }

        if current.is_zero() {
            if new == original {
                StorageStatus::DeletedRestored
            } else {
                StorageStatus::DeletedAdded
            }
        } else if new.is_zero() {
            StorageStatus::ModifiedDeleted
        } else if new == original {
            StorageStatus::ModifiedRestored
        } else {
            StorageStatus::Assigned
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessStatus {
    #[default]
    Cold,
    Warm,
}

impl AccessStatus {
    pub fn is_cold(&self) -> bool {
        matches!(self, AccessStatus::Cold)
    }
}

/// Block and transaction values a frame may ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    pub gas_price: U256,
    pub origin: Address,
    pub coinbase: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub block_gas_limit: u64,
    pub prev_randao: H256,
    pub chain_id: U256,
    pub base_fee: U256,
}

pub trait Host {
    fn get_storage(&self, address: Address, key: H256) -> U256;

    fn set_storage(&mut self, address: Address, key: H256, value: U256) -> StorageStatus;

    /// Marks the account as accessed, returning its status before the access.
    fn access_account(&mut self, address: Address) -> AccessStatus;

    /// Marks the slot as accessed, returning its status before the access.
    fn access_storage(&mut self, address: Address, key: H256) -> AccessStatus;

    fn account_exists(&self, address: Address) -> bool;

    fn get_tx_context(&self) -> TxContext;
}
