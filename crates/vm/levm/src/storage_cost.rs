//! SSTORE cost tables.
//!
//! A table maps each [`StorageStatus`] to a pair of signed deltas. In the
//! legacy regime the pair is (gas cost, refund). In the split regime it is
//! (compute delta, storage delta) and both go through the gas ledger's
//! netting.

use crate::{
    constants::is_split_gas,
    gas_cost::{COLD_SLOAD_COST, SSTORE_CLEAR_REFUND, SSTORE_RESET_BASE, WARM_STORAGE_READ_COST},
    gas_parameters::GasParameters,
    host::StorageStatus,
    revision::Revision,
};
use rustc_hash::FxHashMap;
use std::{ops::Index, sync::LazyLock};
use strum::{EnumCount, IntoEnumIterator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StorageCost {
    /// Gas cost, or compute delta in the split regime.
    pub gas_cost: i64,
    /// Refund, or storage delta in the split regime.
    pub gas_refund: i64,
}

impl StorageCost {
    pub const fn new(gas_cost: i64, gas_refund: i64) -> Self {
        Self {
            gas_cost,
            gas_refund,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageCostTable([StorageCost; StorageStatus::COUNT]);

impl Index<StorageStatus> for StorageCostTable {
    type Output = StorageCost;

    #[expect(clippy::indexing_slicing, reason = "the table has one entry per status")]
    fn index(&self, status: StorageStatus) -> &StorageCost {
        &self.0[status.index()]
    }
}

impl StorageCostTable {
    fn from_fn(f: impl Fn(StorageStatus) -> StorageCost) -> Self {
        let mut entries = [StorageCost::default(); StorageStatus::COUNT];
        for (entry, status) in entries.iter_mut().zip(StorageStatus::iter()) {
            *entry = f(status);
        }
        Self(entries)
    }

    pub fn entries(&self) -> &[StorageCost; StorageStatus::COUNT] {
        &self.0
    }

    /// Table used by versions from one on, derived from `params`.
    pub fn generate(version: u64, params: &GasParameters) -> Self {
        let warm = WARM_STORAGE_READ_COST;
        let set = i64::try_from(params.sset).unwrap_or(i64::MAX);
        let reset = SSTORE_RESET_BASE - COLD_SLOAD_COST;
        let clear = SSTORE_CLEAR_REFUND;

        if is_split_gas(version) {
            split_schedule(set.saturating_sub(reset), reset - warm)
        } else {
            net_schedule(&StorageCostSpec {
                net_cost: true,
                warm_access: warm,
                set,
                reset,
                clear,
            })
        }
    }

    /// Table used by version zero, fixed by the revision.
    #[allow(clippy::indexing_slicing)]
    pub fn for_revision(revision: Revision) -> &'static Self {
        &REVISION_TABLES[revision]
    }
}

/// Split regime. `storage` is the storage cost of adding a slot and `compute`
/// the compute cost of changing one.
fn split_schedule(storage: i64, compute: i64) -> StorageCostTable {
    use StorageStatus::*;
    StorageCostTable::from_fn(|status| match status {
        Assigned => StorageCost::new(0, 0),
        Added => StorageCost::new(compute, storage),
        Deleted => StorageCost::new(compute, -storage),
        Modified => StorageCost::new(compute, 0),
        DeletedAdded => StorageCost::new(0, storage),
        ModifiedDeleted => StorageCost::new(0, -storage),
        DeletedRestored => StorageCost::new(-compute, storage),
        AddedDeleted => StorageCost::new(-compute, -storage),
        ModifiedRestored => StorageCost::new(-compute, 0),
    })
}

/// Storage cost constants of one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageCostSpec {
    /// Whether the revision uses net gas metering (EIP-1283/2200).
    pub net_cost: bool,
    pub warm_access: i64,
    pub set: i64,
    pub reset: i64,
    pub clear: i64,
}

impl StorageCostSpec {
    pub const fn for_revision(revision: Revision) -> Self {
        const fn spec(net_cost: bool, warm_access: i64, reset: i64, clear: i64) -> StorageCostSpec {
            StorageCostSpec {
                net_cost,
                warm_access,
                set: 20000,
                reset,
                clear,
            }
        }
        match revision {
            Revision::Frontier
            | Revision::Homestead
            | Revision::TangerineWhistle
            | Revision::SpuriousDragon
            | Revision::Byzantium
            | Revision::Petersburg => spec(false, 200, 5000, 15000),
            Revision::Constantinople => spec(true, 200, 5000, 15000),
            Revision::Istanbul => spec(true, 800, 5000, 15000),
            Revision::Berlin => spec(true, WARM_STORAGE_READ_COST, 5000 - COLD_SLOAD_COST, 15000),
            Revision::London
            | Revision::Paris
            | Revision::Shanghai
            | Revision::Cancun
            | Revision::Prague => spec(
                true,
                WARM_STORAGE_READ_COST,
                5000 - COLD_SLOAD_COST,
                SSTORE_CLEAR_REFUND,
            ),
        }
    }
}

fn net_schedule(c: &StorageCostSpec) -> StorageCostTable {
    use StorageStatus::*;
    if !c.net_cost {
        let added = StorageCost::new(c.set, 0);
        let deleted = StorageCost::new(c.reset, c.clear);
        let modified = StorageCost::new(c.reset, 0);
        return StorageCostTable::from_fn(|status| match status {
            Added | DeletedAdded | DeletedRestored => added,
            Deleted | ModifiedDeleted | AddedDeleted => deleted,
            Assigned | Modified | ModifiedRestored => modified,
        });
    }

    StorageCostTable::from_fn(|status| match status {
        Assigned => StorageCost::new(c.warm_access, 0),
        Added => StorageCost::new(c.set, 0),
        Deleted => StorageCost::new(c.reset, c.clear),
        Modified => StorageCost::new(c.reset, 0),
        DeletedAdded => StorageCost::new(c.warm_access, -c.clear),
        ModifiedDeleted => StorageCost::new(c.warm_access, c.clear),
        DeletedRestored => StorageCost::new(c.warm_access, c.reset - c.warm_access - c.clear),
        AddedDeleted => StorageCost::new(c.warm_access, c.set - c.warm_access),
        ModifiedRestored => StorageCost::new(c.warm_access, c.reset - c.warm_access),
    })
}

static REVISION_TABLES: LazyLock<[StorageCostTable; Revision::COUNT]> = LazyLock::new(|| {
    let mut tables = [StorageCostTable([StorageCost::default(); StorageStatus::COUNT]); Revision::COUNT];
    for (table, revision) in tables.iter_mut().zip(Revision::iter()) {
        *table = net_schedule(&StorageCostSpec::for_revision(revision));
    }
    tables
});

/// Generated tables keyed by everything they depend on.
///
/// Lives on the frame and survives resets, so a pooled frame builds each
/// distinct table once.
#[derive(Debug, Clone, Default)]
pub struct StorageCostCache {
    tables: FxHashMap<(u64, GasParameters), StorageCostTable>,
}

impl StorageCostCache {
    pub fn get(&mut self, version: u64, params: &GasParameters) -> StorageCostTable {
        *self
            .tables
            .entry((version, *params))
            .or_insert_with(|| StorageCostTable::generate(version, params))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
