use super::{AccessStatus, Host, StorageStatus, TxContext};
use ethereum_types::{Address, H256, U256};
use rustc_hash::{FxHashMap, FxHashSet};

/// A storage slot as seen during one transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageSlot {
    /// Value at the start of the transaction.
    pub original: U256,
    pub current: U256,
    pub access_status: AccessStatus,
}

impl StorageSlot {
    pub fn new(value: U256) -> Self {
        Self {
            original: value,
            current: value,
            access_status: AccessStatus::Cold,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HostAccount {
    pub storage: FxHashMap<H256, StorageSlot>,
}

/// [`Host`] backed by hash maps. Holds the state of a single transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    pub accounts: FxHashMap<Address, HostAccount>,
    pub accessed_accounts: FxHashSet<Address>,
    pub tx_context: TxContext,
}

impl InMemoryHost {
    pub fn new(tx_context: TxContext) -> Self {
        Self {
            tx_context,
            ..Default::default()
        }
    }

    /// Makes `address` exist without touching its access status.
    pub fn add_account(&mut self, address: Address) -> &mut HostAccount {
        self.accounts.entry(address).or_default()
    }

    /// Seeds a slot whose original and current value is `value`.
    pub fn init_storage(&mut self, address: Address, key: H256, value: U256) {
        self.add_account(address)
            .storage
            .insert(key, StorageSlot::new(value));
    }

    /// Marks the slot as already accessed in this transaction.
    pub fn warm_storage(&mut self, address: Address, key: H256) {
        self.add_account(address)
            .storage
            .entry(key)
            .or_default()
            .access_status = AccessStatus::Warm;
    }

    pub fn warm_account(&mut self, address: Address) {
        self.accessed_accounts.insert(address);
    }

    pub fn slot(&self, address: Address, key: H256) -> Option<&StorageSlot> {
        self.accounts
            .get(&address)
            .and_then(|account| account.storage.get(&key))
    }
}

impl Host for InMemoryHost {
    fn get_storage(&self, address: Address, key: H256) -> U256 {
        self.slot(address, key)
            .map(|slot| slot.current)
            .unwrap_or_default()
    }

    fn set_storage(&mut self, address: Address, key: H256, value: U256) -> StorageStatus {
        let slot = self
            .add_account(address)
            .storage
            .entry(key)
            .or_default();
        let status = StorageStatus::classify(slot.original, slot.current, value);
        slot.current = value;
        status
    }

    fn access_account(&mut self, address: Address) -> AccessStatus {
        if self.accessed_accounts.insert(address) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    fn access_storage(&mut self, address: Address, key: H256) -> AccessStatus {
        let slot = self
            .add_account(address)
            .storage
            .entry(key)
            .or_default();
        std::mem::replace(&mut slot.access_status, AccessStatus::Warm)
    }

    fn account_exists(&self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn get_tx_context(&self) -> TxContext {
        self.tx_context.clone()
    }
}
