use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use strum::{Display, EnumCount, EnumIter, EnumString};

/// Ethereum hard forks the core knows how to price.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Revision {
    Frontier = 0,
    Homestead = 1,
    TangerineWhistle = 2,
    SpuriousDragon = 3,
    Byzantium = 4,
    Constantinople = 5,
    Petersburg = 6,
    Istanbul = 7,
    Berlin = 8,
    London = 9,
    Paris = 10,
    #[default]
    Shanghai = 11,
    Cancun = 12,
    Prague = 13,
}

impl Revision {
    #[expect(clippy::as_conversions, reason = "fieldless enum with explicit discriminants")]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// EIP-2929: accounts and storage keys are priced as warm or cold.
    pub fn has_access_lists(self) -> bool {
        self >= Revision::Berlin
    }

    /// EIP-2200: SSTORE fails when the frame has no more than the call stipend left.
    pub fn enforces_sstore_stipend(self) -> bool {
        self >= Revision::Istanbul
    }

    /// EIP-150: a call may forward at most all but one 64th of the remaining gas.
    pub fn caps_call_gas(self) -> bool {
        self >= Revision::TangerineWhistle
    }

    /// EIP-161: value transfers to empty accounts are the only ones that pay
    /// for account creation.
    pub fn has_empty_account_cleanup(self) -> bool {
        self >= Revision::SpuriousDragon
    }
}

impl<T> Index<Revision> for [T] {
    type Output = T;
    #[expect(clippy::indexing_slicing, reason = "tables are sized by Revision::COUNT")]
    fn index(&self, revision: Revision) -> &Self::Output {
        &self[revision.index()]
    }
}

impl<T> IndexMut<Revision> for [T] {
    #[expect(clippy::indexing_slicing, reason = "tables are sized by Revision::COUNT")]
    fn index_mut(&mut self, revision: Revision) -> &mut Self::Output {
        &mut self[revision.index()]
    }
}
