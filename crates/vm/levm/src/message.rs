use bytes::Bytes;
use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum CallKind {
    #[default]
    Call,
    DelegateCall,
    CallCode,
    StaticCall,
    Create,
    Create2,
}

impl CallKind {
    pub fn is_create(&self) -> bool {
        matches!(self, CallKind::Create | CallKind::Create2)
    }
}

/// What a frame is asked to execute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub kind: CallKind,
    /// Static frames may not modify state.
    pub is_static: bool,
    pub depth: usize,
    /// Gas available to the frame on entry.
    pub gas: i64,
    pub recipient: Address,
    pub sender: Address,
    pub input: Bytes,
    pub value: U256,
    /// Account whose code runs. Differs from `recipient` for delegate calls.
    pub code_address: Address,
}

impl Message {
    pub fn call(sender: Address, recipient: Address, gas: i64) -> Self {
        Self {
            kind: CallKind::Call,
            gas,
            recipient,
            sender,
            code_address: recipient,
            ..Default::default()
        }
    }

    /// Message for a child frame of `self` running under `kind`.
    pub fn child(&self, kind: CallKind, recipient: Address, gas: i64, value: U256) -> Self {
        Self {
            kind,
            is_static: self.is_static || kind == CallKind::StaticCall,
            depth: self.depth.saturating_add(1),
            gas,
            recipient,
            sender: self.recipient,
            input: Bytes::new(),
            value,
            code_address: recipient,
        }
    }
}
