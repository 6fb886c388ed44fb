//! Bytecode analysis results an interpreter strategy attaches to a frame.
//!
//! Only one strategy is active for a frame, so the frame holds a single
//! [`CodeAnalysis`] value rather than one slot per kind. Producing the
//! analyses is up to the interpreter that consumes them.

use std::sync::Arc;

/// Valid JUMPDEST offsets, used by the baseline interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTargets {
    targets: Vec<u32>,
}

impl JumpTargets {
    pub fn new(mut targets: Vec<u32>) -> Self {
        targets.sort_unstable();
        targets.dedup();
        Self { targets }
    }

    pub fn is_valid(&self, offset: usize) -> bool {
        u32::try_from(offset)
            .map(|offset| self.targets.binary_search(&offset).is_ok())
            .unwrap_or(false)
    }
}

/// Basic block boundaries as inclusive `(start, end)` offsets, used by the
/// advanced interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlocks {
    pub blocks: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Default)]
pub enum CodeAnalysis {
    #[default]
    None,
    Baseline(Arc<JumpTargets>),
    Advanced(Arc<BasicBlocks>),
}

impl CodeAnalysis {
    pub fn baseline(targets: JumpTargets) -> Self {
        CodeAnalysis::Baseline(Arc::new(targets))
    }

    pub fn advanced(blocks: BasicBlocks) -> Self {
        CodeAnalysis::Advanced(Arc::new(blocks))
    }

    pub fn jump_targets(&self) -> Option<&JumpTargets> {
        match self {
            CodeAnalysis::Baseline(targets) => Some(targets),
            _ => None,
        }
    }

    pub fn basic_blocks(&self) -> Option<&BasicBlocks> {
        match self {
            CodeAnalysis::Advanced(blocks) => Some(blocks),
            _ => None,
        }
    }
}
