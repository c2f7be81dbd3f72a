use crate::instructions::Instruction;
use crate::types::SsaType;
use crate::values::ValueId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockIndex(pub u32);

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub index: BlockIndex,
    pub label: String,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(index: BlockIndex, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            instructions: Vec::new(),
        }
    }

    /// The label, or `b<index>` for blocks that were never given one.
    pub fn name(&self) -> String {
        if self.label.is_empty() {
            format!("b{}", self.index.0)
        } else {
            self.label.clone()
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.instructions
            .last()
            .map(|inst| inst.kind.is_terminator())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValueId>,
    pub results: Vec<SsaType>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn block(&self, index: BlockIndex) -> Option<&BasicBlock> {
        self.blocks.get(index.0 as usize)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.instructions.len()).sum()
    }
}
