use crate::function::BlockIndex;
use crate::types::SsaType;
use crate::values::ValueId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub const ALL: [BinOp; 16] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Rem,
        BinOp::And,
        BinOp::Or,
        BinOp::Xor,
        BinOp::Shl,
        BinOp::Shr,
        BinOp::Eq,
        BinOp::Ne,
        BinOp::Lt,
        BinOp::Le,
        BinOp::Gt,
        BinOp::Ge,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Rem => "rem",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::Shr => "shr",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            BinOp::Lt => "lt",
            BinOp::Le => "le",
            BinOp::Gt => "gt",
            BinOp::Ge => "ge",
        }
    }

    pub fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == text)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
    Deref,
}

impl UnOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnOp::Neg => "neg",
            UnOp::Not => "not",
            UnOp::Deref => "load",
        }
    }

    pub fn from_mnemonic(text: &str) -> Option<Self> {
        match text {
            "neg" => Some(UnOp::Neg),
            "not" => Some(UnOp::Not),
            "load" => Some(UnOp::Deref),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Call {
        callee: ValueId,
        args: Vec<ValueId>,
    },
    BinOp {
        op: BinOp,
        x: ValueId,
        y: ValueId,
    },
    UnOp {
        op: UnOp,
        x: ValueId,
    },
    Return {
        results: Vec<ValueId>,
    },
    Jump {
        target: BlockIndex,
    },
    If {
        cond: ValueId,
        then_block: BlockIndex,
        else_block: BlockIndex,
    },
    Phi {
        edges: Vec<(BlockIndex, ValueId)>,
    },
    Alloc {
        ty: SsaType,
    },
    Store {
        addr: ValueId,
        value: ValueId,
    },
}

impl InstructionKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            InstructionKind::Call { .. } => "call",
            InstructionKind::BinOp { .. } => "binop",
            InstructionKind::UnOp { .. } => "unop",
            InstructionKind::Return { .. } => "return",
            InstructionKind::Jump { .. } => "jump",
            InstructionKind::If { .. } => "if",
            InstructionKind::Phi { .. } => "phi",
            InstructionKind::Alloc { .. } => "alloc",
            InstructionKind::Store { .. } => "store",
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstructionKind::Return { .. } | InstructionKind::Jump { .. } | InstructionKind::If { .. }
        )
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub result: Option<ValueId>,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(result: Option<ValueId>, kind: InstructionKind) -> Self {
        Self { result, kind }
    }
}
