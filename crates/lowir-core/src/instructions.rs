use crate::values::{BlockId, LocalId, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    AShr,
}

impl BinaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::SDiv => "sdiv",
            BinaryOp::SRem => "srem",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::AShr => "ashr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl IntPredicate {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Binary {
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
    },
    ICmp {
        pred: IntPredicate,
        lhs: Value,
        rhs: Value,
    },
    Call {
        callee: Value,
        args: Vec<Value>,
    },
    Ret(Option<Value>),
    Br(BlockId),
    CondBr {
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    },
}

impl Instruction {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instruction::Ret(_) | Instruction::Br(_) | Instruction::CondBr { .. }
        )
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Binary { op, .. } => op.mnemonic(),
            Instruction::ICmp { .. } => "icmp",
            Instruction::Call { .. } => "call",
            Instruction::Ret(_) => "ret",
            Instruction::Br(_) | Instruction::CondBr { .. } => "br",
        }
    }
}

/// An appended instruction and the local it defines, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstData {
    pub result: Option<LocalId>,
    pub inst: Instruction,
}
