use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FuncId(pub u32);

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalId(pub u32);

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Index of a block within its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block{}", self.0)
    }
}

/// A local is unique across the whole module, not just its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId {
    pub func: FuncId,
    pub index: u32,
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:l{}", self.func, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    ConstInt { bits: u32, value: i64 },
    Global(GlobalId),
    Function(FuncId),
    Local(LocalId),
}

impl Value {
    pub fn i64(value: i64) -> Self {
        Value::ConstInt { bits: 64, value }
    }

    pub fn as_function(&self) -> Option<FuncId> {
        match self {
            Value::Function(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_global(&self) -> Option<GlobalId> {
        match self {
            Value::Global(id) => Some(*id),
            _ => None,
        }
    }
}

/// Initializer of a global definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    CharArray(Vec<u8>),
}

impl Constant {
    pub fn char_array(text: &str) -> Self {
        Constant::CharArray(text.as_bytes().to_vec())
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::CharArray(bytes) => Type::array(bytes.len() as u64, Type::I8),
        }
    }
}
