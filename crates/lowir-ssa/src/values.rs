use crate::types::SsaType;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an SSA value: its index in the program's value arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(BigInt),
    String(String),
    Bool(bool),
    Float(f64),
    Nil,
}

impl Constant {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constant::Int(_) => "int",
            Constant::String(_) => "string",
            Constant::Bool(_) => "bool",
            Constant::Float(_) => "float",
            Constant::Nil => "nil",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{}", value),
            Constant::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        '\0' => write!(f, "\\0")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Float(v) => {
                let text = v.to_string();
                if text.contains('.') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Constant::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    Const(Constant),
    Builtin(String),
    /// Produced by an instruction. The producing instruction carries this value's id.
    InstrResult,
    Parameter { index: u32 },
    Function(String),
    Global(String),
}

impl ValueKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueKind::Const(_) => "constant",
            ValueKind::Builtin(_) => "builtin",
            ValueKind::InstrResult => "instruction result",
            ValueKind::Parameter { .. } => "parameter",
            ValueKind::Function(_) => "function",
            ValueKind::Global(_) => "global",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueData {
    pub id: ValueId,
    pub name: String,
    pub kind: ValueKind,
    pub ty: Option<SsaType>,
}

impl ValueData {
    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ValueKind::Const(c) => Some(c),
            _ => None,
        }
    }
}

/// Operand spelling of the value in the textual SSA format.
impl fmt::Display for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Const(c) => write!(f, "{}", c),
            ValueKind::Builtin(name) => write!(f, "${}", name),
            ValueKind::Function(name) | ValueKind::Global(name) => write!(f, "@{}", name),
            ValueKind::InstrResult | ValueKind::Parameter { .. } => write!(f, "%{}", self.name),
        }
    }
}
