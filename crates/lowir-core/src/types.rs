use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Int(u32),
    Ptr,
    Array { len: u64, elem: Box<Type> },
}

impl Type {
    pub const I1: Type = Type::Int(1);
    pub const I8: Type = Type::Int(8);
    pub const I32: Type = Type::Int(32);
    pub const I64: Type = Type::Int(64);

    pub fn array(len: u64, elem: Type) -> Self {
        Type::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn int_bits(&self) -> Option<u32> {
        match self {
            Type::Int(bits) => Some(*bits),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::Ptr => write!(f, "ptr"),
            Type::Array { len, elem } => write!(f, "[{} x {}]", len, elem),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub ret: Type,
    pub params: Vec<Type>,
    pub variadic: bool,
}

impl Signature {
    pub fn new(ret: Type) -> Self {
        Self {
            ret,
            params: Vec::new(),
            variadic: false,
        }
    }

    pub fn void() -> Self {
        Self::new(Type::Void)
    }

    pub fn param(mut self, ty: Type) -> Self {
        self.params.push(ty);
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Parameter list as written after the function name, e.g. `(ptr, ...)`.
    pub fn params_text(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(|t| t.to_string()).collect();
        if self.variadic {
            parts.push("...".to_string());
        }
        format!("({})", parts.join(", "))
    }
}

/// Function type, e.g. `void (...)`.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ret, self.params_text())
    }
}
