use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SsaType {
    Int,
    Bool,
    String,
    Float,
    Pointer(Box<SsaType>),
}

impl SsaType {
    pub fn pointer_to(self) -> Self {
        SsaType::Pointer(Box::new(self))
    }
}

impl fmt::Display for SsaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsaType::Int => write!(f, "int"),
            SsaType::Bool => write!(f, "bool"),
            SsaType::String => write!(f, "string"),
            SsaType::Float => write!(f, "float"),
            SsaType::Pointer(inner) => write!(f, "*{}", inner),
        }
    }
}
