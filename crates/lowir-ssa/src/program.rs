use crate::function::Function;
use crate::types::SsaType;
use crate::values::{ValueData, ValueId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
    pub ty: SsaType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Function(Function),
    Global(Global),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Function(f) => &f.name,
            Member::Global(g) => &g.name,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Member::Function(f) => Some(f),
            Member::Global(_) => None,
        }
    }
}

/// Members keep their declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub path: String,
    pub members: IndexMap<String, Member>,
}

impl Package {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            members: IndexMap::new(),
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.members.values().filter_map(Member::as_function)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.members.get(name).and_then(Member::as_function)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub packages: Vec<Package>,
    values: Vec<ValueData>,
}

impl Program {
    pub(crate) fn from_parts(packages: Vec<Package>, values: Vec<ValueData>) -> Self {
        Self { packages, values }
    }

    /// Panics if `id` does not belong to this program.
    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id.0 as usize]
    }

    pub fn get_value(&self, id: ValueId) -> Option<&ValueData> {
        self.values.get(id.0 as usize)
    }

    pub fn values(&self) -> &[ValueData] {
        &self.values
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.path == path)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.packages.iter().flat_map(|p| p.functions())
    }
}
