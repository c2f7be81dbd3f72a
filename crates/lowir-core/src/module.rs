use crate::builder::InstBuilder;
use crate::function::Function;
use crate::types::{Signature, Type};
use crate::values::{BlockId, Constant, FuncId, GlobalId, Value};
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDef {
    pub id: GlobalId,
    pub name: String,
    pub init: Constant,
}

impl GlobalDef {
    pub fn ty(&self) -> Type {
        self.init.ty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Global(GlobalId),
    Function(FuncId),
}

/// Append-only container of globals and functions.
///
/// Globals and functions are only ever pushed; ids are indices and stay valid
/// for the lifetime of the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub globals: Vec<GlobalDef>,
    pub functions: Vec<Function>,
    symbols: IndexMap<String, Symbol>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            globals: Vec::new(),
            functions: Vec::new(),
            symbols: IndexMap::new(),
        }
    }

    fn add_function(&mut self, name: &str, sig: Signature, is_declaration: bool) -> Result<FuncId> {
        if self.symbols.contains_key(name) {
            return Err(IrError::DuplicateSymbol(name.to_string()));
        }
        let id = FuncId(self.functions.len() as u32);
        self.functions
            .push(Function::new(id, name.to_string(), sig, is_declaration));
        self.symbols.insert(name.to_string(), Symbol::Function(id));
        Ok(id)
    }

    /// Declares an external function with no body.
    pub fn declare_function(&mut self, name: &str, sig: Signature) -> Result<FuncId> {
        self.add_function(name, sig, true)
    }

    pub fn define_function(&mut self, name: &str, sig: Signature) -> Result<FuncId> {
        self.add_function(name, sig, false)
    }

    /// Defines an anonymous global. `name_hint` is suffixed (`.1`, `.2`, ...)
    /// until it no longer clashes with an existing symbol.
    pub fn define_global(&mut self, name_hint: &str, init: Constant) -> GlobalId {
        let mut name = name_hint.to_string();
        let mut suffix = 1;
        while self.symbols.contains_key(&name) {
            name = format!("{}.{}", name_hint, suffix);
            suffix += 1;
        }

        let id = GlobalId(self.globals.len() as u32);
        self.globals.push(GlobalDef {
            id,
            name: name.clone(),
            init,
        });
        self.symbols.insert(name, Symbol::Global(id));
        id
    }

    pub fn append_block(&mut self, func: FuncId, name_hint: &str) -> Result<BlockId> {
        let function = self
            .functions
            .get_mut(func.0 as usize)
            .ok_or(IrError::UnknownFunction(func))?;
        if function.is_declaration {
            return Err(IrError::NotADefinition(function.name.clone()));
        }
        Ok(function.push_block(name_hint))
    }

    /// Cursor for appending one instruction at the end of `block`.
    pub fn ins(&mut self, func: FuncId, block: BlockId) -> Result<InstBuilder<'_>> {
        let function = self.function(func).ok_or(IrError::UnknownFunction(func))?;
        if function.is_declaration {
            return Err(IrError::NotADefinition(function.name.clone()));
        }
        let target = function.block(block).ok_or_else(|| IrError::UnknownBlock {
            function: function.name.clone(),
            block,
        })?;
        if target.is_terminated() {
            return Err(IrError::BlockTerminated {
                function: function.name.clone(),
                block: target.name.clone(),
            });
        }
        Ok(InstBuilder::new(self, func, block))
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id.0 as usize)
    }

    pub(crate) fn function_mut(&mut self, id: FuncId) -> Option<&mut Function> {
        self.functions.get_mut(id.0 as usize)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        match self.symbols.get(name)? {
            Symbol::Function(id) => self.function(*id),
            Symbol::Global(_) => None,
        }
    }

    pub fn global(&self, id: GlobalId) -> Option<&GlobalDef> {
        self.globals.get(id.0 as usize)
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| !f.is_declaration)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| f.is_declaration)
    }

    /// Symbol name of a global or function value.
    pub fn symbol_name(&self, value: &Value) -> Option<&str> {
        match value {
            Value::Global(id) => self.global(*id).map(|g| g.name.as_str()),
            Value::Function(id) => self.function(*id).map(|f| f.name.as_str()),
            Value::ConstInt { .. } | Value::Local(_) => None,
        }
    }

    pub fn value_type(&self, value: &Value) -> Result<Type> {
        match value {
            Value::ConstInt { bits, .. } => Ok(Type::Int(*bits)),
            Value::Global(_) | Value::Function(_) => Ok(Type::Ptr),
            Value::Local(local) => {
                let function = self
                    .function(local.func)
                    .ok_or(IrError::UnknownFunction(local.func))?;
                function
                    .local(*local)
                    .map(|l| l.ty.clone())
                    .ok_or(IrError::UnknownFunction(local.func))
            }
        }
    }
}
