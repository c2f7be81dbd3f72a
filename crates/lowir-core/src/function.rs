use crate::instructions::InstData;
use crate::types::{Signature, Type};
use crate::values::{BlockId, FuncId, LocalId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Local {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub instructions: Vec<InstData>,
}

impl Block {
    pub fn new(id: BlockId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            instructions: Vec::new(),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.instructions
            .last()
            .map(|data| data.inst.is_terminator())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub id: FuncId,
    pub name: String,
    pub sig: Signature,
    pub is_declaration: bool,
    pub blocks: Vec<Block>,
    pub locals: Vec<Local>,
    #[serde(skip)]
    taken_names: HashSet<String>,
}

impl Function {
    pub(crate) fn new(id: FuncId, name: String, sig: Signature, is_declaration: bool) -> Self {
        Self {
            id,
            name,
            sig,
            is_declaration,
            blocks: Vec::new(),
            locals: Vec::new(),
            taken_names: HashSet::new(),
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0 as usize)
    }

    pub fn local(&self, id: LocalId) -> Option<&Local> {
        if id.func != self.id {
            return None;
        }
        self.locals.get(id.index as usize)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.instructions.len()).sum()
    }

    /// Blocks and locals share one namespace, as they do in the printed form.
    fn unique_name(&mut self, hint: &str) -> String {
        let hint = if hint.is_empty() { "v" } else { hint };
        let mut candidate = hint.to_string();
        let mut suffix = 1;
        while self.taken_names.contains(&candidate) {
            candidate = format!("{}.{}", hint, suffix);
            suffix += 1;
        }
        self.taken_names.insert(candidate.clone());
        candidate
    }

    pub(crate) fn push_block(&mut self, hint: &str) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        let name = self.unique_name(hint);
        self.blocks.push(Block::new(id, name));
        id
    }

    pub(crate) fn push_local(&mut self, hint: Option<&str>, ty: Type) -> LocalId {
        let index = self.locals.len() as u32;
        let name = match hint {
            Some(hint) => self.unique_name(hint),
            None => self.unique_name(&format!("v{}", index)),
        };
        self.locals.push(Local { name, ty });
        LocalId {
            func: self.id,
            index,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.sig == other.sig
            && self.is_declaration == other.is_declaration
            && self.blocks == other.blocks
            && self.locals == other.locals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_names_are_uniqued() {
        let mut f = Function::new(FuncId(0), "main".to_string(), Signature::void(), false);
        let a = f.push_local(Some("t0"), Type::I64);
        let b = f.push_local(Some("t0"), Type::I64);
        let c = f.push_local(None, Type::I64);

        assert_eq!(f.local(a).unwrap().name, "t0");
        assert_eq!(f.local(b).unwrap().name, "t0.1");
        assert_eq!(f.local(c).unwrap().name, "v2");
    }

    #[test]
    fn test_blocks_and_locals_share_namespace() {
        let mut f = Function::new(FuncId(0), "main".to_string(), Signature::void(), false);
        let block = f.push_block("entry");
        let local = f.push_local(Some("entry"), Type::I1);

        assert_eq!(f.block(block).unwrap().name, "entry");
        assert_eq!(f.local(local).unwrap().name, "entry.1");
    }

    #[test]
    fn test_local_lookup_rejects_foreign_ids() {
        let mut f = Function::new(FuncId(1), "f".to_string(), Signature::void(), false);
        f.push_local(Some("x"), Type::I64);
        let foreign = LocalId {
            func: FuncId(2),
            index: 0,
        };
        assert!(f.local(foreign).is_none());
    }
}
