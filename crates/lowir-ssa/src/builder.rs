//! Programmatic construction of SSA programs.
//!
//! Frontends and tests build programs through these builders instead of
//! poking at the arena directly. Every helper that creates a literal
//! allocates a fresh value, matching how an SSA frontend materializes one
//! constant node per use.

use crate::function::{BasicBlock, BlockIndex, Function};
use crate::instructions::{BinOp, Instruction, InstructionKind, UnOp};
use crate::program::{Global, Member, Package, Program};
use crate::types::SsaType;
use crate::values::{Constant, ValueData, ValueId, ValueKind};
use indexmap::IndexMap;
use num_bigint::BigInt;

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    values: Vec<ValueData>,
    packages: Vec<Package>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&mut self, path: impl Into<String>) -> PackageBuilder<'_> {
        PackageBuilder {
            values: &mut self.values,
            packages: &mut self.packages,
            package: Package::new(path),
        }
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueData> {
        self.values.get(id.0 as usize)
    }

    pub fn finish(self) -> Program {
        Program::from_parts(self.packages, self.values)
    }
}

fn alloc_value(
    values: &mut Vec<ValueData>,
    name: String,
    kind: ValueKind,
    ty: Option<SsaType>,
) -> ValueId {
    let id = ValueId(values.len() as u32);
    values.push(ValueData { id, name, kind, ty });
    id
}

pub struct PackageBuilder<'a> {
    values: &'a mut Vec<ValueData>,
    packages: &'a mut Vec<Package>,
    package: Package,
}

impl<'a> PackageBuilder<'a> {
    pub fn path(&self) -> &str {
        &self.package.path
    }

    pub fn global(&mut self, name: impl Into<String>, ty: SsaType) -> &mut Self {
        let name = name.into();
        self.package
            .members
            .insert(name.clone(), Member::Global(Global { name, ty }));
        self
    }

    pub fn function(&mut self, name: impl Into<String>) -> FunctionBuilder<'_> {
        FunctionBuilder {
            values: &mut *self.values,
            members: &mut self.package.members,
            function: Function::new(name),
            next_temp: 0,
        }
    }

    pub fn build(self) {
        self.packages.push(self.package);
    }
}

pub struct FunctionBuilder<'a> {
    values: &'a mut Vec<ValueData>,
    members: &'a mut IndexMap<String, Member>,
    function: Function,
    next_temp: u32,
}

impl<'a> FunctionBuilder<'a> {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn param(&mut self, name: impl Into<String>, ty: SsaType) -> ValueId {
        let index = self.function.params.len() as u32;
        let id = alloc_value(
            self.values,
            name.into(),
            ValueKind::Parameter { index },
            Some(ty),
        );
        self.function.params.push(id);
        id
    }

    pub fn returns(&mut self, ty: SsaType) -> &mut Self {
        self.function.results.push(ty);
        self
    }

    pub fn block(&mut self, label: impl Into<String>) -> BlockIndex {
        let index = BlockIndex(self.function.blocks.len() as u32);
        self.function.blocks.push(BasicBlock::new(index, label));
        index
    }

    /// Reserves a named instruction result without defining it. The value only
    /// becomes defined once an appended instruction names it as its result.
    pub fn result(&mut self, name: impl Into<String>) -> ValueId {
        alloc_value(self.values, name.into(), ValueKind::InstrResult, None)
    }

    fn fresh_result(&mut self, ty: Option<SsaType>) -> ValueId {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        alloc_value(self.values, name, ValueKind::InstrResult, ty)
    }

    /// Panics if `block` was not created by this builder.
    pub fn append(&mut self, block: BlockIndex, instruction: Instruction) {
        self.function.blocks[block.0 as usize]
            .instructions
            .push(instruction);
    }

    pub fn constant(&mut self, constant: Constant) -> ValueId {
        let ty = match &constant {
            Constant::Int(_) => Some(SsaType::Int),
            Constant::String(_) => Some(SsaType::String),
            Constant::Bool(_) => Some(SsaType::Bool),
            Constant::Float(_) => Some(SsaType::Float),
            Constant::Nil => None,
        };
        let name = constant.to_string();
        alloc_value(self.values, name, ValueKind::Const(constant), ty)
    }

    pub fn const_int(&mut self, value: i64) -> ValueId {
        self.constant(Constant::Int(BigInt::from(value)))
    }

    pub fn const_str(&mut self, value: impl Into<String>) -> ValueId {
        self.constant(Constant::String(value.into()))
    }

    pub fn const_bool(&mut self, value: bool) -> ValueId {
        self.constant(Constant::Bool(value))
    }

    pub fn const_float(&mut self, value: f64) -> ValueId {
        self.constant(Constant::Float(value))
    }

    pub fn builtin(&mut self, name: impl Into<String>) -> ValueId {
        let name = name.into();
        alloc_value(self.values, name.clone(), ValueKind::Builtin(name), None)
    }

    pub fn function_ref(&mut self, name: impl Into<String>) -> ValueId {
        let name = name.into();
        alloc_value(self.values, name.clone(), ValueKind::Function(name), None)
    }

    pub fn global_ref(&mut self, name: impl Into<String>) -> ValueId {
        let name = name.into();
        alloc_value(self.values, name.clone(), ValueKind::Global(name), None)
    }

    fn value_type(&self, id: ValueId) -> Option<SsaType> {
        self.values.get(id.0 as usize).and_then(|v| v.ty.clone())
    }

    pub fn call(&mut self, block: BlockIndex, callee: ValueId, args: Vec<ValueId>) -> ValueId {
        let result = self.fresh_result(None);
        self.append(
            block,
            Instruction::new(Some(result), InstructionKind::Call { callee, args }),
        );
        result
    }

    pub fn binop(&mut self, block: BlockIndex, op: BinOp, x: ValueId, y: ValueId) -> ValueId {
        let ty = if op.is_comparison() {
            Some(SsaType::Bool)
        } else {
            self.value_type(x)
        };
        let result = self.fresh_result(ty);
        self.append(
            block,
            Instruction::new(Some(result), InstructionKind::BinOp { op, x, y }),
        );
        result
    }

    pub fn add(&mut self, block: BlockIndex, x: ValueId, y: ValueId) -> ValueId {
        self.binop(block, BinOp::Add, x, y)
    }

    pub fn unop(&mut self, block: BlockIndex, op: UnOp, x: ValueId) -> ValueId {
        let ty = self.value_type(x);
        let result = self.fresh_result(ty);
        self.append(
            block,
            Instruction::new(Some(result), InstructionKind::UnOp { op, x }),
        );
        result
    }

    pub fn ret(&mut self, block: BlockIndex, results: Vec<ValueId>) {
        self.append(block, Instruction::new(None, InstructionKind::Return { results }));
    }

    pub fn jump(&mut self, block: BlockIndex, target: BlockIndex) {
        self.append(block, Instruction::new(None, InstructionKind::Jump { target }));
    }

    pub fn if_(
        &mut self,
        block: BlockIndex,
        cond: ValueId,
        then_block: BlockIndex,
        else_block: BlockIndex,
    ) {
        self.append(
            block,
            Instruction::new(
                None,
                InstructionKind::If {
                    cond,
                    then_block,
                    else_block,
                },
            ),
        );
    }

    pub fn phi(&mut self, block: BlockIndex, edges: Vec<(BlockIndex, ValueId)>) -> ValueId {
        let ty = edges.first().and_then(|(_, v)| self.value_type(*v));
        let result = self.fresh_result(ty);
        self.append(
            block,
            Instruction::new(Some(result), InstructionKind::Phi { edges }),
        );
        result
    }

    pub fn alloc(&mut self, block: BlockIndex, ty: SsaType) -> ValueId {
        let result = self.fresh_result(Some(ty.clone().pointer_to()));
        self.append(
            block,
            Instruction::new(Some(result), InstructionKind::Alloc { ty }),
        );
        result
    }

    pub fn store(&mut self, block: BlockIndex, addr: ValueId, value: ValueId) {
        self.append(
            block,
            Instruction::new(None, InstructionKind::Store { addr, value }),
        );
    }

    pub fn build(self) {
        let name = self.function.name.clone();
        self.members.insert(name, Member::Function(self.function));
    }
}
