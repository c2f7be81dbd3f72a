//! Instruction cursor over a single block.
//!
//! `Module::ins` hands out an `InstBuilder` positioned at the end of a block;
//! each method appends exactly one instruction and consumes the cursor. Typing
//! rules are checked before anything is appended, so a failed call leaves the
//! block untouched.

use crate::instructions::{BinaryOp, InstData, Instruction, IntPredicate};
use crate::module::Module;
use crate::types::Type;
use crate::values::{BlockId, FuncId, LocalId, Value};
use crate::{IrError, Result};

pub struct InstBuilder<'m> {
    module: &'m mut Module,
    func: FuncId,
    block: BlockId,
}

impl<'m> InstBuilder<'m> {
    pub(crate) fn new(module: &'m mut Module, func: FuncId, block: BlockId) -> Self {
        Self {
            module,
            func,
            block,
        }
    }

    fn function_name(&self) -> String {
        self.module
            .function(self.func)
            .map(|f| f.name.clone())
            .unwrap_or_default()
    }

    fn expect_type(&self, value: &Value, expected: &Type, context: &str) -> Result<()> {
        let found = self.module.value_type(value)?;
        if &found != expected {
            return Err(IrError::TypeMismatch {
                context: context.to_string(),
                expected: expected.clone(),
                found,
            });
        }
        Ok(())
    }

    fn expect_int(&self, value: &Value, context: &str) -> Result<Type> {
        let ty = self.module.value_type(value)?;
        if !ty.is_int() {
            return Err(IrError::TypeMismatch {
                context: context.to_string(),
                expected: Type::I64,
                found: ty,
            });
        }
        Ok(ty)
    }

    fn append(self, inst: Instruction, result: Option<LocalId>) -> Result<()> {
        let (func, block) = (self.func, self.block);
        let function = self
            .module
            .function_mut(func)
            .ok_or(IrError::UnknownFunction(func))?;
        let name = function.name.clone();
        let target = function.block_mut(block).ok_or(IrError::UnknownBlock {
            function: name,
            block,
        })?;
        target.instructions.push(InstData { result, inst });
        Ok(())
    }

    fn push(self, inst: Instruction) -> Result<()> {
        self.append(inst, None)
    }

    fn push_value(self, inst: Instruction, name: Option<&str>, ty: Type) -> Result<Value> {
        let func = self.func;
        let local = self
            .module
            .function_mut(func)
            .ok_or(IrError::UnknownFunction(func))?
            .push_local(name, ty);
        self.append(inst, Some(local))?;
        Ok(Value::Local(local))
    }

    pub fn binary(self, op: BinaryOp, lhs: Value, rhs: Value, name: Option<&str>) -> Result<Value> {
        let ty = self.expect_int(&lhs, op.mnemonic())?;
        self.expect_type(&rhs, &ty, op.mnemonic())?;
        self.push_value(Instruction::Binary { op, lhs, rhs }, name, ty)
    }

    pub fn add(self, lhs: Value, rhs: Value, name: Option<&str>) -> Result<Value> {
        self.binary(BinaryOp::Add, lhs, rhs, name)
    }

    pub fn icmp(
        self,
        pred: IntPredicate,
        lhs: Value,
        rhs: Value,
        name: Option<&str>,
    ) -> Result<Value> {
        let ty = self.expect_int(&lhs, "icmp")?;
        self.expect_type(&rhs, &ty, "icmp")?;
        self.push_value(Instruction::ICmp { pred, lhs, rhs }, name, Type::I1)
    }

    /// Every call defines a local; for `void` callees it is `void`-typed and
    /// cannot be used as an operand.
    pub fn call(self, callee: Value, args: Vec<Value>, name: Option<&str>) -> Result<Value> {
        let func_id = callee
            .as_function()
            .ok_or_else(|| IrError::InvalidCallee(format!("{:?}", callee)))?;
        let target = self
            .module
            .function(func_id)
            .ok_or(IrError::UnknownFunction(func_id))?;
        let sig = target.sig.clone();
        let target_name = target.name.clone();

        let arity_ok = if sig.variadic {
            args.len() >= sig.params.len()
        } else {
            args.len() == sig.params.len()
        };
        if !arity_ok {
            return Err(IrError::ArgumentCount {
                function: target_name,
                expected: sig.params.len(),
                found: args.len(),
            });
        }

        let context = format!("call to {}", target_name);
        for (i, arg) in args.iter().enumerate() {
            match sig.params.get(i) {
                Some(param) => self.expect_type(arg, param, &context)?,
                None => {
                    let ty = self.module.value_type(arg)?;
                    if ty.is_void() {
                        return Err(IrError::TypeMismatch {
                            context,
                            expected: Type::Ptr,
                            found: ty,
                        });
                    }
                }
            }
        }

        self.push_value(Instruction::Call { callee, args }, name, sig.ret)
    }

    pub fn ret(self, value: Option<Value>) -> Result<()> {
        let expected = self
            .module
            .function(self.func)
            .map(|f| f.sig.ret.clone())
            .ok_or(IrError::UnknownFunction(self.func))?;
        let context = format!("return from {}", self.function_name());
        match &value {
            Some(v) => self.expect_type(v, &expected, &context)?,
            None if !expected.is_void() => {
                return Err(IrError::TypeMismatch {
                    context,
                    expected,
                    found: Type::Void,
                })
            }
            None => {}
        }
        self.push(Instruction::Ret(value))
    }

    fn check_block(&self, block: BlockId) -> Result<()> {
        let function = self
            .module
            .function(self.func)
            .ok_or(IrError::UnknownFunction(self.func))?;
        function.block(block).ok_or_else(|| IrError::UnknownBlock {
            function: function.name.clone(),
            block,
        })?;
        Ok(())
    }

    pub fn br(self, target: BlockId) -> Result<()> {
        self.check_block(target)?;
        self.push(Instruction::Br(target))
    }

    pub fn cond_br(self, cond: Value, then_block: BlockId, else_block: BlockId) -> Result<()> {
        self.expect_type(&cond, &Type::I1, "br")?;
        self.check_block(then_block)?;
        self.check_block(else_block)?;
        self.push(Instruction::CondBr {
            cond,
            then_block,
            else_block,
        })
    }
}
