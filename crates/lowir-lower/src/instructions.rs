use crate::context::LoweringContext;
use crate::error::{LowerError, Result};
use lowir_core::{BinaryOp, BlockId, FuncId, IntPredicate, Value};
use lowir_ssa::{BasicBlock, BinOp, BlockIndex, Function, Instruction, InstructionKind, ValueId};
use tracing::trace;

/// Where an instruction is being lowered: the SSA block and its target twin.
pub struct BlockScope<'a> {
    pub function: &'a Function,
    pub block: &'a BasicBlock,
    pub func: FuncId,
    pub target: BlockId,
    /// Target block for each SSA block, by SSA block index.
    pub block_map: &'a [BlockId],
}

impl<'a> BlockScope<'a> {
    fn branch_target(&self, index: BlockIndex, instruction: &'static str) -> Result<BlockId> {
        self.block_map
            .get(index.0 as usize)
            .copied()
            .ok_or_else(|| LowerError::InvalidOperand {
                instruction,
                reason: format!(
                    "block {} does not exist in function {}",
                    index, self.function.name
                ),
            })
    }

    fn unimplemented(&self, kind: impl Into<String>) -> LowerError {
        LowerError::UnimplementedInstructionKind {
            kind: kind.into(),
            function: self.function.name.clone(),
            block: self.block.name(),
        }
    }
}

enum LoweredOp {
    Binary(BinaryOp),
    Compare(IntPredicate),
}

fn lower_binop(op: BinOp) -> LoweredOp {
    match op {
        BinOp::Add => LoweredOp::Binary(BinaryOp::Add),
        BinOp::Sub => LoweredOp::Binary(BinaryOp::Sub),
        BinOp::Mul => LoweredOp::Binary(BinaryOp::Mul),
        BinOp::Div => LoweredOp::Binary(BinaryOp::SDiv),
        BinOp::Rem => LoweredOp::Binary(BinaryOp::SRem),
        BinOp::And => LoweredOp::Binary(BinaryOp::And),
        BinOp::Or => LoweredOp::Binary(BinaryOp::Or),
        BinOp::Xor => LoweredOp::Binary(BinaryOp::Xor),
        BinOp::Shl => LoweredOp::Binary(BinaryOp::Shl),
        BinOp::Shr => LoweredOp::Binary(BinaryOp::AShr),
        BinOp::Eq => LoweredOp::Compare(IntPredicate::Eq),
        BinOp::Ne => LoweredOp::Compare(IntPredicate::Ne),
        BinOp::Lt => LoweredOp::Compare(IntPredicate::Slt),
        BinOp::Le => LoweredOp::Compare(IntPredicate::Sle),
        BinOp::Gt => LoweredOp::Compare(IntPredicate::Sgt),
        BinOp::Ge => LoweredOp::Compare(IntPredicate::Sge),
    }
}

impl<'p> LoweringContext<'p> {
    /// Appends the target instructions for `inst` to the scope's block and
    /// records its result, if any, before returning.
    pub fn lower_instruction(&mut self, scope: &BlockScope<'_>, inst: &Instruction) -> Result<()> {
        trace!(
            kind = inst.kind.kind_name(),
            block = %scope.block.label,
            "lowering instruction"
        );
        let name = self.value_name(inst.result);

        match &inst.kind {
            InstructionKind::Call { callee, args } => {
                let callee_value = self.translate(*callee)?;
                if callee_value.as_function().is_none() {
                    return Err(LowerError::InvalidOperand {
                        instruction: "call",
                        reason: format!("{} is not callable", self.value_data(*callee)?),
                    });
                }
                // Left to right: translating a string argument defines a global.
                let mut lowered = Vec::with_capacity(args.len());
                for arg in args {
                    lowered.push(self.translate(*arg)?);
                }
                let value = self
                    .module
                    .ins(scope.func, scope.target)?
                    .call(callee_value, lowered, name)?;
                self.record_result(inst.result, value)?;
            }

            InstructionKind::BinOp { op, x, y } => {
                let lhs = self.translate(*x)?;
                let rhs = self.translate(*y)?;
                self.check_int_operands(*op, (*x, lhs), (*y, rhs))?;

                let ins = self.module.ins(scope.func, scope.target)?;
                let value = match lower_binop(*op) {
                    LoweredOp::Binary(bop) => ins.binary(bop, lhs, rhs, name)?,
                    LoweredOp::Compare(pred) => ins.icmp(pred, lhs, rhs, name)?,
                };
                self.record_result(inst.result, value)?;
            }

            InstructionKind::Return { results } => match results.as_slice() {
                [] => self.module.ins(scope.func, scope.target)?.ret(None)?,
                [result] => {
                    let value = self.translate(*result)?;
                    self.module
                        .ins(scope.func, scope.target)?
                        .ret(Some(value))?;
                }
                many => return Err(scope.unimplemented(format!("return of {} values", many.len()))),
            },

            InstructionKind::Jump { target } => {
                let target = scope.branch_target(*target, "jump")?;
                self.module.ins(scope.func, scope.target)?.br(target)?;
            }

            InstructionKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.translate(*cond)?;
                let then_block = scope.branch_target(*then_block, "if")?;
                let else_block = scope.branch_target(*else_block, "if")?;
                self.module
                    .ins(scope.func, scope.target)?
                    .cond_br(cond, then_block, else_block)?;
            }

            InstructionKind::UnOp { .. }
            | InstructionKind::Phi { .. }
            | InstructionKind::Alloc { .. }
            | InstructionKind::Store { .. } => {
                return Err(scope.unimplemented(inst.kind.kind_name()));
            }
        }

        self.stats.instructions_lowered += 1;
        Ok(())
    }

    fn record_result(&mut self, result: Option<ValueId>, value: Value) -> Result<()> {
        match result {
            Some(id) => self.cache.record(id, value),
            None => Ok(()),
        }
    }

    fn check_int_operands(
        &self,
        op: BinOp,
        (x, lhs): (ValueId, Value),
        (y, rhs): (ValueId, Value),
    ) -> Result<()> {
        let lhs_ty = self.module.value_type(&lhs)?;
        let rhs_ty = self.module.value_type(&rhs)?;
        if lhs_ty.is_int() && lhs_ty == rhs_ty {
            return Ok(());
        }
        Err(LowerError::InvalidOperand {
            instruction: op.mnemonic(),
            reason: format!(
                "operands {} ({}) and {} ({}) are not integers of one width",
                self.value_data(x)?,
                lhs_ty,
                self.value_data(y)?,
                rhs_ty
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{FunctionSelection, LowerConfig};
    use crate::driver::lower_program;
    use crate::error::LowerError;
    use lowir_core::{BinaryOp, Instruction, IntPredicate, Type, Value};
    use lowir_ssa::{BinOp, Program, ProgramBuilder, SsaType, UnOp};

    fn single_function(build: impl FnOnce(&mut lowir_ssa::FunctionBuilder<'_>)) -> Program {
        let mut builder = ProgramBuilder::new();
        let mut pkg = builder.package("main");
        let mut f = pkg.function("main");
        build(&mut f);
        f.build();
        pkg.build();
        builder.finish()
    }

    #[test]
    fn test_binops_map_to_signed_operations() {
        let program = single_function(|f| {
            let b0 = f.block("b0");
            for op in [BinOp::Div, BinOp::Rem, BinOp::Shr] {
                let x = f.const_int(8);
                let y = f.const_int(2);
                f.binop(b0, op, x, y);
            }
            f.ret(b0, vec![]);
        });

        let lowered = lower_program(&program, &LowerConfig::default()).unwrap();
        let main = lowered.module.function_by_name("main").unwrap();
        let ops: Vec<_> = main.blocks[0]
            .instructions
            .iter()
            .filter_map(|data| match &data.inst {
                Instruction::Binary { op, .. } => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec![BinaryOp::SDiv, BinaryOp::SRem, BinaryOp::AShr]);
    }

    #[test]
    fn test_comparison_feeds_branch() {
        let program = single_function(|f| {
            let entry = f.block("entry");
            let then = f.block("then");
            let done = f.block("done");
            let x = f.const_int(1);
            let y = f.const_int(2);
            let lt = f.binop(entry, BinOp::Lt, x, y);
            f.if_(entry, lt, then, done);
            f.jump(then, done);
            f.ret(done, vec![]);
        });

        let lowered = lower_program(&program, &LowerConfig::default()).unwrap();
        let main = lowered.module.function_by_name("main").unwrap();
        assert_eq!(main.blocks.len(), 3);

        let entry = &main.blocks[0];
        match &entry.instructions[0].inst {
            Instruction::ICmp { pred, lhs, rhs } => {
                assert_eq!(*pred, IntPredicate::Slt);
                assert_eq!((*lhs, *rhs), (Value::i64(1), Value::i64(2)));
            }
            other => panic!("expected icmp, got {:?}", other),
        }
        let cond = Value::Local(entry.instructions[0].result.unwrap());
        assert_eq!(lowered.module.value_type(&cond).unwrap(), Type::I1);
        assert_eq!(
            entry.instructions[1].inst,
            Instruction::CondBr {
                cond,
                then_block: main.blocks[1].id,
                else_block: main.blocks[2].id,
            }
        );
        assert_eq!(main.blocks[1].instructions[0].inst, Instruction::Br(main.blocks[2].id));
    }

    #[test]
    fn test_result_flows_into_later_instruction() {
        let program = single_function(|f| {
            let b0 = f.block("b0");
            let one = f.const_int(1);
            let two = f.const_int(2);
            let sum = f.add(b0, one, two);
            let three = f.const_int(3);
            f.binop(b0, BinOp::Mul, sum, three);
            f.ret(b0, vec![]);
        });

        let lowered = lower_program(&program, &LowerConfig::default()).unwrap();
        let block = &lowered.module.function_by_name("main").unwrap().blocks[0];
        let sum = Value::Local(block.instructions[0].result.unwrap());
        assert_eq!(
            block.instructions[1].inst,
            Instruction::Binary {
                op: BinaryOp::Mul,
                lhs: sum,
                rhs: Value::i64(3),
            }
        );
    }

    #[test]
    fn test_string_operand_rejected_by_arithmetic() {
        let program = single_function(|f| {
            let b0 = f.block("b0");
            let s = f.const_str("a");
            let one = f.const_int(1);
            f.add(b0, s, one);
            f.ret(b0, vec![]);
        });

        let err = lower_program(&program, &LowerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LowerError::InvalidOperand {
                instruction: "add",
                ..
            }
        ));
    }

    #[test]
    fn test_unsupported_instruction_kinds() {
        type Build = fn(&mut lowir_ssa::FunctionBuilder<'_>);
        let cases: [(&str, Build); 4] = [
            ("unop", |f| {
                let b0 = f.block("b0");
                let x = f.const_int(1);
                f.unop(b0, UnOp::Neg, x);
            }),
            ("alloc", |f| {
                let b0 = f.block("b0");
                f.alloc(b0, SsaType::Int);
            }),
            ("store", |f| {
                let b0 = f.block("b0");
                let a = f.const_int(0);
                let v = f.const_int(1);
                f.store(b0, a, v);
            }),
            ("phi", |f| {
                let b0 = f.block("b0");
                let x = f.const_int(1);
                f.phi(b0, vec![(b0, x)]);
            }),
        ];

        for (kind, build) in cases {
            let program = single_function(build);
            match lower_program(&program, &LowerConfig::default()) {
                Err(LowerError::UnimplementedInstructionKind {
                    kind: found,
                    function,
                    block,
                }) => {
                    assert_eq!(found, kind);
                    assert_eq!(function, "main");
                    assert_eq!(block, "b0");
                }
                other => panic!("expected UnimplementedInstructionKind, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unlabeled_block_named_in_diagnostic() {
        let program = single_function(|f| {
            let b0 = f.block("");
            let x = f.const_int(1);
            f.unop(b0, UnOp::Not, x);
        });

        match lower_program(&program, &LowerConfig::default()) {
            Err(LowerError::UnimplementedInstructionKind { block, .. }) => {
                assert_eq!(block, "b0")
            }
            other => panic!("expected UnimplementedInstructionKind, got {:?}", other),
        }
    }

    #[test]
    fn test_return_value_lowered() {
        let mut builder = ProgramBuilder::new();
        let mut pkg = builder.package("main");
        let mut f = pkg.function("answer");
        f.returns(SsaType::Int);
        let b0 = f.block("b0");
        let v = f.const_int(42);
        f.ret(b0, vec![v]);
        f.build();
        pkg.build();
        let program = builder.finish();

        let config = LowerConfig::default().with_selection(FunctionSelection::named("answer"));
        let lowered = lower_program(&program, &config).unwrap();
        let answer = lowered.module.function_by_name("answer").unwrap();
        assert_eq!(answer.sig.ret, Type::I64);
        assert_eq!(
            answer.blocks[0].instructions[0].inst,
            Instruction::Ret(Some(Value::i64(42)))
        );
    }

    #[test]
    fn test_multi_value_return_rejected() {
        let program = single_function(|f| {
            let b0 = f.block("b0");
            let x = f.const_int(1);
            let y = f.const_int(2);
            f.ret(b0, vec![x, y]);
        });

        assert!(matches!(
            lower_program(&program, &LowerConfig::default()),
            Err(LowerError::UnimplementedInstructionKind { .. })
        ));
    }
}
