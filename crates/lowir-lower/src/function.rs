use crate::context::LoweringContext;
use crate::error::{LowerError, Result};
use crate::instructions::BlockScope;
use lowir_core::{BlockId, FuncId, Signature, Type};
use lowir_ssa::{Function, SsaType};
use tracing::{debug, debug_span};

/// Maps an SSA type onto its target representation.
pub fn lower_type(ty: &SsaType) -> Result<Type> {
    match ty {
        SsaType::Int => Ok(Type::I64),
        SsaType::Bool => Ok(Type::I1),
        SsaType::String => Ok(Type::Ptr),
        SsaType::Float | SsaType::Pointer(_) => Err(LowerError::UnimplementedType(ty.to_string())),
    }
}

/// Signature of the target function: results collapse to a single return
/// type, parameters keep their order.
pub fn lower_signature(function: &Function, program: &lowir_ssa::Program) -> Result<Signature> {
    let ret = match function.results.as_slice() {
        [] => Type::Void,
        [ty] => lower_type(ty)?,
        many => {
            let names: Vec<String> = many.iter().map(ToString::to_string).collect();
            return Err(LowerError::UnimplementedType(format!("({})", names.join(", "))));
        }
    };

    let mut sig = Signature::new(ret);
    for param in &function.params {
        let data = program.get_value(*param).ok_or_else(|| LowerError::InvalidOperand {
            instruction: "param",
            reason: format!("{} is not part of the program", param),
        })?;
        let ty = data
            .ty
            .as_ref()
            .ok_or_else(|| LowerError::UnimplementedType(format!("untyped parameter %{}", data.name)))?;
        sig = sig.param(lower_type(ty)?);
    }
    Ok(sig)
}

impl<'p> LoweringContext<'p> {
    /// Lowers one SSA function if the selection policy picks it.
    ///
    /// Returns `None` for skipped functions, which leave no trace in the
    /// module. Every target block is created before any instruction is
    /// lowered so branches may refer to blocks that come later.
    pub fn lower_function(&mut self, function: &'p Function) -> Result<Option<FuncId>> {
        if !self.config.selection.selects(&function.name) {
            debug!(function = %function.name, "skipping unselected function");
            self.stats.functions_skipped += 1;
            return Ok(None);
        }

        let span = debug_span!("lower_function", function = %function.name);
        let _enter = span.enter();

        let sig = lower_signature(function, self.program)?;
        let func = self.module.define_function(&function.name, sig)?;
        self.current = Some(func);

        let mut block_map: Vec<BlockId> = Vec::with_capacity(function.blocks.len());
        for block in &function.blocks {
            block_map.push(self.module.append_block(func, &block.name())?);
        }

        for (block, target) in function.blocks.iter().zip(block_map.iter().copied()) {
            let scope = BlockScope {
                function,
                block,
                func,
                target,
                block_map: &block_map,
            };
            for inst in &block.instructions {
                self.lower_instruction(&scope, inst)?;
            }
            self.stats.blocks_lowered += 1;
        }

        self.current = None;
        self.stats.functions_lowered += 1;
        debug!(
            blocks = function.blocks.len(),
            instructions = function.instruction_count(),
            "lowered function"
        );
        Ok(Some(func))
    }
}
