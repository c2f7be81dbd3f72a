use crate::constants::lower_constant;
use crate::context::LoweringContext;
use crate::error::{LowerError, Result};
use lowir_core::Value;
use lowir_ssa::{ValueId, ValueKind};
use tracing::trace;

impl<'p> LoweringContext<'p> {
    /// Returns the target value for an SSA operand, translating it on first use.
    ///
    /// Constants and builtins are lowered lazily and cached. Instruction
    /// results are never computed here: they must already have been recorded
    /// by the instruction that produces them, otherwise this fails with
    /// `UseBeforeDefinition`. Callers must therefore lower a function's
    /// instructions in order. A result cached while lowering another function
    /// is not visible here and fails the same way.
    pub fn translate(&mut self, id: ValueId) -> Result<Value> {
        if let Some(value) = self.cache.lookup(id) {
            if let (Value::Local(local), Some(current)) = (value, self.current) {
                if local.func != current {
                    return Err(LowerError::UseBeforeDefinition {
                        value: self.value_data(id)?.to_string(),
                    });
                }
            }
            self.stats.cache_hits += 1;
            trace!(value = %id, "cache hit");
            return Ok(value);
        }

        let data = self.value_data(id)?;
        let value = match &data.kind {
            ValueKind::Const(constant) => {
                self.stats.constants_lowered += 1;
                trace!(value = %id, constant = %constant, "lowering constant");
                lower_constant(&mut self.module, constant, self.config)?
            }
            ValueKind::Builtin(name) => {
                self.stats.builtins_resolved += 1;
                trace!(value = %id, builtin = %name, "resolving builtin");
                self.builtins.resolve(name)?
            }
            ValueKind::InstrResult => {
                return Err(LowerError::UseBeforeDefinition {
                    value: data.to_string(),
                })
            }
            ValueKind::Parameter { .. } | ValueKind::Function(_) | ValueKind::Global(_) => {
                return Err(LowerError::UnimplementedValueKind {
                    kind: data.kind.kind_name(),
                    value: data.to_string(),
                })
            }
        };

        self.cache.record(id, value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LowerConfig;
    use lowir_ssa::{Program, ProgramBuilder, SsaType};

    struct Values {
        hi: ValueId,
        one: ValueId,
        println: ValueId,
        len: ValueId,
        param: ValueId,
        func: ValueId,
        global: ValueId,
        pending: ValueId,
        flag: ValueId,
    }

    fn program() -> (Program, Values) {
        let mut builder = ProgramBuilder::new();
        let mut pkg = builder.package("main");
        pkg.global("counter", SsaType::Int);
        let mut f = pkg.function("main");
        let b0 = f.block("b0");
        let values = Values {
            hi: f.const_str("hi"),
            one: f.const_int(1),
            println: f.builtin("println"),
            len: f.builtin("len"),
            param: f.param("n", SsaType::Int),
            func: f.function_ref("helper"),
            global: f.global_ref("counter"),
            pending: f.result("x"),
            flag: f.const_bool(true),
        };
        f.ret(b0, vec![]);
        f.build();
        pkg.build();
        (builder.finish(), values)
    }

    #[test]
    fn test_translation_is_cached() {
        let (program, v) = program();
        let config = LowerConfig::default();
        let mut ctx = LoweringContext::new(&program, &config).unwrap();

        let first = ctx.translate(v.hi).unwrap();
        let second = ctx.translate(v.hi).unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.module().globals.len(), 1);
        assert_eq!(ctx.stats().constants_lowered, 1);
        assert_eq!(ctx.stats().cache_hits, 1);
    }

    #[test]
    fn test_constants_and_builtins() {
        let (program, v) = program();
        let config = LowerConfig::default();
        let mut ctx = LoweringContext::new(&program, &config).unwrap();

        assert_eq!(ctx.translate(v.one).unwrap(), Value::i64(1));
        assert_eq!(
            ctx.translate(v.println).unwrap(),
            Value::Function(ctx.builtins().output_function())
        );
        assert_eq!(
            ctx.translate(v.len).unwrap_err(),
            LowerError::UnimplementedBuiltin("len".to_string())
        );
        assert!(matches!(
            ctx.translate(v.flag),
            Err(LowerError::UnimplementedConstantKind { kind: "bool", .. })
        ));
    }

    #[test]
    fn test_unimplemented_value_kinds() {
        let (program, v) = program();
        let config = LowerConfig::default();
        let mut ctx = LoweringContext::new(&program, &config).unwrap();

        for (id, kind) in [(v.param, "parameter"), (v.func, "function"), (v.global, "global")] {
            match ctx.translate(id) {
                Err(LowerError::UnimplementedValueKind { kind: found, .. }) => {
                    assert_eq!(found, kind)
                }
                other => panic!("expected UnimplementedValueKind, got {:?}", other),
            }
        }
        assert!(ctx.cache().is_empty());
    }

    #[test]
    fn test_result_before_definition() {
        let (program, v) = program();
        let config = LowerConfig::default();
        let mut ctx = LoweringContext::new(&program, &config).unwrap();

        assert_eq!(
            ctx.translate(v.pending).unwrap_err(),
            LowerError::UseBeforeDefinition {
                value: "%x".to_string()
            }
        );
    }

    #[test]
    fn test_foreign_value_id() {
        let (program, _) = program();
        let config = LowerConfig::default();
        let mut ctx = LoweringContext::new(&program, &config).unwrap();
        assert!(matches!(
            ctx.translate(ValueId(10_000)),
            Err(LowerError::InvalidOperand { .. })
        ));
    }
}
