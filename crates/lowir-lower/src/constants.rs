use crate::config::LowerConfig;
use crate::error::{LowerError, Result};
use lowir_core::{Module, Value};
use lowir_ssa::Constant;
use num_traits::ToPrimitive;
use tracing::trace;

/// Lowers an SSA literal.
///
/// Integers become 64-bit immediates. Strings become a fresh global holding
/// the character data; equal literals are not interned, each call defines a
/// new global.
pub fn lower_constant(module: &mut Module, constant: &Constant, config: &LowerConfig) -> Result<Value> {
    match constant {
        Constant::Int(value) => value
            .to_i64()
            .map(Value::i64)
            .ok_or_else(|| LowerError::IntegerOutOfRange(value.to_string())),
        Constant::String(text) => {
            let mut bytes = text.as_bytes().to_vec();
            if config.nul_terminate_strings {
                bytes.push(0);
            }
            let global = module.define_global(
                &config.string_global_name,
                lowir_core::Constant::CharArray(bytes),
            );
            trace!(global = %global, len = text.len(), "defined string global");
            Ok(Value::Global(global))
        }
        Constant::Bool(_) | Constant::Float(_) | Constant::Nil => {
            Err(LowerError::UnimplementedConstantKind {
                kind: constant.kind_name(),
                value: constant.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowir_core::Type;
    use num_bigint::BigInt;

    #[test]
    fn test_int_becomes_immediate() {
        let mut module = Module::new("test");
        let value = lower_constant(
            &mut module,
            &Constant::Int(BigInt::from(-5)),
            &LowerConfig::default(),
        )
        .unwrap();
        assert_eq!(value, Value::i64(-5));
        assert!(module.globals.is_empty());
    }

    #[test]
    fn test_int_out_of_range() {
        let mut module = Module::new("test");
        let huge = BigInt::from(i64::MAX) + BigInt::from(1);
        let err = lower_constant(&mut module, &Constant::Int(huge), &LowerConfig::default())
            .unwrap_err();
        assert_eq!(err, LowerError::IntegerOutOfRange("9223372036854775808".to_string()));
    }

    #[test]
    fn test_string_defines_exact_bytes() {
        let mut module = Module::new("test");
        let value = lower_constant(
            &mut module,
            &Constant::String("hi".to_string()),
            &LowerConfig::default(),
        )
        .unwrap();

        let global = module.global(value.as_global().unwrap()).unwrap();
        assert_eq!(global.name, ".str");
        assert_eq!(global.init, lowir_core::Constant::CharArray(b"hi".to_vec()));
        assert_eq!(global.ty(), Type::array(2, Type::I8));
    }

    #[test]
    fn test_nul_terminated_strings() {
        let mut module = Module::new("test");
        let config = LowerConfig::default().with_nul_terminated_strings(true);
        let value =
            lower_constant(&mut module, &Constant::String("hi".to_string()), &config).unwrap();
        let global = module.global(value.as_global().unwrap()).unwrap();
        assert_eq!(global.init, lowir_core::Constant::CharArray(b"hi\0".to_vec()));
    }

    #[test]
    fn test_equal_strings_are_not_interned() {
        let mut module = Module::new("test");
        let config = LowerConfig::default();
        let a = lower_constant(&mut module, &Constant::String("x".to_string()), &config).unwrap();
        let b = lower_constant(&mut module, &Constant::String("x".to_string()), &config).unwrap();
        assert_ne!(a, b);
        assert_eq!(module.globals.len(), 2);
    }

    #[test]
    fn test_unsupported_constants() {
        let mut module = Module::new("test");
        let config = LowerConfig::default();
        for (constant, kind) in [
            (Constant::Bool(true), "bool"),
            (Constant::Float(1.5), "float"),
            (Constant::Nil, "nil"),
        ] {
            match lower_constant(&mut module, &constant, &config) {
                Err(LowerError::UnimplementedConstantKind { kind: found, .. }) => {
                    assert_eq!(found, kind)
                }
                other => panic!("expected UnimplementedConstantKind, got {:?}", other),
            }
        }
        assert!(module.globals.is_empty());
    }
}
