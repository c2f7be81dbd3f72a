use crate::config::LowerConfig;
use crate::error::{LowerError, Result};
use lowir_core::{FuncId, Module, Signature, Value};
use tracing::debug;

/// Builtins resolved by name onto externals declared before any lowering.
#[derive(Debug, Clone)]
pub struct Builtins {
    output: FuncId,
    print_names: Vec<String>,
}

impl Builtins {
    /// Declares the variadic output primitive. Must run before the first
    /// function is lowered so every call site refers to an existing symbol.
    pub fn declare(module: &mut Module, config: &LowerConfig) -> Result<Self> {
        let output =
            module.declare_function(&config.output_function, Signature::void().variadic())?;
        debug!(name = %config.output_function, "declared output primitive");
        Ok(Self {
            output,
            print_names: config.print_builtins.clone(),
        })
    }

    pub fn output_function(&self) -> FuncId {
        self.output
    }

    pub fn resolve(&self, name: &str) -> Result<Value> {
        if self.print_names.iter().any(|n| n == name) {
            Ok(Value::Function(self.output))
        } else {
            Err(LowerError::UnimplementedBuiltin(name.to_string()))
        }
    }
}
