use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use anyhow::{anyhow, Result};
use colored::Color;
use lowir_core::{BlockId, Constant, Function, GlobalDef, InstData, Instruction, Module, Value};
use std::io::Write;

/// Writes a module in LLVM assembly syntax.
///
/// Globals come first, then functions in the order they were added, with a
/// blank line between entries.
pub struct LlvmEmitter {
    config: EmitterConfig,
}

impl LlvmEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }
}

impl Default for LlvmEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

fn is_plain_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || matches!(c, '-' | '$' | '.' | '_'));
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '$' | '.' | '_'))
}

/// `name` or `"name"` when it contains characters LLVM identifiers cannot.
fn symbol(name: &str) -> String {
    if is_plain_symbol(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_bytes(name.as_bytes()))
    }
}

/// Printable ASCII passes through; everything else, `"` and `\` included,
/// is written as `\HH`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\{:02X}", b));
        }
    }
    out
}

fn format_initializer(init: &Constant) -> String {
    match init {
        Constant::CharArray(bytes) => format!("{} c\"{}\"", init.ty(), escape_bytes(bytes)),
    }
}

fn format_global(global: &GlobalDef) -> String {
    format!("@{} = global {}", symbol(&global.name), format_initializer(&global.init))
}

impl LlvmEmitter {
    fn value(&self, module: &Module, value: &Value) -> Result<String> {
        match value {
            Value::ConstInt { bits: 1, value } => Ok(if *value != 0 { "true" } else { "false" }.to_string()),
            Value::ConstInt { value, .. } => Ok(value.to_string()),
            Value::Global(_) | Value::Function(_) => module
                .symbol_name(value)
                .map(|name| format!("@{}", symbol(name)))
                .ok_or_else(|| anyhow!("dangling symbol reference {:?}", value)),
            Value::Local(id) => module
                .function(id.func)
                .and_then(|f| f.local(*id))
                .map(|local| format!("%{}", symbol(&local.name)))
                .ok_or_else(|| anyhow!("dangling local {}", id)),
        }
    }

    fn typed_value(&self, module: &Module, value: &Value) -> Result<String> {
        let ty = module.value_type(value)?;
        Ok(format!("{} {}", ty, self.value(module, value)?))
    }

    fn block_ref(&self, function: &Function, id: BlockId) -> Result<String> {
        function
            .block(id)
            .map(|b| format!("label %{}", symbol(&b.name)))
            .ok_or_else(|| anyhow!("unknown block {} in {}", id, function.name))
    }

    fn format_instruction(&self, module: &Module, function: &Function, data: &InstData) -> Result<String> {
        let result = match data.result {
            Some(id) => function.local(id).map(|local| (local.name.as_str(), &local.ty)),
            None => None,
        };
        let assign = |text: String| match result {
            Some((name, ty)) if !ty.is_void() => format!("%{} = {}", symbol(name), text),
            _ => text,
        };

        let text = match &data.inst {
            Instruction::Binary { op, lhs, rhs } => assign(format!(
                "{} {}, {}",
                op.mnemonic(),
                self.typed_value(module, lhs)?,
                self.value(module, rhs)?
            )),
            Instruction::ICmp { pred, lhs, rhs } => assign(format!(
                "icmp {} {}, {}",
                pred.mnemonic(),
                self.typed_value(module, lhs)?,
                self.value(module, rhs)?
            )),
            Instruction::Call { callee, args } => {
                let target = callee
                    .as_function()
                    .and_then(|id| module.function(id))
                    .ok_or_else(|| anyhow!("call through non-function {:?}", callee))?;
                // Variadic callees need the full function type at the call site.
                let callee_ty = if target.sig.variadic {
                    target.sig.to_string()
                } else {
                    target.sig.ret.to_string()
                };
                let args = args
                    .iter()
                    .map(|arg| self.typed_value(module, arg))
                    .collect::<Result<Vec<_>>>()?;
                assign(format!(
                    "call {} {}({})",
                    callee_ty,
                    self.value(module, callee)?,
                    args.join(", ")
                ))
            }
            Instruction::Ret(None) => "ret void".to_string(),
            Instruction::Ret(Some(value)) => format!("ret {}", self.typed_value(module, value)?),
            Instruction::Br(target) => format!("br {}", self.block_ref(function, *target)?),
            Instruction::CondBr {
                cond,
                then_block,
                else_block,
            } => format!(
                "br {}, {}, {}",
                self.typed_value(module, cond)?,
                self.block_ref(function, *then_block)?,
                self.block_ref(function, *else_block)?
            ),
        };
        Ok(text)
    }

    fn header(&self, function: &Function) -> String {
        let keyword = if function.is_declaration {
            "declare"
        } else {
            "define"
        };
        format!(
            "{} {} @{}{}",
            keyword,
            function.sig.ret,
            symbol(&function.name),
            function.sig.params_text()
        )
    }

    fn emit_function<W: Write>(
        &self,
        module: &Module,
        function: &Function,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let header = self.header(function);
        if function.is_declaration {
            return EmitHelper::write_colored_line(writer, context, &header, Color::Blue);
        }

        EmitHelper::write_block(writer, context, &header, |w, ctx| {
            for block in &function.blocks {
                ctx.dedent();
                EmitHelper::write_colored_line(w, ctx, &format!("{}:", symbol(&block.name)), Color::Yellow)?;
                ctx.indent();
                for data in &block.instructions {
                    let line = self.format_instruction(module, function, data)?;
                    EmitHelper::write_line(w, ctx, &line)?;
                }
            }
            Ok(())
        })
    }
}

impl Emitter for LlvmEmitter {
    type Item = Module;

    fn emit<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut first = true;
        let mut separate = |w: &mut W| -> EmitResult {
            if !std::mem::replace(&mut first, false) {
                EmitHelper::blank_line(w)?;
            }
            Ok(())
        };

        if self.config.include_header {
            separate(writer)?;
            EmitHelper::write_comment(writer, context, &format!("ModuleID = '{}'", module.name))?;
        }

        if !module.globals.is_empty() {
            separate(writer)?;
            for global in &module.globals {
                EmitHelper::write_line(writer, context, &format_global(global))?;
            }
        }

        for function in &module.functions {
            separate(writer)?;
            self.emit_function(module, function, writer, context)?;
        }
        Ok(())
    }

    fn context(&self) -> EmitContext {
        EmitContext::from_config(&self.config)
    }
}
