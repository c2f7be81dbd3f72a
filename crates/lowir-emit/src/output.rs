use crate::config::EmitterConfig;
use crate::emitter::Emitter;
use crate::llvm_emitter::LlvmEmitter;
use anyhow::{bail, Result};
use lowir_core::Module;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "ll" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format: {}", other),
        }
    }
}

/// Writes `module` to `writer` in the requested format.
pub fn write_module<W: Write>(
    module: &Module,
    format: OutputFormat,
    config: &EmitterConfig,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let emitter = LlvmEmitter::new(config.clone());
            let mut context = emitter.context();
            emitter.emit(module, writer, &mut context)
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, module)?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowir_core::{Constant, Signature};

    fn sample() -> Module {
        let mut module = Module::new("main");
        module
            .declare_function("printf", Signature::void().variadic())
            .unwrap();
        module.define_global(".str", Constant::char_array("hi"));
        module
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_output_round_trips() {
        let module = sample();
        let mut buffer = Vec::new();
        write_module(&module, OutputFormat::Json, &EmitterConfig::default(), &mut buffer).unwrap();

        let parsed: Module = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, module);
    }

    #[test]
    fn test_text_output() {
        let mut buffer = Vec::new();
        write_module(&sample(), OutputFormat::Text, &EmitterConfig::default(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("@.str = global [2 x i8] c\"hi\"\n"));
        assert!(text.contains("declare void @printf(...)\n"));
    }
}
