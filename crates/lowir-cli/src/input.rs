use anyhow::{Context, Result};
use lowir_emit::EmitterConfig;
use lowir_lower::LowerConfig;
use lowir_ssa::Program;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Contents of a `--config` file. Either section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub lower: LowerConfig,
    pub emit: EmitterConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Loads a program from a `.json` dump, a single `.ssa` file, or a directory
/// of `.ssa` files.
pub fn load_program(path: &Path) -> Result<Program> {
    if path.is_dir() {
        debug!(dir = %path.display(), "loading SSA directory");
        return lowir_parser::parse_dir(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            debug!(file = %path.display(), "loading JSON program");
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON program {}", path.display()))
        }
        _ => {
            debug!(file = %path.display(), "parsing SSA file");
            lowir_parser::parse_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))
        }
    }
}
