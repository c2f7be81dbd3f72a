use serde::{Deserialize, Serialize};

/// Which SSA functions are lowered. Everything else is skipped without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionSelection {
    Named(Vec<String>),
    All,
}

impl FunctionSelection {
    pub fn named(name: impl Into<String>) -> Self {
        FunctionSelection::Named(vec![name.into()])
    }

    pub fn selects(&self, name: &str) -> bool {
        match self {
            FunctionSelection::Named(names) => names.iter().any(|n| n == name),
            FunctionSelection::All => true,
        }
    }
}

impl Default for FunctionSelection {
    fn default() -> Self {
        FunctionSelection::named("main")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    pub module_name: String,
    pub selection: FunctionSelection,
    /// Variadic external that print-like builtins lower to.
    pub output_function: String,
    pub print_builtins: Vec<String>,
    pub nul_terminate_strings: bool,
    pub string_global_name: String,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            module_name: "main".to_string(),
            selection: FunctionSelection::default(),
            output_function: "printf".to_string(),
            print_builtins: vec!["println".to_string(), "print".to_string()],
            nul_terminate_strings: false,
            string_global_name: ".str".to_string(),
        }
    }
}

impl LowerConfig {
    pub fn with_selection(mut self, selection: FunctionSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_output_function(mut self, name: impl Into<String>) -> Self {
        self.output_function = name.into();
        self
    }

    pub fn with_nul_terminated_strings(mut self, enabled: bool) -> Self {
        self.nul_terminate_strings = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_only_main() {
        let config = LowerConfig::default();
        assert!(config.selection.selects("main"));
        assert!(!config.selection.selects("init"));
        assert!(FunctionSelection::All.selects("init"));
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: LowerConfig =
            serde_json::from_str(r#"{ "output_function": "my_printf", "selection": "all" }"#)
                .unwrap();
        assert_eq!(config.output_function, "my_printf");
        assert_eq!(config.selection, FunctionSelection::All);
        assert_eq!(config.print_builtins, vec!["println", "print"]);
    }

    #[test]
    fn test_named_selection_from_json() {
        let config: LowerConfig =
            serde_json::from_str(r#"{ "selection": { "named": ["start", "main"] } }"#).unwrap();
        assert!(config.selection.selects("start"));
        assert!(!config.selection.selects("helper"));
    }
}
