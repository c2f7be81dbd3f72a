use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub use_colors: bool,
    pub indent_style: IndentStyle,
    /// Leading `; ModuleID = '...'` line.
    pub include_header: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: false,
            indent_style: IndentStyle::Spaces(2),
            include_header: true,
        }
    }
}

impl EmitterConfig {
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_unit() {
        assert_eq!(IndentStyle::Spaces(2).unit(), "  ");
        assert_eq!(IndentStyle::Tabs.unit(), "\t");
    }

    #[test]
    fn test_config_from_json() {
        let config: EmitterConfig =
            serde_json::from_str(r#"{ "indent_style": "tabs", "include_header": false }"#).unwrap();
        assert_eq!(config.indent_style, IndentStyle::Tabs);
        assert!(!config.include_header);
        assert!(!config.use_colors);
    }
}
