use crate::Rule;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(Box<pest::error::Error<Rule>>),

    #[error("Duplicate member {name} in package {package}")]
    DuplicateMember { package: String, name: String },

    #[error("Duplicate block label {label} in function {function}")]
    DuplicateLabel { function: String, label: String },

    #[error("Unknown block label {label} in function {function}")]
    UnknownLabel { function: String, label: String },

    #[error("Value %{name} is defined more than once in function {function}")]
    Redefinition { function: String, name: String },

    #[error("Value %{name} is used but never defined in function {function}")]
    UndefinedValue { function: String, name: String },

    #[error("Invalid literal {literal}: {reason}")]
    InvalidLiteral { literal: String, reason: String },

    #[error("Malformed parse tree: expected {0}")]
    Malformed(&'static str),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        ParseError::Syntax(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
