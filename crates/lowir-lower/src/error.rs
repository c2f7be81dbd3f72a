use lowir_core::IrError;
use thiserror::Error;

/// Every variant aborts the whole pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    #[error("Unimplemented value kind: {kind} ({value})")]
    UnimplementedValueKind { kind: &'static str, value: String },

    #[error("Unimplemented constant kind: {kind} ({value})")]
    UnimplementedConstantKind { kind: &'static str, value: String },

    #[error("Unimplemented builtin: {0}")]
    UnimplementedBuiltin(String),

    #[error("Unimplemented instruction kind: {kind} in block {block} of function {function}")]
    UnimplementedInstructionKind {
        kind: String,
        function: String,
        block: String,
    },

    #[error("Use before definition: {value} was referenced before the instruction producing it was lowered")]
    UseBeforeDefinition { value: String },

    #[error("Conflicting translation recorded for {value}")]
    ConflictingTranslation { value: String },

    #[error("Integer constant {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),

    #[error("Unimplemented type: {0}")]
    UnimplementedType(String),

    #[error("Invalid operand for {instruction}: {reason}")]
    InvalidOperand {
        instruction: &'static str,
        reason: String,
    },

    #[error("Target IR error: {0}")]
    Ir(#[from] IrError),
}

pub type Result<T> = std::result::Result<T, LowerError>;
