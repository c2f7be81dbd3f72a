/*! Register-based target IR.
 *
 * Native backends want explicit types, named globals and flat instruction lists, not an SSA graph
 * with implicit constants. This crate is the write side of lowering: an append-only module that
 * accepts function, block, global and instruction definitions and checks the typing rules a
 * backend relies on as they are appended.
 */

pub mod builder;
pub mod function;
pub mod instructions;
pub mod module;
pub mod types;
pub mod values;

pub use builder::InstBuilder;
pub use function::{Block, Function, Local};
pub use instructions::{BinaryOp, InstData, Instruction, IntPredicate};
pub use module::{GlobalDef, Module, Symbol};
pub use types::{Signature, Type};
pub use values::{BlockId, Constant, FuncId, GlobalId, LocalId, Value};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(FuncId),
    #[error("Unknown block {block} in function {function}")]
    UnknownBlock { function: String, block: BlockId },
    #[error("Function {0} is a declaration and has no body")]
    NotADefinition(String),
    #[error("Block {block} in function {function} is already terminated")]
    BlockTerminated { function: String, block: String },
    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: Type,
        found: Type,
    },
    #[error("Invalid callee: {0}")]
    InvalidCallee(String),
    #[error("Call to {function} expects {expected} arguments, found {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, IrError>;
