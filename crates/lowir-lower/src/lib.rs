/*! Lower SSA programs into the lowir register IR.
 *
 * An SSA graph says what each value is; a native backend needs to know where each value lives.
 * This crate walks the selected functions of a program once, translating every operand through a
 * per-pass cache so constants become immediates or globals, builtins become calls to declared
 * externals, and instruction results become locals. Anything the pass does not understand stops
 * it with a typed error instead of emitting a guess.
 */

pub mod builtins;
pub mod cache;
pub mod config;
pub mod constants;
pub mod context;
pub mod driver;
pub mod error;
pub mod function;
pub mod instructions;
pub mod translator;

pub use builtins::Builtins;
pub use cache::ValueCache;
pub use config::{FunctionSelection, LowerConfig};
pub use constants::lower_constant;
pub use context::{Lowered, LoweringContext, LoweringStats};
pub use driver::lower_program;
pub use error::{LowerError, Result};
pub use function::{lower_signature, lower_type};
pub use instructions::BlockScope;
