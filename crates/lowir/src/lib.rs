/*! Unified interface for SSA lowering.
 *
 * Single import for the whole pipeline: building or parsing SSA programs, lowering them into the
 * register IR, and emitting the result as text or JSON.
 */

pub use lowir_core as core;
pub use lowir_emit as emit;
pub use lowir_lower as lower;
pub use lowir_parser as parser;
pub use lowir_ssa as ssa;

pub use lowir_core::{Module, Type, Value};
pub use lowir_emit::{write_module, EmitterConfig, LlvmEmitter, OutputFormat};
pub use lowir_lower::{lower_program, FunctionSelection, LowerConfig, LowerError, Lowered};
pub use lowir_parser::{parse_dir, parse_file, parse_program};
pub use lowir_ssa::{Program, ProgramBuilder};
