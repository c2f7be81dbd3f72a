/*! Turn lowered modules into text a backend toolchain can read.
 *
 * A lowered module is only useful once something downstream can consume it. The text emitter writes
 * the LLVM-style assembly form, one global or function per paragraph, so the output can be diffed,
 * checked into tests, or handed to an assembler. The JSON form serializes the module as-is for
 * tools that would rather not parse text.
 */

pub mod config;
pub mod emitter;
pub mod llvm_emitter;
pub mod output;

pub use config::{EmitterConfig, IndentStyle};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use llvm_emitter::LlvmEmitter;
pub use output::{write_module, OutputFormat};
