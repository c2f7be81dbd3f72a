/*! SSA program model.
 *
 * Frontends hand the backend a fully built SSA graph: packages own functions, functions own basic
 * blocks, blocks own instructions, and every operand is a value in one program-wide arena. Value
 * identity is the arena index, never the printed form, so two equal literals stay two values.
 */

pub mod builder;
pub mod format;
pub mod function;
pub mod instructions;
pub mod program;
pub mod types;
pub mod values;

pub use builder::{FunctionBuilder, PackageBuilder, ProgramBuilder};
pub use function::{BasicBlock, BlockIndex, Function};
pub use instructions::{BinOp, Instruction, InstructionKind, UnOp};
pub use program::{Global, Member, Package, Program};
pub use types::SsaType;
pub use values::{Constant, ValueData, ValueId, ValueKind};
