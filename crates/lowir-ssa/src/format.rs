//! Printer for the textual SSA format read by `lowir-parser`.

use crate::function::{BlockIndex, Function};
use crate::instructions::{Instruction, InstructionKind};
use crate::program::{Member, Package, Program};
use crate::values::ValueId;
use std::fmt::{self, Write};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, package) in self.packages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_package(f, self, package)?;
        }
        Ok(())
    }
}

pub fn format_program(program: &Program) -> String {
    program.to_string()
}

pub fn format_function(program: &Program, function: &Function) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_function(&mut output, program, function);
    output
}

fn write_package<W: Write>(out: &mut W, program: &Program, package: &Package) -> fmt::Result {
    writeln!(out, "package {}", package.path)?;
    for member in package.members.values() {
        writeln!(out)?;
        match member {
            Member::Global(global) => writeln!(out, "var {}: {}", global.name, global.ty)?,
            Member::Function(function) => write_function(out, program, function)?,
        }
    }
    Ok(())
}

fn write_function<W: Write>(out: &mut W, program: &Program, function: &Function) -> fmt::Result {
    write!(out, "func {}(", function.name)?;
    for (i, param) in function.params.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write_operand(out, program, *param)?;
        if let Some(ty) = program.get_value(*param).and_then(|v| v.ty.as_ref()) {
            write!(out, ": {}", ty)?;
        }
    }
    write!(out, ")")?;

    if !function.results.is_empty() {
        let results: Vec<String> = function.results.iter().map(|t| t.to_string()).collect();
        write!(out, " -> {}", results.join(", "))?;
    }
    writeln!(out, " {{")?;

    for block in &function.blocks {
        writeln!(out, "{}:", block.label)?;
        for inst in &block.instructions {
            write!(out, "    ")?;
            write_instruction(out, program, function, inst)?;
            writeln!(out)?;
        }
    }

    writeln!(out, "}}")
}

fn write_operand<W: Write>(out: &mut W, program: &Program, id: ValueId) -> fmt::Result {
    match program.get_value(id) {
        Some(value) => write!(out, "{}", value),
        None => write!(out, "<{}>", id),
    }
}

fn write_operands<W: Write>(out: &mut W, program: &Program, ids: &[ValueId]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write_operand(out, program, *id)?;
    }
    Ok(())
}

fn label(function: &Function, index: BlockIndex) -> String {
    function
        .block(index)
        .map(|b| b.label.clone())
        .unwrap_or_else(|| format!("b{}", index))
}

fn write_instruction<W: Write>(
    out: &mut W,
    program: &Program,
    function: &Function,
    inst: &Instruction,
) -> fmt::Result {
    if let Some(result) = inst.result {
        write_operand(out, program, result)?;
        write!(out, " = ")?;
    }

    match &inst.kind {
        InstructionKind::Call { callee, args } => {
            write!(out, "call ")?;
            write_operand(out, program, *callee)?;
            write!(out, "(")?;
            write_operands(out, program, args)?;
            write!(out, ")")
        }
        InstructionKind::BinOp { op, x, y } => {
            write!(out, "{} ", op.mnemonic())?;
            write_operands(out, program, &[*x, *y])
        }
        InstructionKind::UnOp { op, x } => {
            write!(out, "{} ", op.mnemonic())?;
            write_operand(out, program, *x)
        }
        InstructionKind::Return { results } => {
            write!(out, "ret")?;
            if !results.is_empty() {
                write!(out, " ")?;
                write_operands(out, program, results)?;
            }
            Ok(())
        }
        InstructionKind::Jump { target } => write!(out, "jump {}", label(function, *target)),
        InstructionKind::If {
            cond,
            then_block,
            else_block,
        } => {
            write!(out, "br ")?;
            write_operand(out, program, *cond)?;
            write!(
                out,
                ", {}, {}",
                label(function, *then_block),
                label(function, *else_block)
            )
        }
        InstructionKind::Phi { edges } => {
            write!(out, "phi [")?;
            for (i, (block, value)) in edges.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{}: ", label(function, *block))?;
                write_operand(out, program, *value)?;
            }
            write!(out, "]")
        }
        InstructionKind::Alloc { ty } => write!(out, "alloc {}", ty),
        InstructionKind::Store { addr, value } => {
            write!(out, "store ")?;
            write_operands(out, program, &[*addr, *value])
        }
    }
}
