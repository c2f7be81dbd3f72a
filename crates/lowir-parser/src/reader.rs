//! Builds an SSA program from the pest parse tree.
//!
//! Block labels and package globals are collected before any instruction is
//! read, so jumps and `@name` references may point forward. `%name` operands
//! that are not yet bound reserve a placeholder that the defining instruction
//! later claims; a placeholder nobody claims is an error.

use crate::error::{ParseError, Result};
use crate::Rule;
use lowir_ssa::{
    BinOp, BlockIndex, Constant, FunctionBuilder, Instruction, InstructionKind, PackageBuilder,
    ProgramBuilder, SsaType, UnOp, ValueId,
};
use num_bigint::BigInt;
use pest::iterators::{Pair, Pairs};
use std::collections::{HashMap, HashSet};

fn expect<'i>(pairs: &mut Pairs<'i, Rule>, what: &'static str) -> Result<Pair<'i, Rule>> {
    pairs.next().ok_or(ParseError::Malformed(what))
}

pub(crate) fn read_program(builder: &mut ProgramBuilder, pairs: Pairs<'_, Rule>) -> Result<()> {
    for pair in pairs {
        if pair.as_rule() != Rule::program {
            continue;
        }
        for package in pair.into_inner() {
            if package.as_rule() == Rule::package {
                read_package(builder, package)?;
            }
        }
    }
    Ok(())
}

fn read_package(builder: &mut ProgramBuilder, pair: Pair<'_, Rule>) -> Result<()> {
    let mut inner = pair.into_inner();
    let path = expect(&mut inner, "package path")?.as_str().to_string();
    let members: Vec<Pair<'_, Rule>> = inner.collect();

    let mut seen = HashSet::new();
    let mut globals = HashSet::new();
    for member in &members {
        let name = member
            .clone()
            .into_inner()
            .next()
            .ok_or(ParseError::Malformed("member name"))?
            .as_str()
            .to_string();
        if !seen.insert(name.clone()) {
            return Err(ParseError::DuplicateMember {
                package: path.clone(),
                name,
            });
        }
        if member.as_rule() == Rule::global_def {
            globals.insert(name);
        }
    }

    let mut pkg = builder.package(path);
    for member in members {
        match member.as_rule() {
            Rule::global_def => {
                let mut inner = member.into_inner();
                let name = expect(&mut inner, "global name")?.as_str();
                let ty = read_type(expect(&mut inner, "global type")?.as_str())?;
                pkg.global(name, ty);
            }
            Rule::func_def => read_function(&mut pkg, &globals, member)?,
            _ => {}
        }
    }
    pkg.build();
    Ok(())
}

pub(crate) fn read_type(text: &str) -> Result<SsaType> {
    let base = text.trim_start_matches('*');
    let mut ty = match base {
        "int" => SsaType::Int,
        "bool" => SsaType::Bool,
        "string" => SsaType::String,
        "float" => SsaType::Float,
        _ => return Err(ParseError::Malformed("type")),
    };
    for _ in 0..(text.len() - base.len()) {
        ty = ty.pointer_to();
    }
    Ok(ty)
}

#[derive(Debug, Clone, Copy)]
enum Binding {
    Defined(ValueId),
    Pending(ValueId),
}

struct FunctionReader<'g> {
    name: String,
    globals: &'g HashSet<String>,
    labels: HashMap<String, BlockIndex>,
    locals: HashMap<String, Binding>,
}

fn read_function(
    pkg: &mut PackageBuilder<'_>,
    globals: &HashSet<String>,
    pair: Pair<'_, Rule>,
) -> Result<()> {
    let mut inner = pair.into_inner();
    let name = expect(&mut inner, "function name")?.as_str().to_string();
    let mut f = pkg.function(name.clone());
    let mut reader = FunctionReader {
        name,
        globals,
        labels: HashMap::new(),
        locals: HashMap::new(),
    };

    let mut blocks = Vec::new();
    for part in inner {
        match part.as_rule() {
            Rule::params => {
                for param in part.into_inner() {
                    let mut inner = param.into_inner();
                    let local = local_name(expect(&mut inner, "parameter name")?.as_str());
                    let ty = read_type(expect(&mut inner, "parameter type")?.as_str())?;
                    if reader.locals.contains_key(local) {
                        return Err(reader.redefinition(local));
                    }
                    let id = f.param(local, ty);
                    reader.locals.insert(local.to_string(), Binding::Defined(id));
                }
            }
            Rule::results => {
                for ty in part.into_inner() {
                    f.returns(read_type(ty.as_str())?);
                }
            }
            Rule::block => blocks.push(part),
            _ => {}
        }
    }

    for block in &blocks {
        let label = block
            .clone()
            .into_inner()
            .next()
            .ok_or(ParseError::Malformed("block label"))?
            .as_str()
            .to_string();
        if reader.labels.contains_key(&label) {
            return Err(ParseError::DuplicateLabel {
                function: reader.name.clone(),
                label,
            });
        }
        let index = f.block(label.clone());
        reader.labels.insert(label, index);
    }

    for block in blocks {
        let mut inner = block.into_inner();
        let index = reader.label(expect(&mut inner, "block label")?.as_str())?;
        for inst in inner {
            reader.read_instruction(&mut f, index, inst)?;
        }
    }

    reader.check_defined()?;
    f.build();
    Ok(())
}

fn local_name(text: &str) -> &str {
    text.trim_start_matches('%')
}

impl<'g> FunctionReader<'g> {
    fn redefinition(&self, name: &str) -> ParseError {
        ParseError::Redefinition {
            function: self.name.clone(),
            name: name.to_string(),
        }
    }

    fn label(&self, label: &str) -> Result<BlockIndex> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ParseError::UnknownLabel {
                function: self.name.clone(),
                label: label.to_string(),
            })
    }

    fn define(&mut self, f: &mut FunctionBuilder<'_>, name: &str) -> Result<ValueId> {
        match self.locals.get(name).copied() {
            Some(Binding::Defined(_)) => Err(self.redefinition(name)),
            Some(Binding::Pending(id)) => {
                self.locals.insert(name.to_string(), Binding::Defined(id));
                Ok(id)
            }
            None => {
                let id = f.result(name);
                self.locals.insert(name.to_string(), Binding::Defined(id));
                Ok(id)
            }
        }
    }

    fn use_local(&mut self, f: &mut FunctionBuilder<'_>, name: &str) -> ValueId {
        match self.locals.get(name) {
            Some(Binding::Defined(id)) | Some(Binding::Pending(id)) => *id,
            None => {
                let id = f.result(name);
                self.locals.insert(name.to_string(), Binding::Pending(id));
                id
            }
        }
    }

    fn check_defined(&self) -> Result<()> {
        let mut pending: Vec<&str> = self
            .locals
            .iter()
            .filter(|(_, binding)| matches!(binding, Binding::Pending(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        pending.sort_unstable();
        match pending.first() {
            Some(name) => Err(ParseError::UndefinedValue {
                function: self.name.clone(),
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn read_instruction(
        &mut self,
        f: &mut FunctionBuilder<'_>,
        block: BlockIndex,
        pair: Pair<'_, Rule>,
    ) -> Result<()> {
        let mut result = None;
        let mut op = None;
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::local => result = Some(part.as_str()),
                _ => op = Some(part),
            }
        }
        let op = op.ok_or(ParseError::Malformed("instruction"))?;

        // Operands bind before the result so `%x = add %x, 1` is a use of
        // the value being defined, not of an earlier one.
        let kind = self.read_kind(f, op)?;
        let result = match result {
            Some(local) => Some(self.define(f, local_name(local))?),
            None => None,
        };
        f.append(block, Instruction::new(result, kind));
        Ok(())
    }

    fn read_operands(&mut self, f: &mut FunctionBuilder<'_>, pairs: Pairs<'_, Rule>) -> Result<Vec<ValueId>> {
        let mut operands = Vec::new();
        for pair in pairs {
            if pair.as_rule() == Rule::args {
                for arg in pair.into_inner() {
                    operands.push(self.read_operand(f, arg)?);
                }
            } else {
                operands.push(self.read_operand(f, pair)?);
            }
        }
        Ok(operands)
    }

    fn read_kind(&mut self, f: &mut FunctionBuilder<'_>, pair: Pair<'_, Rule>) -> Result<InstructionKind> {
        let rule = pair.as_rule();
        let mut inner = pair.into_inner();
        let kind = match rule {
            Rule::call => {
                let callee = self.read_operand(f, expect(&mut inner, "callee")?)?;
                let args = self.read_operands(f, inner)?;
                InstructionKind::Call { callee, args }
            }
            Rule::binop => {
                let kw = expect(&mut inner, "binary operator")?.as_str();
                let op = BinOp::from_mnemonic(kw).ok_or(ParseError::Malformed("binary operator"))?;
                let x = self.read_operand(f, expect(&mut inner, "left operand")?)?;
                let y = self.read_operand(f, expect(&mut inner, "right operand")?)?;
                InstructionKind::BinOp { op, x, y }
            }
            Rule::unop => {
                let kw = expect(&mut inner, "unary operator")?.as_str();
                let op = UnOp::from_mnemonic(kw).ok_or(ParseError::Malformed("unary operator"))?;
                let x = self.read_operand(f, expect(&mut inner, "operand")?)?;
                InstructionKind::UnOp { op, x }
            }
            Rule::ret => InstructionKind::Return {
                results: self.read_operands(f, inner)?,
            },
            Rule::jump => InstructionKind::Jump {
                target: self.label(expect(&mut inner, "jump target")?.as_str())?,
            },
            Rule::branch => {
                let cond = self.read_operand(f, expect(&mut inner, "condition")?)?;
                let then_block = self.label(expect(&mut inner, "then label")?.as_str())?;
                let else_block = self.label(expect(&mut inner, "else label")?.as_str())?;
                InstructionKind::If {
                    cond,
                    then_block,
                    else_block,
                }
            }
            Rule::phi => {
                let mut edges = Vec::new();
                for edge in inner {
                    let mut parts = edge.into_inner();
                    let block = self.label(expect(&mut parts, "phi label")?.as_str())?;
                    let value = self.read_operand(f, expect(&mut parts, "phi value")?)?;
                    edges.push((block, value));
                }
                InstructionKind::Phi { edges }
            }
            Rule::alloc => InstructionKind::Alloc {
                ty: read_type(expect(&mut inner, "allocated type")?.as_str())?,
            },
            Rule::store => {
                let addr = self.read_operand(f, expect(&mut inner, "address")?)?;
                let value = self.read_operand(f, expect(&mut inner, "stored value")?)?;
                InstructionKind::Store { addr, value }
            }
            _ => return Err(ParseError::Malformed("instruction")),
        };
        Ok(kind)
    }

    fn read_operand(&mut self, f: &mut FunctionBuilder<'_>, pair: Pair<'_, Rule>) -> Result<ValueId> {
        let text = pair.as_str();
        let id = match pair.as_rule() {
            Rule::local => self.use_local(f, local_name(text)),
            Rule::builtin_ref => f.builtin(&text[1..]),
            Rule::global_ref => {
                let name = &text[1..];
                if self.globals.contains(name) {
                    f.global_ref(name)
                } else {
                    f.function_ref(name)
                }
            }
            Rule::int => {
                let value: BigInt = text.parse().map_err(|_| ParseError::InvalidLiteral {
                    literal: text.to_string(),
                    reason: "not an integer".to_string(),
                })?;
                f.constant(Constant::Int(value))
            }
            Rule::float => {
                let value: f64 = text.parse().map_err(|_| ParseError::InvalidLiteral {
                    literal: text.to_string(),
                    reason: "not a float".to_string(),
                })?;
                f.const_float(value)
            }
            Rule::string => f.const_str(unescape(text)?),
            Rule::boolean => f.const_bool(text == "true"),
            Rule::nil => f.constant(Constant::Nil),
            _ => return Err(ParseError::Malformed("operand")),
        };
        Ok(id)
    }
}

/// Decodes a quoted string literal, quotes included.
fn unescape(literal: &str) -> Result<String> {
    let body = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            other => {
                return Err(ParseError::InvalidLiteral {
                    literal: literal.to_string(),
                    reason: match other {
                        Some(c) => format!("unknown escape \\{}", c),
                        None => "dangling backslash".to_string(),
                    },
                })
            }
        }
    }
    Ok(out)
}
