/*! Parse textual SSA into a program.
 *
 * Writing SSA by hand is the fastest way to pin down lowering behavior in tests and to feed the
 * backend from tools that do not link against it. This parser reads the same text that
 * `lowir_ssa::format` prints, so programs survive a print-and-parse round trip.
 */

use lowir_ssa::{Program, ProgramBuilder};
use pest::Parser;
use pest_derive::Parser;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod error;
mod reader;

pub use error::{ParseError, Result};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct SsaParser;

/// Raw parse tree, for tools that only need to validate syntax.
pub fn parse(input: &str) -> Result<pest::iterators::Pairs<'_, Rule>> {
    Ok(SsaParser::parse(Rule::program, input)?)
}

pub fn parse_program(input: &str) -> Result<Program> {
    let mut builder = ProgramBuilder::new();
    parse_into(&mut builder, input)?;
    Ok(builder.finish())
}

/// Parses `input` and appends its packages to `builder`. Value ids continue
/// from whatever the builder already holds.
pub fn parse_into(builder: &mut ProgramBuilder, input: &str) -> Result<()> {
    let pairs = parse(input)?;
    reader::read_program(builder, pairs)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_source_into(builder: &mut ProgramBuilder, path: &Path) -> Result<()> {
    let source = read_source(path)?;
    let pairs = SsaParser::parse(Rule::program, &source)
        .map_err(|e| ParseError::from(e.with_path(&path.display().to_string())))?;
    reader::read_program(builder, pairs)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Program> {
    let mut builder = ProgramBuilder::new();
    parse_source_into(&mut builder, path.as_ref())?;
    Ok(builder.finish())
}

/// Every `.ssa` file under `dir`, sorted by path.
pub fn collect_sources<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "ssa")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parses every `.ssa` file under `dir` into one program, in path order.
pub fn parse_dir<P: AsRef<Path>>(dir: P) -> Result<Program> {
    let mut builder = ProgramBuilder::new();
    for path in collect_sources(dir)? {
        parse_source_into(&mut builder, &path)?;
    }
    Ok(builder.finish())
}

pub fn check(input: &str) -> bool {
    parse_program(input).is_ok()
}
