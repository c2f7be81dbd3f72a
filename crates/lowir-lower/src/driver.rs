use crate::config::LowerConfig;
use crate::context::{Lowered, LoweringContext};
use crate::error::Result;
use lowir_ssa::{Member, Package, Program};
use tracing::{info, info_span, trace};

/// Lowers every selected function of `program` into a fresh module.
///
/// Packages are visited in order and members in declaration order, so the
/// output is deterministic for a given program. The first error aborts the
/// pass and no partial module is returned.
pub fn lower_program(program: &Program, config: &LowerConfig) -> Result<Lowered> {
    let span = info_span!("lower_program", module = %config.module_name);
    let _enter = span.enter();

    let mut ctx = LoweringContext::new(program, config)?;
    for package in &program.packages {
        ctx.lower_package(package)?;
    }

    let lowered = ctx.finish();
    info!(
        functions = lowered.stats.functions_lowered,
        skipped = lowered.stats.functions_skipped,
        instructions = lowered.stats.instructions_lowered,
        globals = lowered.module.globals.len(),
        "lowering complete"
    );
    Ok(lowered)
}

impl<'p> LoweringContext<'p> {
    pub fn lower_package(&mut self, package: &'p Package) -> Result<()> {
        trace!(package = %package.path, members = package.members.len(), "lowering package");
        for member in package.members.values() {
            match member {
                Member::Function(function) => {
                    self.lower_function(function)?;
                }
                Member::Global(global) => {
                    trace!(global = %global.name, "skipping package global");
                }
            }
        }
        Ok(())
    }
}
