use crate::builtins::Builtins;
use crate::cache::ValueCache;
use crate::config::LowerConfig;
use crate::error::{LowerError, Result};
use lowir_core::{FuncId, Module};
use lowir_ssa::{Program, ValueData, ValueId};
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoweringStats {
    pub functions_lowered: usize,
    pub functions_skipped: usize,
    pub blocks_lowered: usize,
    pub instructions_lowered: usize,
    pub constants_lowered: usize,
    pub builtins_resolved: usize,
    pub cache_hits: usize,
}

/// State of one lowering pass: the module under construction and the value
/// cache. Nothing here outlives the pass except what `finish` hands back.
pub struct LoweringContext<'p> {
    pub(crate) program: &'p Program,
    pub(crate) config: &'p LowerConfig,
    pub(crate) module: Module,
    pub(crate) cache: ValueCache,
    pub(crate) builtins: Builtins,
    pub(crate) stats: LoweringStats,
    /// Target function whose body is being lowered, if any.
    pub(crate) current: Option<FuncId>,
}

/// Result of a successful pass.
#[derive(Debug)]
pub struct Lowered {
    pub module: Module,
    pub cache: ValueCache,
    pub stats: LoweringStats,
}

impl<'p> LoweringContext<'p> {
    /// Creates an empty module and declares the external primitives.
    pub fn new(program: &'p Program, config: &'p LowerConfig) -> Result<Self> {
        let mut module = Module::new(config.module_name.clone());
        let builtins = Builtins::declare(&mut module, config)?;
        Ok(Self {
            program,
            config,
            module,
            cache: ValueCache::new(),
            builtins,
            stats: LoweringStats::default(),
            current: None,
        })
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    pub fn stats(&self) -> &LoweringStats {
        &self.stats
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn finish(self) -> Lowered {
        Lowered {
            module: self.module,
            cache: self.cache,
            stats: self.stats,
        }
    }

    pub(crate) fn value_data(&self, id: ValueId) -> Result<&'p ValueData> {
        self.program
            .get_value(id)
            .ok_or_else(|| LowerError::InvalidOperand {
                instruction: "operand",
                reason: format!("{} is not part of the program", id),
            })
    }

    pub(crate) fn value_name(&self, id: Option<ValueId>) -> Option<&'p str> {
        id.and_then(|id| self.program.get_value(id))
            .map(|data| data.name.as_str())
    }
}
