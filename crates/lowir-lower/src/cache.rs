use crate::error::{LowerError, Result};
use lowir_core::Value;
use lowir_ssa::ValueId;
use std::collections::HashMap;

/// SSA value → target value, filled once per key for the lifetime of a pass.
#[derive(Debug, Default, Clone)]
pub struct ValueCache {
    entries: HashMap<ValueId, Value>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: ValueId) -> Option<Value> {
        self.entries.get(&id).copied()
    }

    /// Recording the same translation twice is a no-op; recording a different
    /// one is an error.
    pub fn record(&mut self, id: ValueId, value: Value) -> Result<()> {
        match self.entries.get(&id) {
            Some(existing) if *existing == value => Ok(()),
            Some(_) => Err(LowerError::ConflictingTranslation {
                value: id.to_string(),
            }),
            None => {
                self.entries.insert(id, value);
                Ok(())
            }
        }
    }

    pub fn contains(&self, id: ValueId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
