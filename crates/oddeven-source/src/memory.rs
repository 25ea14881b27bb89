//! In-memory value source.
//!
//! Primarily for tests and for callers that already hold their values.

use async_trait::async_trait;
use oddeven_core::Value;

use crate::error::Result;
use crate::traits::ValueSource;

/// Values held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    values: Vec<Value>,
}

impl MemorySource {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl From<Vec<Value>> for MemorySource {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

#[async_trait]
impl ValueSource for MemorySource {
    async fn load(&self) -> Result<Vec<Value>> {
        Ok(self.values.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} values)", self.values.len())
    }
}
