//! ValueSource trait: the abstract interface for initial values.
//!
//! Only the observer loads values; every other process receives its single
//! value through `scatter`.

use async_trait::async_trait;
use oddeven_core::Value;

use crate::error::{Result, SourceError};

/// Where the unsorted values come from.
///
/// Implementations return values in rank order: element `i` goes to rank `i`.
#[async_trait]
pub trait ValueSource: Send + Sync {
    /// Load all values.
    async fn load(&self) -> Result<Vec<Value>>;

    /// Human-readable description for logs and errors.
    fn describe(&self) -> String;
}

/// Extension methods for ValueSource.
#[async_trait]
pub trait SourceExt: ValueSource {
    /// Load values and reject an empty source.
    async fn load_nonempty(&self) -> Result<Vec<Value>> {
        let values = self.load().await?;
        if values.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(values)
    }

    /// Load values and require exactly `expected` of them.
    async fn load_exact(&self, expected: usize) -> Result<Vec<Value>> {
        let values = self.load().await?;
        if values.len() != expected {
            return Err(SourceError::CountMismatch {
                expected,
                got: values.len(),
            });
        }
        Ok(values)
    }
}

impl<T: ValueSource + ?Sized> SourceExt for T {}
