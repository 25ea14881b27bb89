//! File-backed value source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use oddeven_core::Value;

use crate::error::Result;
use crate::parse::InputFormat;
use crate::traits::ValueSource;

/// Values read from a file in a given format.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: InputFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: InputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }
}

#[async_trait]
impl ValueSource for FileSource {
    async fn load(&self) -> Result<Vec<Value>> {
        let raw = tokio::fs::read(&self.path).await?;
        let values = self.format.parse(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            format = %self.format,
            count = values.len(),
            "loaded input values"
        );
        Ok(values)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.format)
    }
}

/// Write values to `path` in `format`.
pub async fn write_values(path: &Path, format: InputFormat, values: &[Value]) -> Result<()> {
    let raw = format.render(values)?;
    tokio::fs::write(path, &raw).await?;
    Ok(())
}
