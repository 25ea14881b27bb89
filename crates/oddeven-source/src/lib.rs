//! # Oddeven Source
//!
//! Initial value sources for a sort run. Provides a trait-based interface
//! with file and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`ValueSource`] - The async trait for loading values in rank order
//! - [`FileSource`] - Values read from a file
//! - [`MemorySource`] - Values held in memory, for tests
//! - [`InputFormat`] - Decimal (default) or raw bytes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use oddeven_source::{FileSource, InputFormat, SourceExt};
//!
//! async fn example() {
//!     let source = FileSource::new("numbers", InputFormat::Decimal);
//!     let values = source.load_nonempty().await.unwrap();
//!     println!("{} values", values.len());
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod parse;
pub mod traits;

pub use error::{Result, SourceError};
pub use file::{write_values, FileSource};
pub use memory::MemorySource;
pub use parse::{parse_bytes, parse_decimal, InputFormat};
pub use traits::{SourceExt, ValueSource};
