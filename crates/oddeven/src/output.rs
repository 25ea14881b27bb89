//! Observer output: the sorted values and the timing line.

use std::io::{self, Write};

use oddeven_core::Value;

use crate::cluster::SortOutcome;

/// Write the sorted values one per line, then the execution time.
pub fn write_report<W: Write>(outcome: &SortOutcome, mut writer: W) -> io::Result<()> {
    for value in &outcome.sorted {
        writeln!(writer, "{}", value)?;
    }
    writeln!(writer, "Execution time: {:.6}s", outcome.max_elapsed)?;
    writer.flush()
}

/// Echo the loaded input on one space-separated line.
pub fn write_input_line<W: Write>(values: &[Value], mut writer: W) -> io::Result<()> {
    for value in values {
        write!(writer, "{} ", value)?;
    }
    writeln!(writer)
}

/// Write the whole outcome, including every exchange record, as pretty JSON.
pub fn write_trace_json<W: Write>(outcome: &SortOutcome, writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, outcome).map_err(io::Error::from)
}
