use crate::csv_load::core_processor::CoreProcessor;
use crate::error::Result;

/// Strategy trait for writing the staged table to the destination database.
pub trait TableWriter {
    /// Write the staged rows and return how many ended up in the destination.
    fn write_table(&self, core_processor: &CoreProcessor, staged_rows: u64) -> Result<u64>;
}
