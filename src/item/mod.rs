/// This module provides the CSV item reader, writer and file processor.
pub mod csv;
