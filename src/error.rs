use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
/// Error raised by any read or write operation.
///
/// Every variant aborts the operation that produced it: callers get either a
/// complete result or exactly one error.
pub enum CsvError {
    #[error("file {0} does not exist or is not a regular file")]
    FileNotFound(PathBuf),

    /// The named source, a displayed path or `input stream`, has no line.
    #[error("no header line found in {0}")]
    EmptyFile(String),

    #[error(
        "column {column} was not found in {record}, make sure it has a field or an alias with that name"
    )]
    ColumnNotFound { column: String, record: String },

    #[error("column {column} binds field {field} more than once")]
    DuplicateColumn { column: String, field: String },

    #[error("list field {field} of {record} has no list separator")]
    MissingListSeparator { field: String, record: String },

    #[error("line {line} has {found} columns but the header declares {expected}")]
    RowWidthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot assign {value:?} to field {field}: {reason}")]
    FieldAssignment {
        field: String,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}
