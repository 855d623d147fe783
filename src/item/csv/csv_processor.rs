use std::{
    cell::Cell,
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use log::{debug, error, info};

use crate::{
    core::{
        config::{CsvFormat, FieldOptionsTable, MappingConfig},
        item::{ItemReader, ItemWriter},
        record::Record,
    },
    error::CsvError,
    item::csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
};

/// Progress of the last `read_file` or `write_to_file` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Uninitialized,
    HeaderResolved,
    RowsProcessed,
    Done,
}

/// Reads a whole file into records of type `T`, or writes records to it.
///
/// Each call resolves its own bindings: the header of the file when there is
/// one, the declared fields of `T` otherwise. Calls are not synchronised, do
/// not run two of them against the same path at once.
///
/// # Examples
///
/// ```
/// use csv_field_mapper::csv_record;
/// use csv_field_mapper::item::csv::csv_processor::CsvProcessor;
///
/// #[derive(Debug, Default, PartialEq, Clone)]
/// struct DummyData {
///     name: String,
///     number: i32,
///     split_texts: Vec<String>,
/// }
///
/// csv_record!(DummyData {
///     name: String,
///     number: i32,
///     split_texts: Vec<String> => { alias: "tags", separator: '|' },
/// });
///
/// let dir = std::env::temp_dir().join(format!("csv-field-mapper-doc-{}", std::process::id()));
/// # let _ = std::fs::remove_dir_all(&dir);
/// let processor = CsvProcessor::<DummyData>::new(dir.join("dummy.csv"));
///
/// let records = vec![DummyData {
///     name: "Ann".to_owned(),
///     number: 5,
///     split_texts: vec!["x".to_owned(), "y".to_owned()],
/// }];
/// processor.write_to_file(&records).unwrap();
///
/// assert_eq!(processor.read_file().unwrap(), records);
/// # std::fs::remove_dir_all(dir).unwrap();
/// ```
pub struct CsvProcessor<T> {
    path: PathBuf,
    format: CsvFormat,
    options: FieldOptionsTable,
    state: Cell<ProcessorState>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> CsvProcessor<T> {
    /// Processor for `path` with the default format and declared field options.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvProcessorBuilder::new().from_path(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> ProcessorState {
        self.state.get()
    }

    /// Reads every data row of the file, in file order.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` when the path is not a regular file
    /// - `EmptyFile` when the file has no header line
    /// - `ColumnNotFound`, `DuplicateColumn` or `MissingListSeparator` when the
    ///   header cannot be bound
    /// - `Config` when the delimiter or field options are invalid
    /// - `RowWidthMismatch` or `FieldAssignment` for a row that cannot be decoded
    /// - `Io` on read failures
    ///
    /// No partial result is returned.
    pub fn read_file(&self) -> Result<Vec<T>, CsvError> {
        self.transition(ProcessorState::Uninitialized);

        self.try_read_file().inspect_err(|err| {
            error!("Reading {} failed: {}", self.path.display(), err);
        })
    }

    /// Appends `records` to the file, one line each, in input order.
    ///
    /// An existing file keeps its header and its column order. A missing file
    /// is created, with its parent directories and a header naming the
    /// declared fields of `T`. Returns the number of records written.
    ///
    /// Lines written before a failure stay in the file.
    ///
    /// # Errors
    ///
    /// - `Config` when the delimiter or field options are invalid
    /// - `ColumnNotFound`, `DuplicateColumn` or `MissingListSeparator` when the
    ///   existing header or the declared fields cannot be bound
    /// - `FieldAssignment` for a value containing a line break or the
    ///   delimiter, or a list element containing its separator
    /// - `Io` on write failures
    pub fn write_to_file(&self, records: &[T]) -> Result<usize, CsvError> {
        self.transition(ProcessorState::Uninitialized);

        self.try_write_to_file(records).inspect_err(|err| {
            error!("Writing {} failed: {}", self.path.display(), err);
        })
    }

    fn try_read_file(&self) -> Result<Vec<T>, CsvError> {
        let reader = CsvItemReaderBuilder::<T>::new()
            .format(self.format.clone())
            .field_options(self.options.clone())
            .from_path(&self.path)?;
        self.transition(ProcessorState::HeaderResolved);

        let mut records = Vec::new();
        while let Some(record) = reader.read()? {
            records.push(record);
        }
        self.transition(ProcessorState::RowsProcessed);

        info!("Read {} records from {}", records.len(), self.path.display());
        self.transition(ProcessorState::Done);
        Ok(records)
    }

    fn try_write_to_file(&self, records: &[T]) -> Result<usize, CsvError> {
        self.format.validate()?;

        let builder = CsvItemWriterBuilder::<T>::new()
            .format(self.format.clone())
            .field_options(self.options.clone());

        let writer = match self.existing_header()? {
            Some(header) => {
                debug!("Appending to {} under its header", self.path.display());
                let start_on_new_line = !ends_with_newline(&self.path)?;
                let file = OpenOptions::new().append(true).open(&self.path)?;
                builder
                    .existing_header(header)
                    .start_on_new_line(start_on_new_line)
                    .from_writer(BufWriter::new(file))?
            }
            None => {
                if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty())
                {
                    fs::create_dir_all(parent)?;
                }
                debug!("Creating {} with the default header", self.path.display());
                builder
                    .has_headers(true)
                    .from_path(&self.path)?
            }
        };
        self.transition(ProcessorState::HeaderResolved);

        writer.open()?;
        writer.write(records)?;
        self.transition(ProcessorState::RowsProcessed);

        writer.close()?;
        info!("Wrote {} records to {}", records.len(), self.path.display());
        self.transition(ProcessorState::Done);
        Ok(records.len())
    }

    /// First line of the target file, `None` when it is missing or empty.
    fn existing_header(&self) -> Result<Option<String>, CsvError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let header = BufReader::new(file).lines().next().transpose()?;
        Ok(header)
    }

    fn transition(&self, state: ProcessorState) {
        debug!("{}: {:?} -> {:?}", self.path.display(), self.state.get(), state);
        self.state.set(state);
    }
}

fn ends_with_newline(path: &Path) -> Result<bool, CsvError> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// A builder for configuring a `CsvProcessor`.
///
/// ```
/// use csv_field_mapper::core::config::MappingConfig;
/// use csv_field_mapper::csv_record;
/// use csv_field_mapper::item::csv::csv_processor::CsvProcessorBuilder;
///
/// #[derive(Default)]
/// struct Tagged {
///     tags: Vec<String>,
/// }
///
/// csv_record!(Tagged { tags: Vec<String> });
///
/// let config = MappingConfig::from_json_str(
///     r#"{ "format": { "delimiter": ";" }, "fields": { "tags": { "list_separator": "|" } } }"#,
/// )
/// .unwrap();
///
/// let processor = CsvProcessorBuilder::<Tagged>::new()
///     .config(config)
///     .from_path("tagged.csv");
/// assert_eq!(processor.path().to_str(), Some("tagged.csv"));
/// ```
pub struct CsvProcessorBuilder<T> {
    format: CsvFormat,
    options: FieldOptionsTable,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for CsvProcessorBuilder<T> {
    fn default() -> Self {
        Self {
            format: CsvFormat::default(),
            options: FieldOptionsTable::default(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> CsvProcessorBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.format.delimiter = delimiter.into();
        self
    }

    pub fn format(mut self, format: CsvFormat) -> Self {
        self.format = format;
        self
    }

    pub fn field_options(mut self, options: FieldOptionsTable) -> Self {
        self.options = options;
        self
    }

    pub fn alias(mut self, field: &str, alias: &str) -> Self {
        self.options = self.options.alias(field, alias);
        self
    }

    pub fn list_separator(mut self, field: &str, separator: char) -> Self {
        self.options = self.options.list_separator(field, separator);
        self
    }

    /// Applies a loaded configuration, replacing format and field options.
    pub fn config(self, config: MappingConfig) -> Self {
        self.format(config.format).field_options(config.fields)
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> CsvProcessor<T> {
        CsvProcessor {
            path: path.as_ref().to_path_buf(),
            format: self.format,
            options: self.options,
            state: Cell::new(ProcessorState::Uninitialized),
            _record: PhantomData,
        }
    }
}
