use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufRead, BufReader, Lines, Read},
    marker::PhantomData,
    path::Path,
};

use log::debug;

use crate::{
    core::{
        binding::{BindingSet, HeaderBinder},
        config::{CsvFormat, FieldOptionsTable},
        item::{ItemReader, ItemReaderResult},
        record::Record,
        resolver::RecordSchema,
    },
    error::CsvError,
    item::csv::row_codec::{split_row, RowCodec},
};

/// A CSV item reader that implements the `ItemReader` trait.
///
/// The header line is consumed and bound when the reader is built, then each
/// call to `read` decodes the next line into a fresh `T`.
///
/// # Examples
///
/// ```
/// use csv_field_mapper::core::item::ItemReader;
/// use csv_field_mapper::csv_record;
/// use csv_field_mapper::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct City {
///     city: String,
///     pop: u32,
/// }
///
/// csv_record!(City { city: String, pop: u32 => { alias: "population" } });
///
/// let data = "population, city\n4628910, Boston\n42695, Concord";
///
/// let reader = CsvItemReaderBuilder::<City>::new()
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let boston = reader.read().unwrap().unwrap();
/// assert_eq!(boston, City { city: "Boston".to_owned(), pop: 4628910 });
/// assert_eq!(reader.read().unwrap().unwrap().city, "Concord");
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R, T> {
    /// Remaining lines, after the header.
    lines: RefCell<Lines<R>>,
    bindings: BindingSet,
    delimiter: String,
    /// Line number of the last line consumed, the header being line 1.
    line_number: Cell<usize>,
    _record: PhantomData<fn() -> T>,
}

impl<R: BufRead, T: Record> ItemReader<T> for CsvItemReader<R, T> {
    fn read(&self) -> ItemReaderResult<T> {
        let next = self.lines.borrow_mut().next();

        match next {
            Some(line) => {
                let line = line?;
                let line_number = self.line_number.get() + 1;
                self.line_number.set(line_number);

                let row = split_row(&line, &self.delimiter);
                let record = RowCodec::<T>::new(&self.bindings, &self.delimiter)
                    .decode(&row, line_number)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

impl<R, T> CsvItemReader<R, T> {
    /// Bindings resolved from the header line.
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: `", "`
/// - Field options: those declared by the record type only
pub struct CsvItemReaderBuilder<T> {
    format: CsvFormat,
    options: FieldOptionsTable,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for CsvItemReaderBuilder<T> {
    fn default() -> Self {
        Self {
            format: CsvFormat::default(),
            options: FieldOptionsTable::default(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> CsvItemReaderBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string separating columns.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.format.delimiter = delimiter.into();
        self
    }

    pub fn format(mut self, format: CsvFormat) -> Self {
        self.format = format;
        self
    }

    /// Replaces the per-field options applied on top of the declared ones.
    pub fn field_options(mut self, options: FieldOptionsTable) -> Self {
        self.options = options;
        self
    }

    /// Accepts `alias` as a column name for `field`.
    pub fn alias(mut self, field: &str, alias: &str) -> Self {
        self.options = self.options.alias(field, alias);
        self
    }

    /// Declares the separator of the list-valued `field`.
    pub fn list_separator(mut self, field: &str, separator: char) -> Self {
        self.options = self.options.list_separator(field, separator);
        self
    }

    /// Creates a `CsvItemReader` from any reader, consuming its header line.
    ///
    /// # Errors
    ///
    /// `EmptyFile` when there is no header line, `ColumnNotFound` when the
    /// header names a column the record cannot bind.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvItemReader<BufReader<R>, T>, CsvError> {
        self.build(BufReader::new(rdr), "input stream")
    }

    /// Creates a `CsvItemReader` reading the file at `path`.
    ///
    /// # Errors
    ///
    /// `FileNotFound` when `path` is not a regular file, then the same errors
    /// as [`from_reader`](Self::from_reader).
    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<CsvItemReader<BufReader<File>, T>, CsvError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CsvError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        self.build(BufReader::new(file), &path.display().to_string())
    }

    fn build<R: BufRead>(self, rdr: R, source: &str) -> Result<CsvItemReader<R, T>, CsvError> {
        self.format.validate()?;
        let schema = RecordSchema::with_options::<T>(&self.options)?;

        let mut lines = rdr.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(CsvError::EmptyFile(source.to_owned())),
        };

        let bindings = HeaderBinder::new(&schema, &self.format.delimiter).bind_from_header(&header)?;
        debug!("Reading {} with columns {:?}", source, bindings.column_names());

        Ok(CsvItemReader {
            lines: RefCell::new(lines),
            bindings,
            delimiter: self.format.delimiter,
            line_number: Cell::new(1),
            _record: PhantomData,
        })
    }
}
