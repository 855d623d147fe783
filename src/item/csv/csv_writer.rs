use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    marker::PhantomData,
    path::Path,
    result,
};

use log::debug;

use crate::{
    core::{
        binding::{BindingSet, HeaderBinder},
        config::{CsvFormat, FieldOptionsTable},
        item::{ItemWriter, ItemWriterResult},
        record::Record,
        resolver::RecordSchema,
    },
    error::CsvError,
    item::csv::row_codec::RowCodec,
};

/// A CSV item writer that implements the `ItemWriter` trait.
///
/// Every line, header included, is terminated by `\n`. Columns follow the
/// writer's bindings, which come either from the record type or from the
/// header of the file being appended to.
pub struct CsvItemWriter<W: Write, T> {
    wrapper: RefCell<W>,
    bindings: BindingSet,
    delimiter: String,
    /// Header line still to be written before the first record.
    pending_header: Cell<bool>,
    /// Newline still to be written so output starts on a fresh line.
    pending_newline: Cell<bool>,
    _record: PhantomData<fn() -> T>,
}

impl<W: Write, T: Record> ItemWriter<T> for CsvItemWriter<W, T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.write_preamble()?;

        let codec = RowCodec::<T>::new(&self.bindings, &self.delimiter);
        for item in items {
            let row = codec.encode(item)?;
            self.write_line(&row.join(&self.delimiter))?;
        }

        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.wrapper.borrow_mut().flush()?;
        Ok(())
    }

    /// Writes the header, if any, even when no record follows.
    fn open(&self) -> ItemWriterResult {
        self.write_preamble()
    }

    fn close(&self) -> ItemWriterResult {
        self.write_preamble()?;
        ItemWriter::<T>::flush(self)
    }
}

impl<W: Write, T> CsvItemWriter<W, T> {
    /// Bindings that decide the column order of every written line.
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> result::Result<W, CsvError> {
        let mut inner = self.wrapper.into_inner();
        inner.flush()?;
        Ok(inner)
    }

    fn write_preamble(&self) -> ItemWriterResult {
        if self.pending_newline.replace(false) {
            self.wrapper.borrow_mut().write_all(b"\n")?;
        }
        if self.pending_header.replace(false) {
            let header = self.bindings.header_line(&self.delimiter);
            self.write_line(&header)?;
        }
        Ok(())
    }

    fn write_line(&self, line: &str) -> ItemWriterResult {
        let mut wrapper = self.wrapper.borrow_mut();
        wrapper.write_all(line.as_bytes())?;
        wrapper.write_all(b"\n")?;
        Ok(())
    }
}

/// A builder for configuring CSV item writing.
///
/// # Default Configuration
///
/// - Delimiter: `", "`
/// - Headers: enabled, derived from the record type's declared fields
///
/// # Examples
///
/// ```
/// use csv_field_mapper::core::item::ItemWriter;
/// use csv_field_mapper::csv_record;
/// use csv_field_mapper::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// #[derive(Default)]
/// struct Row {
///     city: String,
///     population: u64,
/// }
///
/// csv_record!(Row { city: String, population: u64 });
///
/// let writer = CsvItemWriterBuilder::<Row>::new()
///     .from_writer(vec![])
///     .unwrap();
///
/// writer
///     .write(&[
///         Row { city: "Boston".to_owned(), population: 4628910 },
///         Row { city: "Concord".to_owned(), population: 42695 },
///     ])
///     .unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "city, population\nBoston, 4628910\nConcord, 42695\n");
/// ```
pub struct CsvItemWriterBuilder<T> {
    format: CsvFormat,
    options: FieldOptionsTable,
    has_headers: bool,
    existing_header: Option<String>,
    start_on_new_line: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for CsvItemWriterBuilder<T> {
    fn default() -> Self {
        Self {
            format: CsvFormat::default(),
            options: FieldOptionsTable::default(),
            has_headers: true,
            existing_header: None,
            start_on_new_line: false,
            _record: PhantomData,
        }
    }
}

impl<T: Record> CsvItemWriterBuilder<T> {
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

    /// Sets whether a header line is written before the first record.
    ///
    /// Ignored when an existing header is reused, the destination has one.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Reuses the header line of the destination to order columns.
    pub fn existing_header(mut self, header: impl Into<String>) -> Self {
        self.existing_header = Some(header.into());
        self
    }

    /// Writes a newline before anything else, for destinations whose last
    /// line is not terminated.
    pub fn start_on_new_line(mut self, yes: bool) -> Self {
        self.start_on_new_line = yes;
        self
    }

    /// Creates a `CsvItemWriter` writing to a file at `path`, truncating it.
    ///
    /// The file is only created once the bindings are resolved.
    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<CsvItemWriter<BufWriter<File>, T>, CsvError> {
        let (bindings, pending_header) = self.resolve_bindings()?;
        let file = File::create(path)?;
        Ok(self.assemble(BufWriter::new(file), bindings, pending_header))
    }

    /// Creates a `CsvItemWriter` writing to `wtr`.
    ///
    /// # Errors
    ///
    /// Binding errors: `ColumnNotFound` when a reused header names an unknown
    /// column, `MissingListSeparator` for list fields without separator.
    pub fn from_writer<W: Write>(self, wtr: W) -> Result<CsvItemWriter<W, T>, CsvError> {
        let (bindings, pending_header) = self.resolve_bindings()?;
        Ok(self.assemble(wtr, bindings, pending_header))
    }

    fn resolve_bindings(&self) -> Result<(BindingSet, bool), CsvError> {
        self.format.validate()?;
        let schema = RecordSchema::with_options::<T>(&self.options)?;
        let binder = HeaderBinder::new(&schema, &self.format.delimiter);

        let (bindings, pending_header) = match &self.existing_header {
            Some(header) => (binder.bind_from_header(header)?, false),
            None => (binder.bind_from_type()?, self.has_headers),
        };
        debug!("Writing columns {:?}", bindings.column_names());

        Ok((bindings, pending_header))
    }

    fn assemble<W: Write>(
        self,
        wtr: W,
        bindings: BindingSet,
        pending_header: bool,
    ) -> CsvItemWriter<W, T> {
        CsvItemWriter {
            wrapper: RefCell::new(wtr),
            bindings,
            delimiter: self.format.delimiter,
            pending_header: Cell::new(pending_header),
            pending_newline: Cell::new(self.start_on_new_line),
            _record: PhantomData,
        }
    }
}
