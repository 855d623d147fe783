//! CSV support for reading and writing typed records.
//!
//! # Module Architecture
//!
//! 1. **RowCodec**: converts one raw row into a record and back, splitting and
//!    joining list-valued fields on their separator.
//!
//! 2. **CsvItemReader**: binds the header line of any `Read` source, then
//!    decodes one record per call to `read`.
//!
//! 3. **CsvItemWriter**: encodes records to any `Write` sink, in the column
//!    order of its bindings, optionally preceded by a header line.
//!
//! 4. **CsvProcessor**: reads a whole file, or writes to a file while reusing
//!    its header when it already exists.
//!
//! The format is deliberately simple: columns are separated by a fixed string
//! (`", "` by default) and values are never quoted. Values containing a line
//! break or the delimiter are refused on write.
//!
//! # Examples
//!
//! ```
//! use csv_field_mapper::core::item::{ItemReader, ItemWriter};
//! use csv_field_mapper::csv_record;
//! use csv_field_mapper::item::csv::{
//!     csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//!     hobbies: Vec<String>,
//! }
//!
//! csv_record!(Person {
//!     name: String,
//!     age: u8,
//!     hobbies: Vec<String> => { separator: '|' },
//! });
//!
//! let people = vec![
//!     Person { name: "Alice".to_owned(), age: 28, hobbies: vec!["chess".to_owned(), "judo".to_owned()] },
//!     Person { name: "Bob".to_owned(), age: 35, hobbies: vec![] },
//! ];
//!
//! let mut buffer = Vec::new();
//! {
//!     let writer = CsvItemWriterBuilder::<Person>::new()
//!         .from_writer(&mut buffer)
//!         .unwrap();
//!     writer.write(&people).unwrap();
//!     writer.flush().unwrap();
//! } // writer is dropped here, releasing the borrow
//!
//! let csv_output = String::from_utf8(buffer).unwrap();
//! assert_eq!(csv_output, "name, age, hobbies\nAlice, 28, chess|judo\nBob, 35, \n");
//!
//! let reader = CsvItemReaderBuilder::<Person>::new()
//!     .from_reader(csv_output.as_bytes())
//!     .unwrap();
//! let mut read_back = Vec::new();
//! while let Some(person) = reader.read().unwrap() {
//!     read_back.push(person);
//! }
//! assert_eq!(read_back, people);
//! ```

/// Whole-file reading and writing.
pub mod csv_processor;

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

/// Conversion between raw rows and records.
pub mod row_codec;
