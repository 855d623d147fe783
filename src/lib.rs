#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # CSV Field Mapper

 Maps the rows of a delimited text file to typed Rust records, and records
 back to rows. Columns bind to fields by header name: a column named like a
 field fills that field, a column named like a field's alias fills it too.
 List-valued fields are flattened into a single cell with a per-field
 separator character.

 ## Core Concepts

- **Record:** a `Default` type that lists its fields and can get and set them
  by name. The `csv_record!` macro implements it for plain structs.
- **FieldResolver:** finds the field a column name refers to, identifier first,
  then alias.
- **HeaderBinder:** turns a header line, or the declared fields of a record
  type, into an ordered `BindingSet`.
- **RowCodec:** decodes one raw row into a record and encodes a record into a
  raw row.
- **CsvItemReader / CsvItemWriter:** stream records from any reader or to any
  writer.
- **CsvProcessor:** reads a whole file, or appends records to a file, reusing
  its header when it already exists.

 ## Format

 The first line names the columns, every following line holds one record.
 Columns are separated by `", "` unless configured otherwise. There is no
 quoting, so writing a value that contains a line break or the delimiter, or
 a list element that contains its separator, fails with
 [`CsvError::FieldAssignment`] instead of producing a file that cannot be read back.

 ## Getting Started

```rust
# use csv_field_mapper::{csv_record, error::CsvError, item::csv::csv_processor::CsvProcessor};
#[derive(Debug, Default, PartialEq)]
struct DummyData {
    name: String,
    number: i32,
    split_texts: Vec<String>,
}

csv_record!(DummyData {
    name: String,
    number: i32,
    split_texts: Vec<String> => { alias: "tags", separator: '|' },
});

fn main() -> Result<(), CsvError> {
    let dir = std::env::temp_dir().join(format!("csv-field-mapper-{}", std::process::id()));
    # let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("dummy.csv");
    std::fs::write(&path, "name, number, tags\nAnn, 5, x|y|z")?;

    let processor = CsvProcessor::<DummyData>::new(&path);
    let records = processor.read_file()?;

    assert_eq!(
        records,
        vec![DummyData {
            name: "Ann".to_owned(),
            number: 5,
            split_texts: vec!["x".to_owned(), "y".to_owned(), "z".to_owned()],
        }]
    );

    // Appended rows follow the existing header, aliases included.
    processor.write_to_file(&records)?;
    assert_eq!(processor.read_file()?.len(), 2);
    # std::fs::remove_dir_all(&dir)?;
    Ok(())
}
```

 ## Limitations

 Operations are synchronous and run to completion or fail with a single
 `CsvError`. A write that fails halfway leaves the lines already written in
 the file.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module: records, bindings and configuration
pub mod core;

/// Error types for read and write operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Readers, writers and the file processor
pub mod item;
