use std::marker::PhantomData;

use crate::{
    core::{
        binding::{BindingSet, FieldBinding},
        record::{Cell, Record},
    },
    error::CsvError,
};

/// Splits one line into its raw column values.
///
/// This is a plain split: quotes and escapes are not interpreted.
pub fn split_row(line: &str, delimiter: &str) -> Vec<String> {
    line.split(delimiter).map(str::to_owned).collect()
}

/// Converts between raw rows and records of type `T` for one binding set.
///
/// Rows are joined with `delimiter`, so encoding refuses any cell that would
/// not split back into the same row.
pub struct RowCodec<'a, T> {
    bindings: &'a BindingSet,
    delimiter: &'a str,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Record> RowCodec<'a, T> {
    pub fn new(bindings: &'a BindingSet, delimiter: &'a str) -> Self {
        Self {
            bindings,
            delimiter,
            _record: PhantomData,
        }
    }

    /// Builds a record from `row`, read from line `line` of its source.
    pub fn decode(&self, row: &[String], line: usize) -> Result<T, CsvError> {
        if row.len() != self.bindings.len() {
            return Err(CsvError::RowWidthMismatch {
                line,
                expected: self.bindings.len(),
                found: row.len(),
            });
        }

        let mut record = T::default();

        for binding in self.bindings.iter() {
            let value = &row[binding.position()];

            let cell = match binding.split_character() {
                Some(_) if value.is_empty() => Cell::List(Vec::new()),
                // char patterns match literally
                Some(separator) => Cell::List(value.split(separator).map(str::to_owned).collect()),
                None => Cell::Scalar(value.clone()),
            };

            record
                .set_field(binding.field(), cell)
                .map_err(|reason| CsvError::FieldAssignment {
                    field: binding.field().to_owned(),
                    value: value.clone(),
                    reason,
                })?;
        }

        Ok(record)
    }

    /// Flattens `record` into one raw row, in binding position order.
    ///
    /// # Errors
    ///
    /// `FieldAssignment` when a cell holds a line break or the delimiter, or
    /// when a list element holds its separator.
    pub fn encode(&self, record: &T) -> Result<Vec<String>, CsvError> {
        self.bindings
            .iter()
            .map(|binding| self.encode_field(record, binding))
            .collect()
    }

    fn encode_field(&self, record: &T, binding: &FieldBinding) -> Result<String, CsvError> {
        let rejected = |value: String, reason: String| CsvError::FieldAssignment {
            field: binding.field().to_owned(),
            value,
            reason,
        };

        let cell = record.get_field(binding.field()).ok_or_else(|| {
            rejected(
                String::new(),
                format!("{} has no readable field", T::record_name()),
            )
        })?;

        let value = match (cell, binding.split_character()) {
            (Cell::List(items), Some(separator)) => {
                if let Some(item) = items.iter().find(|item| item.contains(separator)) {
                    return Err(rejected(
                        item.clone(),
                        format!("list element contains its separator {separator:?}"),
                    ));
                }
                items.join(separator.encode_utf8(&mut [0; 4]))
            }
            (Cell::Scalar(value), None) => value,
            (cell, _) => {
                return Err(rejected(
                    format!("{cell:?}"),
                    format!("value shape does not match column {}", binding.column_name()),
                ));
            }
        };

        if value.contains(['\n', '\r']) {
            return Err(rejected(value, "value contains a line break".to_owned()));
        }
        if !self.delimiter.is_empty() && value.contains(self.delimiter) {
            let reason = format!("value contains the delimiter {:?}", self.delimiter);
            return Err(rejected(value, reason));
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{split_row, RowCodec};
    use crate::{
        core::{binding::HeaderBinder, config::DEFAULT_DELIMITER, resolver::RecordSchema},
        error::CsvError,
    };

    #[derive(Debug, Default, PartialEq)]
    struct DummyData {
        name: String,
        number: i32,
        split_texts: Vec<String>,
    }

    crate::csv_record!(DummyData {
        name: String,
        number: i32,
        split_texts: Vec<String> => { alias: "tags", separator: '|' },
    });

    fn row(line: &str) -> Vec<String> {
        split_row(line, DEFAULT_DELIMITER)
    }

    #[test]
    fn decodes_scalars_and_lists() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_header("name, number, tags")
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);

        let record = codec.decode(&row("Ann, 5, x|y|z"), 2).unwrap();

        assert_eq!(
            record,
            DummyData {
                name: "Ann".to_owned(),
                number: 5,
                split_texts: vec!["x".to_owned(), "y".to_owned(), "z".to_owned()],
            }
        );
    }

    #[test]
    fn separator_is_not_a_pattern() {
        #[derive(Debug, Default)]
        struct Dotted {
            parts: Vec<String>,
        }
        crate::csv_record!(Dotted { parts: Vec<String> => { separator: '.' } });

        let schema = RecordSchema::of::<Dotted>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();

        let record = RowCodec::<Dotted>::new(&bindings, DEFAULT_DELIMITER)
            .decode(&row("a.b.c"), 2)
            .unwrap();
        assert_eq!(record.parts, vec!["a", "b", "c"]);
    }

    #[test]
    fn unbound_fields_keep_their_default() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_header("number")
            .unwrap();

        let record = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER)
            .decode(&row("12"), 2)
            .unwrap();
        assert_eq!(record, DummyData { number: 12, ..DummyData::default() });
    }

    #[test]
    fn row_width_must_match_the_header() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);

        for (line, found) in [("Ann, 5", 2), ("Ann, 5, x, extra", 4)] {
            match codec.decode(&row(line), 7) {
                Err(CsvError::RowWidthMismatch { line: 7, expected: 3, found: actual }) => {
                    assert_eq!(actual, found)
                }
                other => panic!("expected RowWidthMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_numeric_integer_is_an_assignment_error() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();

        let result = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER).decode(&row("Ann, five, x"), 3);
        assert!(matches!(
            result,
            Err(CsvError::FieldAssignment { field, value, .. }) if field == "number" && value == "five"
        ));
    }

    #[test]
    fn encodes_in_binding_order() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_header("tags, number, name")
            .unwrap();
        let record = DummyData {
            name: "Bob".to_owned(),
            number: -3,
            split_texts: vec!["x".to_owned(), "y".to_owned(), "z".to_owned()],
        };

        let encoded = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER).encode(&record).unwrap();
        assert_eq!(encoded, vec!["x|y|z", "-3", "Bob"]);
    }

    #[test]
    fn list_split_and_join_are_inverse() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_header("tags")
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);

        for items in [vec!["x", "y", "z"], vec!["single"], vec![]] {
            let record = DummyData {
                split_texts: items.iter().map(|item| item.to_string()).collect(),
                ..DummyData::default()
            };

            let encoded = codec.encode(&record).unwrap();
            let decoded = codec.decode(&encoded, 2).unwrap();
            assert_eq!(decoded.split_texts, items);
        }
    }

    #[test]
    fn list_of_one_empty_string_reads_back_empty() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_header("tags")
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);
        let record = DummyData {
            split_texts: vec![String::new()],
            ..DummyData::default()
        };

        let encoded = codec.encode(&record).unwrap();
        assert_eq!(encoded, vec![""]);

        let decoded = codec.decode(&encoded, 2).unwrap();
        assert!(decoded.split_texts.is_empty());
    }

    #[test]
    fn scalar_with_line_break_or_delimiter_is_not_encoded() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);

        for name in ["a\nb", "a\rb", "trailing\r\n", "Doe, Jane"] {
            let record = DummyData {
                name: name.to_owned(),
                ..DummyData::default()
            };

            match codec.encode(&record) {
                Err(CsvError::FieldAssignment { field, value, .. }) => {
                    assert_eq!(field, "name");
                    assert_eq!(value, name);
                }
                other => panic!("expected FieldAssignment for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn delimiter_is_only_rejected_as_a_whole() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();
        let record = DummyData {
            name: "Doe,Jane and Bob".to_owned(),
            ..DummyData::default()
        };

        let encoded = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER)
            .encode(&record)
            .unwrap();
        assert_eq!(encoded[0], "Doe,Jane and Bob");

        let result = RowCodec::<DummyData>::new(&bindings, ",").encode(&record);
        assert!(matches!(result, Err(CsvError::FieldAssignment { field, .. }) if field == "name"));
    }

    #[test]
    fn joined_list_with_line_break_or_delimiter_is_not_encoded() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();
        let codec = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER);

        for items in [vec!["x", "y\nz"], vec!["x\r"], vec!["x, y", "z"]] {
            let record = DummyData {
                split_texts: items.iter().map(|item| item.to_string()).collect(),
                ..DummyData::default()
            };

            match codec.encode(&record) {
                Err(CsvError::FieldAssignment { field, value, .. }) => {
                    assert_eq!(field, "split_texts");
                    assert_eq!(value, items.join("|"));
                }
                other => panic!("expected FieldAssignment for {items:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn list_element_holding_its_separator_is_not_encoded() {
        let schema = RecordSchema::of::<DummyData>();
        let bindings = HeaderBinder::new(&schema, DEFAULT_DELIMITER)
            .bind_from_type()
            .unwrap();
        let record = DummyData {
            split_texts: vec!["x".to_owned(), "y|z".to_owned()],
            ..DummyData::default()
        };

        let result = RowCodec::<DummyData>::new(&bindings, DEFAULT_DELIMITER).encode(&record);

        assert!(matches!(
            result,
            Err(CsvError::FieldAssignment { field, value, .. }) if field == "split_texts" && value == "y|z"
        ));
    }
}
