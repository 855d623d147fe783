use std::collections::HashSet;

use log::debug;

use crate::{
    core::resolver::{FieldSpec, RecordSchema},
    error::CsvError,
};

/// Association between one column and one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    position: usize,
    column_name: String,
    field: &'static str,
    split_character: Option<char>,
}

impl FieldBinding {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Identifier of the bound field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Separator of a list-valued field, `None` for scalar encoding.
    pub fn split_character(&self) -> Option<char> {
        self.split_character
    }
}

/// Bindings of every column of a file, ordered by position.
///
/// Positions are contiguous from 0, column names and fields are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSet {
    bindings: Vec<FieldBinding>,
}

impl BindingSet {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FieldBinding> {
        self.bindings.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.bindings.iter().map(FieldBinding::column_name).collect()
    }

    /// Header line naming every column, joined by `delimiter`.
    pub fn header_line(&self, delimiter: &str) -> String {
        self.column_names().join(delimiter)
    }
}

/// Derives the [`BindingSet`] of a read or write operation.
pub struct HeaderBinder<'a> {
    schema: &'a RecordSchema,
    delimiter: &'a str,
}

impl<'a> HeaderBinder<'a> {
    pub fn new(schema: &'a RecordSchema, delimiter: &'a str) -> Self {
        Self { schema, delimiter }
    }

    /// Binds every token of a header line to the field it names.
    ///
    /// Fails on the first token that resolves to no field.
    pub fn bind_from_header(&self, line: &str) -> Result<BindingSet, CsvError> {
        let resolver = self.schema.resolver();
        let mut columns = HashSet::new();
        let mut fields = HashSet::new();
        let mut bindings = Vec::new();

        for (position, token) in line.split(self.delimiter).enumerate() {
            let field = resolver.resolve(token)?;

            if !columns.insert(token) || !fields.insert(field.name) {
                return Err(CsvError::DuplicateColumn {
                    column: token.to_owned(),
                    field: field.name.to_owned(),
                });
            }

            bindings.push(self.binding(position, token, field)?);
        }

        debug!(
            "Bound header {:?} to {}",
            line,
            self.schema.record_name()
        );

        Ok(BindingSet { bindings })
    }

    /// Binds every declared field, in declaration order, under its identifier.
    pub fn bind_from_type(&self) -> Result<BindingSet, CsvError> {
        let bindings = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .map(|(position, field)| self.binding(position, field.name, field))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Derived default header for {}",
            self.schema.record_name()
        );

        Ok(BindingSet { bindings })
    }

    fn binding(
        &self,
        position: usize,
        column_name: &str,
        field: &FieldSpec,
    ) -> Result<FieldBinding, CsvError> {
        let split_character = if field.kind.is_list() {
            match field.list_separator {
                Some(separator) => Some(separator),
                None => {
                    return Err(CsvError::MissingListSeparator {
                        field: field.name.to_owned(),
                        record: self.schema.record_name().to_owned(),
                    });
                }
            }
        } else {
            None
        };

        Ok(FieldBinding {
            position,
            column_name: column_name.to_owned(),
            field: field.name,
            split_character,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HeaderBinder;
    use crate::{
        core::{config::DEFAULT_DELIMITER, resolver::RecordSchema},
        error::CsvError,
    };

    #[derive(Default)]
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

    #[derive(Default)]
    struct Unseparated {
        values: Vec<u8>,
    }

    crate::csv_record!(Unseparated { values: Vec<u8> });

    #[test]
    fn header_order_drives_positions() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        let bindings = binder.bind_from_header("tags, name, number").unwrap();

        assert_eq!(bindings.len(), 3);
        let fields: Vec<_> = bindings.iter().map(|binding| binding.field()).collect();
        assert_eq!(fields, vec!["split_texts", "name", "number"]);
        let positions: Vec<_> = bindings.iter().map(|binding| binding.position()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(bindings.get(0).unwrap().column_name(), "tags");
        assert_eq!(bindings.get(0).unwrap().split_character(), Some('|'));
        assert_eq!(bindings.get(1).unwrap().split_character(), None);
    }

    #[test]
    fn header_may_name_a_subset_of_fields() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        let bindings = binder.bind_from_header("number").unwrap();
        assert_eq!(bindings.column_names(), vec!["number"]);
    }

    #[test]
    fn unknown_header_token_aborts_binding() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        let result = binder.bind_from_header("name, age");
        assert!(matches!(
            result,
            Err(CsvError::ColumnNotFound { column, .. }) if column == "age"
        ));
    }

    #[test]
    fn a_field_cannot_be_bound_twice() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        assert!(matches!(
            binder.bind_from_header("name, name"),
            Err(CsvError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            binder.bind_from_header("split_texts, tags"),
            Err(CsvError::DuplicateColumn { column, field }) if column == "tags" && field == "split_texts"
        ));
    }

    #[test]
    fn default_header_uses_identifiers_in_declaration_order() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        let bindings = binder.bind_from_type().unwrap();

        assert_eq!(bindings.header_line(", "), "name, number, split_texts");
        assert_eq!(bindings.get(2).unwrap().split_character(), Some('|'));
    }

    #[test]
    fn delimiter_is_configurable() {
        let schema = RecordSchema::of::<DummyData>();
        let binder = HeaderBinder::new(&schema, ";");

        let bindings = binder.bind_from_header("number;name").unwrap();
        assert_eq!(bindings.header_line(";"), "number;name");
    }

    #[test]
    fn list_fields_need_a_separator() {
        let schema = RecordSchema::of::<Unseparated>();
        let binder = HeaderBinder::new(&schema, DEFAULT_DELIMITER);

        assert!(matches!(
            binder.bind_from_type(),
            Err(CsvError::MissingListSeparator { field, .. }) if field == "values"
        ));
    }
}
