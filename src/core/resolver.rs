use log::debug;

use crate::{
    core::{
        config::FieldOptionsTable,
        record::{FieldKind, Record},
    },
    error::CsvError,
};

/// A record field with its effective metadata.
///
/// Declared metadata from [`Record::fields`] merged with caller options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub alias: Option<String>,
    pub list_separator: Option<char>,
}

/// The effective field layout of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    record: &'static str,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Schema built from the declared fields only.
    pub fn of<T: Record>() -> Self {
        Self {
            record: T::record_name(),
            fields: T::fields()
                .iter()
                .map(|field| FieldSpec {
                    name: field.name,
                    kind: field.kind,
                    alias: field.alias.map(str::to_owned),
                    list_separator: field.separator,
                })
                .collect(),
        }
    }

    /// Schema with caller options applied on top of the declared metadata.
    ///
    /// Options naming a field the record does not declare are rejected.
    pub fn with_options<T: Record>(options: &FieldOptionsTable) -> Result<Self, CsvError> {
        let mut schema = Self::of::<T>();

        for (name, field_options) in options.iter() {
            let field = schema
                .fields
                .iter_mut()
                .find(|field| field.name == name)
                .ok_or_else(|| {
                    CsvError::Config(format!(
                        "field options given for {name}, which {} does not declare",
                        T::record_name()
                    ))
                })?;

            if let Some(alias) = &field_options.alias {
                field.alias = Some(alias.clone());
            }
            if let Some(separator) = field_options.list_separator {
                field.list_separator = Some(separator);
            }
        }

        Ok(schema)
    }

    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn resolver(&self) -> FieldResolver<'_> {
        FieldResolver { schema: self }
    }
}

/// Finds the field a column name refers to.
pub struct FieldResolver<'a> {
    schema: &'a RecordSchema,
}

impl<'a> FieldResolver<'a> {
    pub fn new(schema: &'a RecordSchema) -> Self {
        Self { schema }
    }

    /// Resolves `name` to a field: identifier first, then alias.
    ///
    /// Matching is exact and case-sensitive.
    pub fn resolve(&self, name: &str) -> Result<&'a FieldSpec, CsvError> {
        let fields = self.schema.fields();

        if let Some(field) = fields.iter().find(|field| field.name == name) {
            return Ok(field);
        }

        match fields
            .iter()
            .filter(|field| field.alias.is_some())
            .find(|field| field.alias.as_deref() == Some(name))
        {
            Some(field) => {
                debug!("Column {} resolved to field {} by alias", name, field.name);
                Ok(field)
            }
            None => Err(CsvError::ColumnNotFound {
                column: name.to_owned(),
                record: self.schema.record_name().to_owned(),
            }),
        }
    }
}
