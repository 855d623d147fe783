//! Introspection contract between record types and the mapper.
//!
//! A record type describes its fields once, in declaration order, through
//! [`Record::fields`], and lets the mapper read and assign them by name. Field
//! values travel as [`Cell`]s: a single string for scalar fields, a list of
//! strings for list-valued fields. Coercion between a cell and the concrete
//! field type is the job of [`CsvField`].
//!
//! Most record types do not implement [`Record`] by hand but use the
//! [`csv_record!`](crate::csv_record) macro:
//!
//! ```
//! use csv_field_mapper::{core::record::Record, csv_record};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     nicknames: Vec<String>,
//! }
//!
//! csv_record!(Person {
//!     name: String,
//!     age: u32,
//!     nicknames: Vec<String> => { alias: "aka", separator: '|' },
//! });
//!
//! let names: Vec<&str> = Person::fields().iter().map(|field| field.name).collect();
//! assert_eq!(names, vec!["name", "age", "nicknames"]);
//! assert_eq!(Person::fields()[2].alias, Some("aka"));
//! ```

/// Coercion kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Text,
    /// Any type coerced by a caller supplied [`CsvScalar`] implementation.
    Custom,
}

/// Coercion kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    List(ScalarKind),
}

impl FieldKind {
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::List(_))
    }
}

/// Raw value of one field, before coercion into the field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Scalar(String),
    List(Vec<String>),
}

/// Declared field of a record type, with its optional metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier, used as the default column name.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Alternate column name accepted when reading a header.
    pub alias: Option<&'static str>,
    /// Character joining the elements of a list-valued field inside one cell.
    pub separator: Option<char>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            alias: None,
            separator: None,
        }
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }
}

/// A type whose instances can be built from, and flattened into, CSV rows.
pub trait Record: Default {
    /// Declared fields, in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Reads the field called `name`, or `None` if there is no such field.
    fn get_field(&self, name: &str) -> Option<Cell>;

    /// Coerces `cell` into the field called `name` and assigns it.
    ///
    /// The error is a human readable reason, the caller adds the context.
    fn set_field(&mut self, name: &str, cell: Cell) -> Result<(), String>;

    /// Name used in error messages.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Conversion between one scalar value and its textual form.
///
/// Implement this for any scalar type beyond integers and strings, then use
/// [`scalar_field!`](crate::scalar_field) to make it usable as a field.
pub trait CsvScalar: Sized {
    const KIND: ScalarKind;

    fn parse_scalar(raw: &str) -> Result<Self, String>;

    fn format_scalar(&self) -> String;
}

/// Conversion between a field type and a [`Cell`].
pub trait CsvField: Sized {
    const KIND: FieldKind;

    fn from_cell(cell: Cell) -> Result<Self, String>;

    fn to_cell(&self) -> Cell;
}

impl CsvScalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(raw.to_owned())
    }

    fn format_scalar(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_scalar {
    ($($int:ty),* $(,)?) => {
        $(
            impl CsvScalar for $int {
                const KIND: ScalarKind = ScalarKind::Integer;

                fn parse_scalar(raw: &str) -> Result<Self, String> {
                    raw.parse::<$int>().map_err(|error| error.to_string())
                }

                fn format_scalar(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Implements [`CsvField`] for scalar types that implement [`CsvScalar`].
///
/// ```
/// use csv_field_mapper::{core::record::{CsvScalar, ScalarKind}, scalar_field};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Flag(bool);
///
/// impl CsvScalar for Flag {
///     const KIND: ScalarKind = ScalarKind::Custom;
///
///     fn parse_scalar(raw: &str) -> Result<Self, String> {
///         match raw {
///             "yes" => Ok(Flag(true)),
///             "no" => Ok(Flag(false)),
///             other => Err(format!("{other} is neither yes nor no")),
///         }
///     }
///
///     fn format_scalar(&self) -> String {
///         if self.0 { "yes".to_owned() } else { "no".to_owned() }
///     }
/// }
///
/// scalar_field!(Flag);
/// ```
#[macro_export]
macro_rules! scalar_field {
    ($($scalar:ty),* $(,)?) => {
        $(
            impl $crate::core::record::CsvField for $scalar {
                const KIND: $crate::core::record::FieldKind = $crate::core::record::FieldKind::Scalar(
                    <$scalar as $crate::core::record::CsvScalar>::KIND,
                );

                fn from_cell(cell: $crate::core::record::Cell) -> ::std::result::Result<Self, ::std::string::String> {
                    match cell {
                        $crate::core::record::Cell::Scalar(raw) => {
                            <$scalar as $crate::core::record::CsvScalar>::parse_scalar(&raw)
                        }
                        $crate::core::record::Cell::List(_) => {
                            ::std::result::Result::Err(::std::string::String::from("expected a single value, got a list"))
                        }
                    }
                }

                fn to_cell(&self) -> $crate::core::record::Cell {
                    $crate::core::record::Cell::Scalar(
                        <$scalar as $crate::core::record::CsvScalar>::format_scalar(self),
                    )
                }
            }
        )*
    };
}

scalar_field!(String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: CsvScalar> CsvField for Vec<T> {
    const KIND: FieldKind = FieldKind::List(T::KIND);

    fn from_cell(cell: Cell) -> Result<Self, String> {
        match cell {
            Cell::List(items) => items.iter().map(|item| T::parse_scalar(item)).collect(),
            Cell::Scalar(_) => Err("expected a list, got a single value".to_owned()),
        }
    }

    fn to_cell(&self) -> Cell {
        Cell::List(self.iter().map(CsvScalar::format_scalar).collect())
    }
}

/// Implements [`Record`] for a struct deriving `Default`.
///
/// Fields are listed in declaration order with their type. Optional metadata
/// follows `=>`: `alias: "column name"` and `separator: '|'` (required for
/// list-valued fields unless supplied at runtime through field options).
///
/// ```
/// use csv_field_mapper::{core::record::{Cell, Record}, csv_record};
///
/// #[derive(Default)]
/// struct Item {
///     id: u64,
///     label: String,
/// }
///
/// csv_record!(Item {
///     id: u64,
///     label: String => { alias: "Label" },
/// });
///
/// let mut item = Item::default();
/// item.set_field("id", Cell::Scalar("7".to_owned())).unwrap();
/// assert_eq!(item.id, 7);
/// assert!(item.set_field("id", Cell::Scalar("seven".to_owned())).is_err());
/// assert_eq!(item.get_field("label"), Some(Cell::Scalar(String::new())));
/// ```
#[macro_export]
macro_rules! csv_record {
    ($record:ty {
        $(
            $field:ident : $ty:ty $( => { $( $key:ident : $value:expr ),* $(,)? } )?
        ),* $(,)?
    }) => {
        impl $crate::core::record::Record for $record {
            fn fields() -> &'static [$crate::core::record::FieldDescriptor] {
                const FIELDS: &[$crate::core::record::FieldDescriptor] = &[
                    $(
                        $crate::core::record::FieldDescriptor::new(
                            stringify!($field),
                            <$ty as $crate::core::record::CsvField>::KIND,
                        )
                        $( $( .$key($value) )* )?
                    ),*
                ];
                FIELDS
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::core::record::Cell> {
                match name {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            <$ty as $crate::core::record::CsvField>::to_cell(&self.$field),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                cell: $crate::core::record::Cell,
            ) -> ::std::result::Result<(), ::std::string::String> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::core::record::CsvField>::from_cell(cell)?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => ::std::result::Result::Err(::std::format!("no field named {}", name)),
                }
            }
        }
    };
}
