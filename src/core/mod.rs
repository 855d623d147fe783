/// Column to field bindings and the header binder.
pub mod binding;

/// Delimiter and per-field options.
pub mod config;

/// Reader and writer traits.
pub mod item;

/// Record introspection and field coercion.
pub mod record;

/// Field lookup by identifier or alias.
pub mod resolver;
