//! Proc macros for strainer.
//!
//! - [`Record`] - Generate the `strainer::Record` implementation for a
//!   struct from `#[filter(...)]` field annotations

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derives the `Record` trait for filterable structs.
///
/// This macro generates an implementation of `strainer::Record` with one
/// plain accessor function per annotated field, so schema construction
/// binds field readers once and filtering never looks fields up by name.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `ops = "..."` | Comma-separated operator tokens legal on this field (required) |
/// | `rename = "..."` | Name criteria use for this field (default: field name) |
/// | `kind = "..."` | Kind for a type alias (`i32`, `f64`, `string`, ...); must match the aliased type |
/// | `skip` | Exclude this field |
///
/// Fields without `#[filter]` are not part of the schema. Integer, float
/// and `String` fields are searchable; fields of any other type are kept
/// in the schema with no legal operators.
///
/// # Generated Code
///
/// 1. Query-name constants (e.g., `Task::PRIORITY`)
/// 2. `Record::describe()` listing each field with its kind, declared
///    operators and accessor
///
/// # Example
///
/// ```ignore
/// use strainer::{Record, Schema};
///
/// #[derive(Record)]
/// struct Task {
///     #[filter(ops = "lt,lte,eq,gte,gt,neq")]
///     priority: u8,
///
///     #[filter(ops = "c,eq,neq,nc", rename = "name")]
///     title: String,
///
///     #[filter(skip)]
///     internal_id: u64,
/// }
///
/// let schema = Schema::build(&Task { priority: 1, title: "x".into(), internal_id: 0 })?;
/// assert_eq!(Task::NAME, "name");
/// ```
#[proc_macro_derive(Record, attributes(filter))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
