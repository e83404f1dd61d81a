//! Strainer - schema-validated filtering for homogeneous record collections.
//!
//! A [`Schema`] is built once from a sample record. Clients then send
//! criteria as plain text triples (field, operator token, value); each
//! criterion is checked against the field's operator whitelist, its value
//! is coerced to the field's type, and the resolved criteria narrow the
//! collection one after another (logical AND).
//!
//! # Quick Start
//!
//! ```rust
//! use strainer::{filter, Criterion, Record, Schema};
//!
//! #[derive(Record)]
//! struct Item {
//!     #[filter(ops = "lt,lte,eq,gte,gt,neq", rename = "a")]
//!     a: i32,
//!     #[filter(ops = "lte,gte", rename = "b")]
//!     b: u64,
//!     #[filter(ops = "c,eq,neq,nc", rename = "str")]
//!     label: String,
//! }
//!
//! let items: Vec<Item> = (1..=5)
//!     .map(|i| Item { a: i, b: i as u64 * 10, label: format!("wzyao{i}") })
//!     .collect();
//! let schema = Schema::build(&items[0]).unwrap();
//!
//! let criteria = [
//!     Criterion::new("a", "lte", "3"),
//!     Criterion::new("b", "lte", "20"),
//!     Criterion::new("str", "contain", "wzyao"),
//! ];
//! let records: Vec<&Item> = items.iter().collect();
//! let matched = filter(&schema, &criteria, &records).unwrap();
//! assert_eq!(matched.len(), 2);
//! ```
//!
//! # Operators
//!
//! | Field type | Operators |
//! |------------|-----------|
//! | Integer, float | `less_than`, `less_equal`, `equal`, `greater_equal`, `greater_than`, `not_equal` |
//! | String | `contains`, `equal`, `not_equal`, `not_contains` |
//!
//! Short tokens (`lt`, `lte`, `eq`, `gte`, `gt`, `neq`, `c`/`contain`,
//! `nc`/`notcontain`) are accepted everywhere a token is. Fields of any
//! other type are listed in the schema but have no legal operators.
//!
//! # Errors
//!
//! Schema construction fails with [`SchemaBuildError`]. A filter call fails
//! with [`FilterError`]: either a [`ValidationError`] naming the position
//! of the first bad criterion, or an [`ExecutionError`] when a record is
//! not of the schema's type. A value that does not parse for a numeric
//! field is always an error, never a zero.

mod config;
mod criterion;
mod error;
mod executor;
mod op;
mod record;
mod schema;
mod value;

pub use config::{FilterConfig, Strategy};
pub use criterion::{Comparator, Criterion, ResolvedCriterion};
pub use error::{ExecutionError, FilterError, Result, SchemaBuildError, ValidationError};
pub use executor::{filter, Executor, Filter};
pub use op::{NumericOp, Op, TextOp};
pub use record::{Accessor, FieldDef, Record, RecordShape};
pub use schema::{FieldDescriptor, Schema};
pub use value::{CoerceError, FieldKind, KindClass, Literal, Value};

#[cfg(feature = "derive")]
pub use strainer_macros::Record;
