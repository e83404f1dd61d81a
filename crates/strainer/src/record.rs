//! The record capability.
//!
//! A [`Record`] describes its own filterable fields and hands out one plain
//! function pointer per field that reads the field's value. The schema
//! binds those accessors once; no field is ever located by offset or by
//! name at evaluation time.
//!
//! The trait is usually derived:
//!
//! ```
//! use strainer::Record;
//!
//! #[derive(Record)]
//! struct Task {
//!     #[filter(ops = "lt,lte,eq,gte,gt,neq", rename = "priority")]
//!     prio: u8,
//!     #[filter(ops = "c,eq,neq,nc")]
//!     title: String,
//!     notes: Vec<String>,
//! }
//!
//! assert_eq!(Task::PRIORITY, "priority");
//! ```
//!
//! A manual implementation spells the same thing out:
//!
//! ```
//! use std::any::Any;
//! use strainer::{Accessor, FieldDef, FieldKind, Record, RecordShape, Value};
//!
//! struct Task {
//!     title: String,
//! }
//!
//! fn title(task: &Task) -> Value<'_> {
//!     Value::Text(&task.title)
//! }
//!
//! impl Record for Task {
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn describe(&self) -> RecordShape<Self> {
//!         RecordShape::Struct(vec![FieldDef::new(
//!             "title",
//!             FieldKind::Text,
//!             "c,eq",
//!             Some(title as Accessor<Task>),
//!         )])
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use crate::value::{FieldKind, Value};

/// Reads one field out of a record.
pub type Accessor<R> = for<'a> fn(&'a R) -> Value<'a>;

/// A value the filter engine can evaluate criteria against.
pub trait Record: Any {
    /// Upcasts to [`Any`] for identity checks and accessor dispatch.
    fn as_any(&self) -> &dyn Any;

    /// Returns the concrete type name, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Describes the record's shape for schema construction.
    fn describe(&self) -> RecordShape<Self>
    where
        Self: Sized;
}

impl fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Shape reported by [`Record::describe`].
pub enum RecordShape<R> {
    /// A struct with named fields. Only fields carrying filter metadata
    /// are listed.
    Struct(Vec<FieldDef<R>>),
    /// Not record-shaped. Schema construction rejects it.
    Opaque,
}

/// Static description of one filterable field.
pub struct FieldDef<R> {
    /// Name criteria use to refer to the field.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Declared operator tokens, comma separated.
    pub operators: &'static str,
    /// Reader for the field. `None` for unsupported kinds.
    pub accessor: Option<Accessor<R>>,
}

impl<R> FieldDef<R> {
    pub fn new(
        name: &'static str,
        kind: FieldKind,
        operators: &'static str,
        accessor: Option<Accessor<R>>,
    ) -> Self {
        FieldDef {
            name,
            kind,
            operators,
            accessor,
        }
    }
}

macro_rules! opaque_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn describe(&self) -> RecordShape<Self> {
                    RecordShape::Opaque
                }
            }
        )*
    };
}

opaque_record!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);
