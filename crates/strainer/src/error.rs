//! Error types for the strainer crate.

use thiserror::Error;

use crate::op::Op;
use crate::value::{CoerceError, FieldKind};

/// Errors raised while building a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaBuildError {
    /// The sample value is not a struct with named fields.
    #[error("{type_name} is not a record type")]
    NotARecord { type_name: &'static str },

    /// A field declares an operator token the catalog does not know.
    #[error("field({field}) declares unknown operator '{token}'")]
    UnknownOperator { field: String, token: String },

    /// A field declares an operator illegal for its type class.
    #[error("field({field}) is {} type ({kind}), operator '{op}' is not allowed", .kind.class())]
    OperatorNotAllowed {
        field: String,
        kind: FieldKind,
        op: Op,
    },

    /// Two fields share one query name.
    #[error("field({field}) is declared more than once")]
    DuplicateField { field: String },

    /// A searchable field declares an empty operator list.
    #[error("field({field}) is {kind} type but declares no operators")]
    NoOperators { field: String, kind: FieldKind },

    /// A searchable field has no reader.
    #[error("field({field}) has no accessor")]
    MissingAccessor { field: String },
}

/// Per-criterion validation failures. `index` is the criterion's
/// position in the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("criteria[{index}] is invalid, field({field}) does not support search")]
    UnknownField { index: usize, field: String },

    #[error("criteria[{index}] is invalid, unknown operator '{token}' for field({field})")]
    UnknownOperator {
        index: usize,
        field: String,
        token: String,
    },

    /// Carries the field's precomputed diagnostic.
    #[error("criteria[{index}] is invalid, {message}")]
    IllegalOperator {
        index: usize,
        field: String,
        op: Op,
        allowed: Vec<Op>,
        message: String,
    },

    #[error("criteria[{index}] is invalid, field({field}) cannot convert '{value}' to {kind}: {source}")]
    ValueConversion {
        index: usize,
        field: String,
        kind: FieldKind,
        value: String,
        source: CoerceError,
    },
}

impl ValidationError {
    /// Position of the offending criterion.
    pub fn index(&self) -> usize {
        match self {
            ValidationError::UnknownField { index, .. }
            | ValidationError::UnknownOperator { index, .. }
            | ValidationError::IllegalOperator { index, .. }
            | ValidationError::ValueConversion { index, .. } => *index,
        }
    }

    /// Name of the field the criterion referred to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownField { field, .. }
            | ValidationError::UnknownOperator { field, .. }
            | ValidationError::IllegalOperator { field, .. }
            | ValidationError::ValueConversion { field, .. } => field,
        }
    }
}

/// Failures while applying resolved criteria to records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// A record's type differs from the schema the criterion was
    /// resolved against.
    #[error("records[{position}] is {actual}, criteria[{criterion}] expects {expected}")]
    TypeMismatch {
        position: usize,
        criterion: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// A field accessor returned a value outside its declared kind.
    #[error("records[{position}] field({field}) read a value that is not {kind}, criteria[{criterion}] cannot compare it")]
    AccessorMismatch {
        position: usize,
        criterion: usize,
        field: String,
        kind: FieldKind,
    },
}

/// Any failure of a filter call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Result type for filter operations.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_index_qualified() {
        let err = ValidationError::UnknownField {
            index: 2,
            field: "nope".into(),
        };
        assert_eq!(
            err.to_string(),
            "criteria[2] is invalid, field(nope) does not support search"
        );
        assert_eq!(err.index(), 2);
        assert_eq!(err.field(), "nope");
    }

    #[test]
    fn operator_not_allowed_names_kind_and_class() {
        let err = SchemaBuildError::OperatorNotAllowed {
            field: "a".into(),
            kind: FieldKind::I32,
            op: Op::Contains,
        };
        assert_eq!(
            err.to_string(),
            "field(a) is integer type (i32), operator 'contains' is not allowed"
        );
    }

    #[test]
    fn filter_error_is_transparent() {
        let err: FilterError = ExecutionError::TypeMismatch {
            position: 3,
            criterion: 0,
            expected: "Task",
            actual: "Note",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "records[3] is Note, criteria[0] expects Task"
        );
    }
}
