//! Filter criteria and their resolution against a schema.
//!
//! A [`Criterion`] is what a client sends: field name, operator token and
//! raw value text. [`Schema::resolve`] validates it and produces a
//! [`ResolvedCriterion`] bound to the field's accessor and to a
//! [`Comparator`] specialized for the field's kind and the operator.
//! Only resolved criteria can be evaluated.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::op::{NumericOp, Op, TextOp};
use crate::schema::{ErasedAccessor, Schema};
use crate::value::{FieldKind, KindClass, Literal, Value};

/// One field/operator/value condition, as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Criterion {
    pub field: String,
    /// Operator token, e.g. `"lte"` or `"less_equal"`.
    pub operator: String,
    /// Raw value text, coerced to the field's kind on resolution.
    pub value: String,
}

impl Criterion {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Criterion {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Creates a criterion from an [`Op`] rather than a token.
    pub fn with_op(field: impl Into<String>, op: Op, value: impl Into<String>) -> Self {
        Criterion::new(field, op.canonical(), value)
    }
}

/// Typed comparison bound to a coerced right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    Signed { op: NumericOp, rhs: i64 },
    Unsigned { op: NumericOp, rhs: u64 },
    Float { op: NumericOp, rhs: f64 },
    Text { op: TextOp, rhs: String },
}

impl Comparator {
    /// Evaluates `value <op> rhs`.
    ///
    /// Returns `None` when the value's variant does not belong to this
    /// comparator, which only happens if an accessor misreports its kind.
    pub fn test(&self, value: Value<'_>) -> Option<bool> {
        match (self, value) {
            (Comparator::Signed { op, rhs }, Value::Signed(lhs)) => Some(op.eval(lhs, *rhs)),
            (Comparator::Unsigned { op, rhs }, Value::Unsigned(lhs)) => Some(op.eval(lhs, *rhs)),
            (Comparator::Float { op, rhs }, Value::Float(lhs)) => Some(op.eval(lhs, *rhs)),
            (Comparator::Text { op, rhs }, Value::Text(lhs)) => Some(op.eval(lhs, rhs)),
            _ => None,
        }
    }

    fn bind(op: Op, literal: Literal) -> Option<Comparator> {
        let comparator = match literal {
            Literal::Signed(rhs) => Comparator::Signed {
                op: op.numeric()?,
                rhs,
            },
            Literal::Unsigned(rhs) => Comparator::Unsigned {
                op: op.numeric()?,
                rhs,
            },
            Literal::Float(rhs) => Comparator::Float {
                op: op.numeric()?,
                rhs,
            },
            Literal::Text(rhs) => Comparator::Text {
                op: op.textual()?,
                rhs,
            },
        };
        Some(comparator)
    }
}

/// A criterion validated against a specific schema.
#[derive(Clone)]
pub struct ResolvedCriterion {
    index: usize,
    field: String,
    kind: FieldKind,
    op: Op,
    comparator: Comparator,
    accessor: Arc<dyn ErasedAccessor>,
    record_type: TypeId,
    record_type_name: &'static str,
}

impl ResolvedCriterion {
    /// Position of this criterion in the request.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Kind of the bound field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub(crate) fn record_type(&self) -> TypeId {
        self.record_type
    }

    pub(crate) fn record_type_name(&self) -> &'static str {
        self.record_type_name
    }

    /// Reads the bound field from `record` and applies the comparator.
    ///
    /// `None` means `record` is not of the schema's record type, or the
    /// accessor returned a value outside the field's kind.
    pub(crate) fn test(&self, record: &dyn std::any::Any) -> Option<bool> {
        let value = self.accessor.read(record)?;
        self.comparator.test(value)
    }
}

impl std::fmt::Debug for ResolvedCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCriterion")
            .field("index", &self.index)
            .field("field", &self.field)
            .field("kind", &self.kind)
            .field("op", &self.op)
            .field("comparator", &self.comparator)
            .field("record", &self.record_type_name)
            .finish()
    }
}

/// Options applied while resolving criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolveOptions {
    pub trim_numeric: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions { trim_numeric: true }
    }
}

impl Schema {
    /// Validates one criterion at request position `index`.
    pub fn resolve_one(
        &self,
        index: usize,
        criterion: &Criterion,
    ) -> Result<ResolvedCriterion, ValidationError> {
        self.resolve_with(index, criterion, ResolveOptions::default())
    }

    /// Validates every criterion, stopping at the first failure.
    pub fn resolve(&self, criteria: &[Criterion]) -> Result<Vec<ResolvedCriterion>, ValidationError> {
        self.resolve_all(criteria, ResolveOptions::default())
    }

    pub(crate) fn resolve_all(
        &self,
        criteria: &[Criterion],
        options: ResolveOptions,
    ) -> Result<Vec<ResolvedCriterion>, ValidationError> {
        criteria
            .iter()
            .enumerate()
            .map(|(index, criterion)| self.resolve_with(index, criterion, options))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| tracing::debug!(error = %err, "criterion rejected"))
    }

    fn resolve_with(
        &self,
        index: usize,
        criterion: &Criterion,
        options: ResolveOptions,
    ) -> Result<ResolvedCriterion, ValidationError> {
        let field = &criterion.field;
        let descriptor = self
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField {
                index,
                field: field.clone(),
            })?;

        let op = Op::from_token(&criterion.operator).ok_or_else(|| {
            ValidationError::UnknownOperator {
                index,
                field: field.clone(),
                token: criterion.operator.clone(),
            }
        })?;

        let illegal = || ValidationError::IllegalOperator {
            index,
            field: field.clone(),
            op,
            allowed: descriptor.operators().to_vec(),
            message: descriptor.diagnostic().to_string(),
        };

        let accessor = match descriptor.accessor() {
            Some(accessor) if descriptor.allows(op) => Arc::clone(accessor),
            _ => return Err(illegal()),
        };

        let literal = coerce(descriptor.kind(), &criterion.value, options).map_err(|source| {
            ValidationError::ValueConversion {
                index,
                field: field.clone(),
                kind: descriptor.kind(),
                value: criterion.value.clone(),
                source,
            }
        })?;

        let comparator = Comparator::bind(op, literal).ok_or_else(illegal)?;

        Ok(ResolvedCriterion {
            index,
            field: field.clone(),
            kind: descriptor.kind(),
            op,
            comparator,
            accessor,
            record_type: self.record_type(),
            record_type_name: self.record_type_name(),
        })
    }
}

fn coerce(
    kind: FieldKind,
    raw: &str,
    options: ResolveOptions,
) -> Result<Literal, crate::value::CoerceError> {
    match kind.class() {
        KindClass::Integer | KindClass::Float if options.trim_numeric => kind.coerce(raw.trim()),
        _ => kind.coerce(raw),
    }
}
