//! Schema construction.
//!
//! A [`Schema`] is built once from a sample record. For each field that
//! carries filter metadata it stores the field's kind, the whitelist of
//! legal operators, a bound accessor, and a ready-made diagnostic. The
//! schema is immutable after construction and can be shared freely across
//! threads.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaBuildError;
use crate::op::Op;
use crate::record::{Accessor, FieldDef, Record, RecordShape};
use crate::value::{FieldKind, KindClass, Value};

/// Type-erased field reader bound to one record type.
pub(crate) trait ErasedAccessor: Send + Sync {
    /// Reads the field, or `None` if `record` is not the bound type.
    fn read<'a>(&self, record: &'a dyn Any) -> Option<Value<'a>>;
}

struct TypedAccessor<R> {
    get: Accessor<R>,
}

impl<R: Record> ErasedAccessor for TypedAccessor<R> {
    fn read<'a>(&self, record: &'a dyn Any) -> Option<Value<'a>> {
        record.downcast_ref::<R>().map(self.get)
    }
}

/// Compiled metadata for one field.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    operators: Vec<Op>,
    diagnostic: String,
    accessor: Option<Arc<dyn ErasedAccessor>>,
}

impl FieldDescriptor {
    /// Returns the query name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Legal operators, in declaration order.
    pub fn operators(&self) -> &[Op] {
        &self.operators
    }

    /// Returns `true` if `op` is legal on this field.
    pub fn allows(&self, op: Op) -> bool {
        self.operators.contains(&op)
    }

    /// Message listing this field's legal operators.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// Returns `true` if any operator is legal on this field.
    pub fn is_searchable(&self) -> bool {
        !self.operators.is_empty() && self.accessor.is_some()
    }

    pub(crate) fn accessor(&self) -> Option<&Arc<dyn ErasedAccessor>> {
        self.accessor.as_ref()
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.operators == other.operators
            && self.diagnostic == other.diagnostic
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("operators", &self.operators)
            .finish_non_exhaustive()
    }
}

/// Immutable field metadata for one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    record_type: TypeId,
    type_name: &'static str,
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    /// Builds a schema from a sample record.
    ///
    /// Fails if the sample is not record-shaped, if a declared operator
    /// token is unknown, or if a declared operator is illegal for the
    /// field's type class. Unsupported field kinds are kept with an empty
    /// operator set.
    pub fn build<R: Record>(sample: &R) -> Result<Schema, SchemaBuildError> {
        let type_name = sample.type_name();
        let defs = match sample.describe() {
            RecordShape::Struct(defs) => defs,
            RecordShape::Opaque => return Err(SchemaBuildError::NotARecord { type_name }),
        };

        let mut fields = BTreeMap::new();
        for def in defs {
            if fields.contains_key(def.name) {
                return Err(SchemaBuildError::DuplicateField {
                    field: def.name.to_string(),
                });
            }
            let descriptor = compile_field(def)?;
            fields.insert(descriptor.name.clone(), descriptor);
        }

        tracing::debug!(record = type_name, fields = fields.len(), "schema built");

        Ok(Schema {
            record_type: TypeId::of::<R>(),
            type_name,
            fields,
        })
    }

    /// Identity of the record type this schema was built from.
    pub fn record_type(&self) -> TypeId {
        self.record_type
    }

    pub fn record_type_name(&self) -> &'static str {
        self.type_name
    }

    /// Looks up a field by query name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Iterates fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn compile_field<R: Record>(def: FieldDef<R>) -> Result<FieldDescriptor, SchemaBuildError> {
    let class = def.kind.class();
    let mut operators: Vec<Op> = Vec::new();
    let mut seen_tokens: Vec<&str> = Vec::new();

    for token in def.operators.split(',').map(str::trim) {
        if token.is_empty() || seen_tokens.contains(&token) {
            continue;
        }
        seen_tokens.push(token);

        let op = Op::from_token(token).ok_or_else(|| SchemaBuildError::UnknownOperator {
            field: def.name.to_string(),
            token: token.to_string(),
        })?;

        let legal = match class {
            KindClass::Integer | KindClass::Float => op.numeric().is_some(),
            KindClass::Text => op.textual().is_some(),
            // Not searchable, but not an error either.
            KindClass::Unsupported => continue,
        };
        if !legal {
            return Err(SchemaBuildError::OperatorNotAllowed {
                field: def.name.to_string(),
                kind: def.kind,
                op,
            });
        }
        // Distinct aliases of one operator collapse to a single entry.
        if !operators.contains(&op) {
            operators.push(op);
        }
    }

    let accessor = match (class, def.accessor) {
        (KindClass::Unsupported, _) => {
            operators.clear();
            None
        }
        (_, None) => {
            return Err(SchemaBuildError::MissingAccessor {
                field: def.name.to_string(),
            })
        }
        (_, Some(_)) if operators.is_empty() => {
            return Err(SchemaBuildError::NoOperators {
                field: def.name.to_string(),
                kind: def.kind,
            })
        }
        (_, Some(get)) => Some(Arc::new(TypedAccessor { get }) as Arc<dyn ErasedAccessor>),
    };

    let names: Vec<&str> = operators.iter().map(|op| op.display_name()).collect();
    let diagnostic = format!(
        "field({}) only supports operators: {}",
        def.name,
        names.join("/")
    );

    Ok(FieldDescriptor {
        name: def.name.to_string(),
        kind: def.kind,
        operators,
        diagnostic,
        accessor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    struct Sample {
        a: i32,
        ratio: f64,
        label: String,
        tags: Vec<String>,
    }

    fn read_a(s: &Sample) -> Value<'_> {
        Value::Signed(s.a.into())
    }

    fn read_ratio(s: &Sample) -> Value<'_> {
        Value::Float(s.ratio)
    }

    fn read_label(s: &Sample) -> Value<'_> {
        Value::Text(&s.label)
    }

    impl Record for Sample {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn describe(&self) -> RecordShape<Self> {
            RecordShape::Struct(vec![
                FieldDef::new(
                    "a",
                    FieldKind::I32,
                    "lt, lte,eq,lt",
                    Some(read_a as Accessor<Sample>),
                ),
                FieldDef::new(
                    "ratio",
                    FieldKind::F64,
                    "gt,gte",
                    Some(read_ratio as Accessor<Sample>),
                ),
                FieldDef::new(
                    "label",
                    FieldKind::Text,
                    "c,contain,eq,nc",
                    Some(read_label as Accessor<Sample>),
                ),
                FieldDef::new("tags", FieldKind::Unsupported, "eq,c", None),
            ])
        }
    }

    fn sample() -> Sample {
        Sample {
            a: 1,
            ratio: 0.5,
            label: "x".into(),
            tags: vec![],
        }
    }

    #[test]
    fn builds_operator_sets() {
        let schema = Schema::build(&sample()).unwrap();
        assert_eq!(schema.len(), 4);

        let a = schema.field("a").unwrap();
        assert_eq!(a.operators(), &[Op::LessThan, Op::LessEqual, Op::Equal]);
        assert!(a.is_searchable());

        let label = schema.field("label").unwrap();
        assert_eq!(
            label.operators(),
            &[Op::Contains, Op::Equal, Op::NotContains]
        );
    }

    #[test]
    fn unsupported_fields_get_empty_set() {
        let schema = Schema::build(&sample()).unwrap();
        let tags = schema.field("tags").unwrap();
        assert!(tags.operators().is_empty());
        assert!(!tags.is_searchable());
        assert_eq!(tags.kind(), FieldKind::Unsupported);
    }

    #[test]
    fn diagnostic_lists_display_names() {
        let schema = Schema::build(&sample()).unwrap();
        assert_eq!(
            schema.field("label").unwrap().diagnostic(),
            "field(label) only supports operators: contains/equal/not contain"
        );
        assert_eq!(
            schema.field("ratio").unwrap().diagnostic(),
            "field(ratio) only supports operators: greater than/greater than or equal"
        );
    }

    #[test]
    fn build_is_deterministic() {
        let first = Schema::build(&sample()).unwrap();
        let second = Schema::build(&sample()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.record_type(), TypeId::of::<Sample>());
    }

    #[test]
    fn scalar_is_not_a_record() {
        let err = Schema::build(&42u32).unwrap_err();
        assert!(matches!(err, SchemaBuildError::NotARecord { type_name } if type_name == "u32"));
    }

    struct Manual {
        defs: fn() -> Vec<FieldDef<Manual>>,
    }

    fn read_manual(_: &Manual) -> Value<'_> {
        Value::Signed(0)
    }

    impl Record for Manual {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn describe(&self) -> RecordShape<Self> {
            RecordShape::Struct((self.defs)())
        }
    }

    fn manual(defs: fn() -> Vec<FieldDef<Manual>>) -> Result<Schema, SchemaBuildError> {
        Schema::build(&Manual { defs })
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err = manual(|| {
            vec![
                FieldDef::new("n", FieldKind::I64, "lt", Some(read_manual as Accessor<Manual>)),
                FieldDef::new("n", FieldKind::I64, "gt", Some(read_manual as Accessor<Manual>)),
            ]
        })
        .unwrap_err();
        assert_eq!(err, SchemaBuildError::DuplicateField { field: "n".into() });
    }

    #[test]
    fn supported_field_needs_operators() {
        let err = manual(|| {
            vec![FieldDef::new(
                "n",
                FieldKind::I64,
                " , ",
                Some(read_manual as Accessor<Manual>),
            )]
        })
        .unwrap_err();
        assert_eq!(
            err,
            SchemaBuildError::NoOperators {
                field: "n".into(),
                kind: FieldKind::I64,
            }
        );
        assert_eq!(err.to_string(), "field(n) is i64 type but declares no operators");
    }

    #[test]
    fn supported_field_needs_accessor() {
        let err = manual(|| vec![FieldDef::new("n", FieldKind::I64, "lt", None)]).unwrap_err();
        assert_eq!(err, SchemaBuildError::MissingAccessor { field: "n".into() });
    }

    #[test]
    fn unsupported_field_may_declare_nothing() {
        let schema = manual(|| vec![FieldDef::new("n", FieldKind::Unsupported, "", None)]).unwrap();
        assert!(schema.field("n").unwrap().operators().is_empty());
    }

    #[test]
    fn accessor_rejects_foreign_type() {
        let schema = Schema::build(&sample()).unwrap();
        let accessor = schema.field("a").unwrap().accessor().unwrap();
        assert_eq!(accessor.read(&sample()), Some(Value::Signed(1)));
        assert_eq!(accessor.read(&7i32), None);
    }
}
