//! Applying resolved criteria to record collections.
//!
//! Criteria combine with AND. Every record is checked against the record
//! type of each criterion's schema before the criterion is evaluated on
//! it; a record of another type aborts the call.

use crate::config::{FilterConfig, Strategy};
use crate::criterion::{Criterion, ResolvedCriterion};
use crate::error::{ExecutionError, Result};
use crate::record::Record;
use crate::schema::Schema;

/// Applies resolved criteria to borrowed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Executor {
    strategy: Strategy,
}

impl Executor {
    pub fn new(strategy: Strategy) -> Self {
        Executor { strategy }
    }

    /// Returns the records that satisfy every criterion, in input order.
    ///
    /// An empty collection yields an empty result; an empty criteria list
    /// yields the input unchanged.
    pub fn apply<'a, T>(
        &self,
        criteria: &[ResolvedCriterion],
        records: &[&'a T],
    ) -> Result<Vec<&'a T>, ExecutionError>
    where
        T: Record + ?Sized,
    {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        if criteria.is_empty() {
            return Ok(records.to_vec());
        }

        let indexed = records.iter().copied().enumerate();
        let matched = match self.strategy {
            Strategy::Narrowing => narrow(criteria, indexed.collect())?,
            Strategy::PerRecord => per_record(criteria, indexed)?,
        };
        Ok(matched.into_iter().map(|(_, record)| record).collect())
    }
}

fn narrow<'a, T>(
    criteria: &[ResolvedCriterion],
    mut current: Vec<(usize, &'a T)>,
) -> Result<Vec<(usize, &'a T)>, ExecutionError>
where
    T: Record + ?Sized,
{
    for criterion in criteria {
        let before = current.len();
        let mut kept = Vec::with_capacity(before);
        for (position, record) in current {
            if evaluate(criterion, position, record)? {
                kept.push((position, record));
            }
        }
        tracing::trace!(
            criterion = criterion.index(),
            field = criterion.field(),
            before,
            after = kept.len(),
            "narrowing pass"
        );
        current = kept;
    }
    Ok(current)
}

fn per_record<'a, T>(
    criteria: &[ResolvedCriterion],
    records: impl Iterator<Item = (usize, &'a T)>,
) -> Result<Vec<(usize, &'a T)>, ExecutionError>
where
    T: Record + ?Sized + 'a,
{
    let mut kept = Vec::new();
    'records: for (position, record) in records {
        for criterion in criteria {
            check_identity(criterion, position, record)?;
        }
        for criterion in criteria {
            if !evaluate(criterion, position, record)? {
                continue 'records;
            }
        }
        kept.push((position, record));
    }
    Ok(kept)
}

fn check_identity<T>(
    criterion: &ResolvedCriterion,
    position: usize,
    record: &T,
) -> Result<(), ExecutionError>
where
    T: Record + ?Sized,
{
    if record.as_any().type_id() == criterion.record_type() {
        Ok(())
    } else {
        Err(mismatch(criterion, position, record))
    }
}

fn evaluate<T>(criterion: &ResolvedCriterion, position: usize, record: &T) -> Result<bool, ExecutionError>
where
    T: Record + ?Sized,
{
    check_identity(criterion, position, record)?;
    criterion
        .test(record.as_any())
        .ok_or_else(|| ExecutionError::AccessorMismatch {
            position,
            criterion: criterion.index(),
            field: criterion.field().to_string(),
            kind: criterion.kind(),
        })
}

fn mismatch<T>(criterion: &ResolvedCriterion, position: usize, record: &T) -> ExecutionError
where
    T: Record + ?Sized,
{
    ExecutionError::TypeMismatch {
        position,
        criterion: criterion.index(),
        expected: criterion.record_type_name(),
        actual: record.type_name(),
    }
}

/// A schema paired with a configuration: validates criteria and applies
/// them in one call.
///
/// # Example
///
/// ```
/// use strainer::{Criterion, Filter, Record, Schema};
///
/// #[derive(Record)]
/// struct Task {
///     #[filter(ops = "lt,lte,eq,gte,gt,neq")]
///     priority: i32,
///     #[filter(ops = "c,eq,neq,nc")]
///     title: String,
/// }
///
/// let tasks = vec![
///     Task { priority: 1, title: "write docs".into() },
///     Task { priority: 5, title: "fix bug".into() },
/// ];
/// let schema = Schema::build(&tasks[0]).unwrap();
///
/// let matched = Filter::new(&schema)
///     .filter_slice(&[Criterion::new("priority", "gte", "3")], &tasks)
///     .unwrap();
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].title, "fix bug");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Filter<'s> {
    schema: &'s Schema,
    config: FilterConfig,
}

impl<'s> Filter<'s> {
    /// Creates a filter with the default configuration.
    pub fn new(schema: &'s Schema) -> Self {
        Filter::with_config(schema, FilterConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: FilterConfig) -> Self {
        Filter { schema, config }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Validates `criteria` against the schema and applies them to
    /// `records`. Validation fails fast on the first bad criterion.
    pub fn filter<'a, T>(&self, criteria: &[Criterion], records: &[&'a T]) -> Result<Vec<&'a T>>
    where
        T: Record + ?Sized,
    {
        let resolved = self
            .schema
            .resolve_all(criteria, self.config.resolve_options())?;
        let matched = Executor::new(self.config.get_strategy()).apply(&resolved, records)?;
        tracing::debug!(
            record = self.schema.record_type_name(),
            criteria = resolved.len(),
            input = records.len(),
            matched = matched.len(),
            "filter applied"
        );
        Ok(matched)
    }

    /// Like [`filter`](Self::filter), over an owned slice of records.
    pub fn filter_slice<'a, R: Record>(
        &self,
        criteria: &[Criterion],
        records: &'a [R],
    ) -> Result<Vec<&'a R>> {
        let refs: Vec<&'a R> = records.iter().collect();
        self.filter(criteria, &refs)
    }

    /// Counts matching records.
    pub fn count<T>(&self, criteria: &[Criterion], records: &[&T]) -> Result<usize>
    where
        T: Record + ?Sized,
    {
        self.filter(criteria, records).map(|matched| matched.len())
    }
}

/// Validates `criteria` against `schema` and applies them to `records`
/// with the default configuration.
pub fn filter<'a, T>(schema: &Schema, criteria: &[Criterion], records: &[&'a T]) -> Result<Vec<&'a T>>
where
    T: Record + ?Sized,
{
    Filter::new(schema).filter(criteria, records)
}
