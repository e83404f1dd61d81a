//! Filter configuration.

use crate::criterion::ResolveOptions;

/// How resolved criteria are applied to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// One pass per criterion, each over the survivors of the previous pass.
    #[default]
    Narrowing,
    /// One pass over the records, each record tested against the criteria
    /// in order and dropped at the first failure.
    PerRecord,
}

/// Options for a [`Filter`](crate::Filter).
///
/// # Example
///
/// ```
/// use strainer::{FilterConfig, Strategy};
///
/// let config = FilterConfig::new()
///     .strategy(Strategy::PerRecord)
///     .trim_numeric(false);
///
/// assert_eq!(config.get_strategy(), Strategy::PerRecord);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    strategy: Strategy,
    trim_numeric: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            strategy: Strategy::Narrowing,
            trim_numeric: true,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        FilterConfig::default()
    }

    /// Sets the evaluation strategy. Both strategies match the same records.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Strips surrounding whitespace from numeric value text before
    /// parsing. Text values are never trimmed.
    pub fn trim_numeric(mut self, trim: bool) -> Self {
        self.trim_numeric = trim;
        self
    }

    pub fn get_strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn get_trim_numeric(&self) -> bool {
        self.trim_numeric
    }

    pub(crate) fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            trim_numeric: self.trim_numeric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.get_strategy(), Strategy::Narrowing);
        assert!(config.get_trim_numeric());
        assert!(config.resolve_options().trim_numeric);
    }

    #[test]
    fn builder_overrides() {
        let config = FilterConfig::new().trim_numeric(false);
        assert!(!config.resolve_options().trim_numeric);
    }
}
