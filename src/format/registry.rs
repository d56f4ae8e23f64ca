//! Format checker registry and chrono-backed built-ins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::Value;

/// A format predicate: true when the value conforms.
///
/// Checkers receive the raw data value; the built-ins treat non-string
/// data as conforming, since string formats do not constrain other
/// types.
pub type FormatCheck = Arc<dyn Fn(&Value) -> bool>;

/// Registry of named format checkers.
///
/// Instance-local state of an evaluator; registering a checker on one
/// evaluator never affects another. Cloning shares the checker closures.
#[derive(Clone)]
pub struct FormatRegistry {
    checks: HashMap<String, FormatCheck>,
}

impl FormatRegistry {
    /// An empty registry with no checkers at all.
    pub fn empty() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// A registry with the built-in `date-time`, `date`, and `time`
    /// checkers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("date-time", |value: &Value| {
            with_str(value, |s| DateTime::parse_from_rfc3339(s).is_ok())
        });
        registry.register("date", |value: &Value| {
            with_str(value, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
        });
        registry.register("time", |value: &Value| {
            with_str(value, |s| NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok())
        });
        registry
    }

    /// Registers or overrides the checker for a format name.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.checks.insert(name.into(), Arc::new(check));
    }

    /// Looks up the checker for a format name.
    pub fn get(&self, name: &str) -> Option<FormatCheck> {
        self.checks.get(name).cloned()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn with_str(value: &Value, check: impl Fn(&str) -> bool) -> bool {
    match value.as_str() {
        Some(s) => check(s),
        None => true,
    }
}
