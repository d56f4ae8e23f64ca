//! Draft Variant Layer
//!
//! The four supported specification drafts form a fixed progression:
//! draft4 -> draft6 -> draft7 -> draft2019-09. Each later draft is the
//! previous one plus a delta of keyword additions, removals, and behavior
//! overrides. Rather than an inheritance chain, a draft is a plain value
//! that parameterizes a single generic evaluator: the keyword dispatch
//! table for a draft is built once at evaluator construction by applying
//! the deltas in order (see [`table::DispatchTable`]).

mod table;

pub(crate) use table::{DispatchTable, Handler};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON Schema specification draft.
///
/// Ordered by publication: `Draft4 < Draft6 < Draft7 < Draft201909`.
/// Keyword availability and per-keyword behavior are resolved once per
/// evaluator construction, never per validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Draft {
    /// Draft 4 baseline: intentionally permissive on numeric bounds,
    /// `items`, and `pattern`.
    Draft4,
    /// Adds `const`, `contains`, boolean schema literals, and
    /// zero-fraction floats as integers.
    Draft6,
    /// Adds `if`/`then`/`else` and `dependencies`.
    Draft7,
    /// Bounded `contains`, `dependentRequired`/`dependentSchemas`,
    /// advisory `format`, and `unevaluatedProperties` tracking.
    #[serde(rename = "draft2019-09")]
    Draft201909,
}

impl Draft {
    /// All supported drafts, in progression order.
    pub const ALL: [Draft; 4] = [
        Draft::Draft4,
        Draft::Draft6,
        Draft::Draft7,
        Draft::Draft201909,
    ];

    /// The identifier keyword recognized by this draft.
    ///
    /// Consumed by external document-loading collaborators to recognize
    /// schema-local identifiers during reference-graph construction; the
    /// engine itself never parses raw text.
    pub fn dollar_id_token(self) -> &'static str {
        match self {
            Draft::Draft4 => "id",
            _ => "$id",
        }
    }

    /// Whether boolean literals are valid schema nodes under this draft.
    pub fn allows_boolean_schemas(self) -> bool {
        self >= Draft::Draft6
    }

    /// Builds the keyword dispatch table for this draft.
    pub(crate) fn dispatch_table(self) -> DispatchTable {
        let mut table = DispatchTable::draft4_base();
        if self >= Draft::Draft6 {
            table.apply_draft6_delta();
        }
        if self >= Draft::Draft7 {
            table.apply_draft7_delta();
        }
        if self >= Draft::Draft201909 {
            table.apply_draft2019_09_delta();
        }
        table
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Draft::Draft4 => write!(f, "draft4"),
            Draft::Draft6 => write!(f, "draft6"),
            Draft::Draft7 => write!(f, "draft7"),
            Draft::Draft201909 => write!(f, "draft2019-09"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drafts_are_ordered_by_progression() {
        assert!(Draft::Draft4 < Draft::Draft6);
        assert!(Draft::Draft6 < Draft::Draft7);
        assert!(Draft::Draft7 < Draft::Draft201909);
    }

    #[test]
    fn test_dollar_id_token() {
        assert_eq!(Draft::Draft4.dollar_id_token(), "id");
        assert_eq!(Draft::Draft6.dollar_id_token(), "$id");
        assert_eq!(Draft::Draft7.dollar_id_token(), "$id");
        assert_eq!(Draft::Draft201909.dollar_id_token(), "$id");
    }

    #[test]
    fn test_boolean_schemas_require_draft6() {
        assert!(!Draft::Draft4.allows_boolean_schemas());
        assert!(Draft::Draft6.allows_boolean_schemas());
        assert!(Draft::Draft201909.allows_boolean_schemas());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Draft::Draft4.to_string(), "draft4");
        assert_eq!(Draft::Draft201909.to_string(), "draft2019-09");
    }
}
