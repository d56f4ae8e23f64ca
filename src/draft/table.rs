//! Keyword dispatch tables.
//!
//! A [`DispatchTable`] maps keyword names to handler tags, grouped by the
//! kind of data the keyword is meaningful against: type assertions, value
//! assertions, combinators, array keywords, and object keywords. A draft
//! delta can replace or remove entries in one group without re-deriving
//! the rest. Tables are instance-local state of an evaluator, built once
//! at construction; evaluators with different drafts or format registries
//! never interfere.
//!
//! `additionalProperties` and `unevaluatedProperties` are not table
//! entries: they run as explicit post-table stages of object validation
//! because they depend on sibling keywords and on evaluation-record flags
//! set by earlier stages.

/// Handler tag for a recognized keyword.
///
/// Dispatch is a `match` on this tag inside the evaluator; a draft delta
/// overrides a keyword's behavior by swapping the tag its name maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    Type,
    Enum,
    Const,
    MinLength,
    MaxLength,
    /// Accepted but unenforced in every supported draft.
    Pattern,
    /// Accepted but unenforced in every supported draft.
    Minimum,
    /// Accepted but unenforced in every supported draft.
    Maximum,
    /// Assertion when a checker is registered (pre-2019 drafts).
    Format,
    /// Advisory only: failures are warnings, never errors (2019-09).
    FormatAdvisory,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    IfThenElse,
    /// Accepted but unenforced in every supported draft.
    Items,
    /// Accepted but unenforced in every supported draft.
    MaxItems,
    /// At least one array element matches (draft6/draft7).
    Contains,
    /// `minContains`/`maxContains` aware form (2019-09).
    ContainsBounded,
    Properties,
    PatternProperties,
    Required,
    /// Mixed list-of-names or subschema per property (draft7).
    Dependencies,
    /// List-of-names form only (2019-09).
    DependentRequired,
    /// Subschema form only (2019-09).
    DependentSchemas,
}

/// Keyword dispatch table for one draft.
#[derive(Debug, Clone)]
pub(crate) struct DispatchTable {
    pub type_handlers: Vec<(&'static str, Handler)>,
    pub value_handlers: Vec<(&'static str, Handler)>,
    pub combinator_handlers: Vec<(&'static str, Handler)>,
    pub array_handlers: Vec<(&'static str, Handler)>,
    pub object_handlers: Vec<(&'static str, Handler)>,
    /// Whether object validation builds an evaluation record and honors
    /// `unevaluatedProperties` (2019-09 only).
    pub tracks_evaluation: bool,
}

impl DispatchTable {
    /// The draft4 baseline keyword set.
    pub fn draft4_base() -> Self {
        Self {
            type_handlers: vec![("type", Handler::Type)],
            value_handlers: vec![
                ("enum", Handler::Enum),
                ("minLength", Handler::MinLength),
                ("maxLength", Handler::MaxLength),
                ("pattern", Handler::Pattern),
                ("minimum", Handler::Minimum),
                ("maximum", Handler::Maximum),
                ("format", Handler::Format),
            ],
            combinator_handlers: vec![
                ("allOf", Handler::AllOf),
                ("anyOf", Handler::AnyOf),
                ("oneOf", Handler::OneOf),
                ("not", Handler::Not),
            ],
            array_handlers: vec![
                ("items", Handler::Items),
                ("maxItems", Handler::MaxItems),
            ],
            object_handlers: vec![
                ("properties", Handler::Properties),
                ("patternProperties", Handler::PatternProperties),
                ("required", Handler::Required),
            ],
            tracks_evaluation: false,
        }
    }

    /// draft6: `const` and `contains` join the keyword set. The other
    /// draft6 changes (boolean schemas, zero-fraction integers, boolean
    /// `additionalProperties`) are behavior switches on the draft value,
    /// not table entries.
    pub fn apply_draft6_delta(&mut self) {
        self.value_handlers.push(("const", Handler::Const));
        self.array_handlers.push(("contains", Handler::Contains));
    }

    /// draft7: `if`/`then`/`else` and `dependencies`.
    pub fn apply_draft7_delta(&mut self) {
        self.combinator_handlers.push(("if", Handler::IfThenElse));
        self.object_handlers.push(("dependencies", Handler::Dependencies));
    }

    /// draft2019-09: bounded `contains`, split dependency keywords,
    /// advisory `format`, and evaluation tracking.
    pub fn apply_draft2019_09_delta(&mut self) {
        Self::remove(&mut self.array_handlers, "contains");
        self.array_handlers.push(("contains", Handler::ContainsBounded));

        Self::remove(&mut self.object_handlers, "dependencies");
        self.object_handlers
            .push(("dependentRequired", Handler::DependentRequired));
        self.object_handlers
            .push(("dependentSchemas", Handler::DependentSchemas));

        Self::swap(&mut self.value_handlers, "format", Handler::FormatAdvisory);
        self.tracks_evaluation = true;
    }

    /// Iterates the non-object assertion groups in dispatch order.
    pub fn assertions(&self) -> impl Iterator<Item = &(&'static str, Handler)> {
        self.type_handlers
            .iter()
            .chain(&self.value_handlers)
            .chain(&self.combinator_handlers)
            .chain(&self.array_handlers)
    }

    fn remove(handlers: &mut Vec<(&'static str, Handler)>, keyword: &str) {
        handlers.retain(|(name, _)| *name != keyword);
    }

    fn swap(handlers: &mut Vec<(&'static str, Handler)>, keyword: &str, replacement: Handler) {
        for entry in handlers.iter_mut() {
            if entry.0 == keyword {
                entry.1 = replacement;
            }
        }
    }
}
