//! Core evaluator: recursive `validate` and keyword dispatch.
//!
//! An [`Evaluator`] is bound at construction to one root schema, one
//! draft, one reporting mode, a format registry, and an optional remote
//! loader. Schema nodes are never mutated; the root is held behind an
//! `Arc` so it can be shared read-only across evaluator instances and so
//! resolved `$ref` targets can outlive a mutable borrow of the evaluator.
//!
//! Evaluation walks the schema tree, dispatching every keyword the bound
//! draft recognizes. Unknown keywords are ignored (schemas may carry
//! vendor extensions or annotations). A structurally invalid value for a
//! recognized keyword is a schema-invalid fault in both reporting modes.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::draft::{DispatchTable, Draft, Handler};
use crate::format::{FormatCheck, FormatRegistry};

use super::errors::{EvalError, EvalResult};
use super::reference::FileLoader;
use super::sink::{ErrorSink, ReportingMode};

/// A schema evaluator bound to one root schema and one draft variant.
///
/// Not safe to share across concurrent validations: the error sink and
/// in-flight evaluation records are per-instance state. Construction is
/// cheap; use one instance per concurrent validation and share the root
/// schema read-only.
pub struct Evaluator {
    pub(super) root: Arc<Value>,
    pub(super) draft: Draft,
    pub(super) table: Arc<DispatchTable>,
    pub(super) sink: ErrorSink,
    pub(super) formats: FormatRegistry,
    pub(super) file_loader: Option<FileLoader>,
}

impl Evaluator {
    /// Creates an eager-mode evaluator for the given root schema.
    pub fn new(schema: Value, draft: Draft) -> Self {
        Self::with_mode(schema, draft, ReportingMode::Eager)
    }

    /// Creates an evaluator with an explicit reporting mode.
    pub fn with_mode(schema: Value, draft: Draft, mode: ReportingMode) -> Self {
        Self {
            root: Arc::new(schema),
            draft,
            table: Arc::new(draft.dispatch_table()),
            sink: ErrorSink::new(mode),
            formats: FormatRegistry::with_builtins(),
            file_loader: None,
        }
    }

    /// The draft this evaluator was constructed for.
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// The reporting mode this evaluator was constructed for.
    pub fn mode(&self) -> ReportingMode {
        self.sink.mode()
    }

    /// The identifier keyword of the bound draft (`"$id"`, or `"id"` for
    /// draft4). Consumed by external document-loading collaborators.
    pub fn dollar_id_token(&self) -> &'static str {
        self.draft.dollar_id_token()
    }

    /// Registers or overrides a format checker.
    pub fn add_format<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.formats.register(name, check);
    }

    /// Registers the loader used to fetch remote `$ref` documents.
    ///
    /// Required only if a `$ref` carries a non-empty URI; its absence is
    /// then a fatal configuration fault.
    pub fn set_file_loader(&mut self, loader: FileLoader) {
        self.file_loader = Some(loader);
    }

    /// Validates data against the bound root schema.
    ///
    /// Eager mode: `Ok(true)` or `Err(ValidationFailed)` on the first
    /// failing keyword. Lazy mode: `Ok(verdict)`, with every independent
    /// failure retrievable through [`Evaluator::errors`]. Schema-invalid
    /// and configuration faults are returned as errors in both modes.
    pub fn validate(&mut self, data: &Value) -> EvalResult<bool> {
        let root = Arc::clone(&self.root);
        self.sink.reset();
        self.validate_node(data, &root)
    }

    /// Validates data against an explicit schema node.
    ///
    /// Local `$ref`s inside the node still resolve against the bound
    /// root schema.
    pub fn validate_with(&mut self, data: &Value, schema: &Value) -> EvalResult<bool> {
        self.sink.reset();
        self.validate_node(data, schema)
    }

    /// Validation failures accumulated by the last lazy-mode call.
    /// Always empty in eager mode.
    pub fn errors(&self) -> &[String] {
        self.sink.errors()
    }

    /// Advisory findings of the last call (format warnings under
    /// draft2019-09).
    pub fn warnings(&self) -> &[String] {
        self.sink.warnings()
    }

    /// Recursive evaluation of one schema node.
    ///
    /// Returns `Ok(true)` iff every invoked handler succeeded. In eager
    /// mode the first failing handler aborts with `ValidationFailed`; in
    /// lazy mode all applicable handlers run and failures accumulate.
    pub(super) fn validate_node(&mut self, data: &Value, schema: &Value) -> EvalResult<bool> {
        let schema_object = match schema {
            Value::Bool(literal) => {
                if !self.draft.allows_boolean_schemas() {
                    return Err(EvalError::InvalidSchema(format!(
                        "Boolean schemas are not valid under {}",
                        self.draft
                    )));
                }
                if *literal {
                    return Ok(true);
                }
                return self.sink.report("False schema always fails validation");
            }
            Value::Object(map) => map,
            other => {
                return Err(EvalError::InvalidSchema(format!(
                    "Schema must be an object{}, got {}",
                    if self.draft.allows_boolean_schemas() {
                        " or boolean"
                    } else {
                        ""
                    },
                    super::equality::json_type_name(other)
                )));
            }
        };

        // $ref short-circuits every sibling keyword.
        if let Some(reference) = schema_object.get("$ref") {
            return self.validate_reference(data, reference);
        }

        let table = Arc::clone(&self.table);
        let mut valid = true;
        for (keyword, handler) in table.assertions() {
            if let Some(value) = schema_object.get(*keyword) {
                valid &= self.dispatch(*handler, data, value, schema_object)?;
            }
        }
        valid &= self.validate_object_keywords(data, schema_object)?;
        Ok(valid)
    }

    /// Evaluates a schema in isolation: branch outcomes are observed as
    /// booleans and branch-local validation failures never reach the
    /// outer sink or the caller. Schema-invalid and configuration faults
    /// still propagate.
    pub(super) fn validate_branch(&mut self, data: &Value, schema: &Value) -> EvalResult<bool> {
        let saved = self.sink.begin_branch();
        let outcome = self.validate_node(data, schema);
        self.sink.end_branch(saved);
        match outcome {
            Err(EvalError::ValidationFailed(_)) => Ok(false),
            other => other,
        }
    }

    fn dispatch(
        &mut self,
        handler: Handler,
        data: &Value,
        value: &Value,
        schema: &Map<String, Value>,
    ) -> EvalResult<bool> {
        match handler {
            Handler::Type => self.check_type(data, value),
            Handler::Enum => self.check_enum(data, value),
            Handler::Const => self.check_const(data, value),
            Handler::MinLength => self.check_min_length(data, value),
            Handler::MaxLength => self.check_max_length(data, value),
            Handler::Format => self.check_format(data, value),
            Handler::FormatAdvisory => self.check_format_advisory(data, value),
            Handler::AllOf => self.check_all_of(data, value),
            Handler::AnyOf => self.check_any_of(data, value),
            Handler::OneOf => self.check_one_of(data, value),
            Handler::Not => self.check_not(data, value),
            Handler::IfThenElse => {
                self.check_if_then_else(data, value, schema.get("then"), schema.get("else"))
            }
            Handler::Contains => self.check_contains(data, value),
            Handler::ContainsBounded => self.check_contains_bounded(data, value, schema),
            // Deliberately permissive baseline keywords: recognized,
            // structurally accepted, never enforced in any supported
            // draft.
            Handler::Pattern
            | Handler::Minimum
            | Handler::Maximum
            | Handler::Items
            | Handler::MaxItems => Ok(true),
            // Object-group handlers are dispatched by
            // `validate_object_keywords`, which owns the evaluation
            // record.
            Handler::Properties
            | Handler::PatternProperties
            | Handler::Required
            | Handler::Dependencies
            | Handler::DependentRequired
            | Handler::DependentSchemas => unreachable!("object keyword in assertion groups"),
        }
    }

    pub(super) fn format_check(&self, name: &str) -> Option<FormatCheck> {
        self.formats.get(name)
    }
}
