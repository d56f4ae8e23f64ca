//! Combinator keyword handlers: `allOf`, `anyOf`, `oneOf`, `not`, and
//! `if`/`then`/`else`.
//!
//! Every branch runs as an isolated sub-evaluation whose boolean outcome
//! is inspected directly; branch-local validation failures never reach
//! the outer sink, so composing combinators with lazy reporting yields
//! the same verdict as eager mode. A schema-invalid fault inside a
//! branch is never local and always propagates. On failure a combinator
//! surfaces one consolidated message of its own.

use serde_json::Value;

use super::errors::{EvalError, EvalResult};
use super::evaluator::Evaluator;

impl Evaluator {
    /// `allOf`: every listed subschema must succeed.
    pub(super) fn check_all_of(&mut self, data: &Value, schemas: &Value) -> EvalResult<bool> {
        let schemas = Self::subschema_list(schemas, "allOf")?;
        let mut matched = 0;
        for subschema in schemas {
            if self.validate_branch(data, subschema)? {
                matched += 1;
            }
        }
        if matched != schemas.len() {
            return self.sink.report(format!(
                "The data matched only {} of the {} allOf schemas",
                matched,
                schemas.len()
            ));
        }
        Ok(true)
    }

    /// `anyOf`: at least one subschema must succeed.
    pub(super) fn check_any_of(&mut self, data: &Value, schemas: &Value) -> EvalResult<bool> {
        let schemas = Self::subschema_list(schemas, "anyOf")?;
        for subschema in schemas {
            if self.validate_branch(data, subschema)? {
                return Ok(true);
            }
        }
        self.sink.report(format!(
            "The data did not match any of the {} anyOf schemas",
            schemas.len()
        ))
    }

    /// `oneOf`: exactly one subschema must succeed. Every branch is
    /// evaluated so the actual count can be reported.
    pub(super) fn check_one_of(&mut self, data: &Value, schemas: &Value) -> EvalResult<bool> {
        let schemas = Self::subschema_list(schemas, "oneOf")?;
        let mut matched = 0;
        for subschema in schemas {
            if self.validate_branch(data, subschema)? {
                matched += 1;
            }
        }
        if matched != 1 {
            return self.sink.report(format!(
                "The data matched against {} schemas but was required to match exactly 1",
                matched
            ));
        }
        Ok(true)
    }

    /// `not`: the inner schema must fail.
    pub(super) fn check_not(&mut self, data: &Value, subschema: &Value) -> EvalResult<bool> {
        if self.validate_branch(data, subschema)? {
            return self
                .sink
                .report("The data matched against the schema when it was not supposed to");
        }
        Ok(true)
    }

    /// `if`/`then`/`else` (draft7+): the `if` outcome selects which of
    /// `then`/`else` applies; an absent branch means success. The chosen
    /// branch evaluates in the outer context, so its failures surface
    /// normally.
    pub(super) fn check_if_then_else(
        &mut self,
        data: &Value,
        if_schema: &Value,
        then_schema: Option<&Value>,
        else_schema: Option<&Value>,
    ) -> EvalResult<bool> {
        let branch = if self.validate_branch(data, if_schema)? {
            then_schema
        } else {
            else_schema
        };
        match branch {
            Some(subschema) => self.validate_node(data, subschema),
            None => Ok(true),
        }
    }

    fn subschema_list<'a>(schemas: &'a Value, keyword: &str) -> EvalResult<&'a Vec<Value>> {
        schemas.as_array().ok_or_else(|| {
            EvalError::InvalidSchema(format!("The {} value must be a list of schemas", keyword))
        })
    }
}
