//! Object keyword handlers and the property evaluation tracker.
//!
//! Object validation runs in a fixed stage order because later stages
//! consume evaluation flags set by earlier ones:
//! `properties` -> `patternProperties` -> remaining object keywords ->
//! `additionalProperties` -> `unevaluatedProperties`.
//!
//! Under draft2019-09 an [`EvaluationRecord`] is built per object
//! validation: one flag per property key of the data object, set by any
//! keyword that legitimately accounted for that key. The record is an
//! explicit side table scoped to exactly one object validation; it never
//! leaks into nested objects, which build their own.

use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::draft::Handler;

use super::errors::{EvalError, EvalResult};
use super::evaluator::Evaluator;

/// Per-object-validation bookkeeping of which property keys have been
/// evaluated, consumed by `unevaluatedProperties`.
#[derive(Debug)]
pub(super) struct EvaluationRecord {
    flags: BTreeMap<String, bool>,
}

impl EvaluationRecord {
    /// One flag per property key, initialized false.
    fn for_object(object: &Map<String, Value>) -> Self {
        Self {
            flags: object.keys().map(|key| (key.clone(), false)).collect(),
        }
    }

    /// Marks one property key evaluated.
    fn mark(&mut self, key: &str) {
        if let Some(flag) = self.flags.get_mut(key) {
            *flag = true;
        }
    }

    /// Marks every property key evaluated (`additionalProperties`
    /// accounts for all remaining keys, matched or not).
    fn mark_all(&mut self) {
        for flag in self.flags.values_mut() {
            *flag = true;
        }
    }

    /// Keys no keyword has accounted for, in deterministic order.
    fn unevaluated(&self) -> Vec<String> {
        self.flags
            .iter()
            .filter(|(_, evaluated)| !**evaluated)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl Evaluator {
    /// Runs the object keyword group and the `additionalProperties` /
    /// `unevaluatedProperties` stages for one schema node.
    pub(super) fn validate_object_keywords(
        &mut self,
        data: &Value,
        schema: &Map<String, Value>,
    ) -> EvalResult<bool> {
        let table = Arc::clone(&self.table);
        let mut record = if table.tracks_evaluation {
            data.as_object().map(EvaluationRecord::for_object)
        } else {
            None
        };

        let mut valid = true;
        for (keyword, handler) in &table.object_handlers {
            if let Some(value) = schema.get(*keyword) {
                valid &= self.dispatch_object(*handler, data, value, record.as_mut())?;
            }
        }

        if let Some(additional) = schema.get("additionalProperties") {
            if let Some(record) = record.as_mut() {
                record.mark_all();
            }
            match data.as_object() {
                Some(object) => {
                    valid &= self.check_additional_properties(object, additional, schema)?;
                }
                None => {
                    valid &= self
                        .sink
                        .report("Use of additionalProperties to validate a non-object")?;
                }
            }
        }

        if table.tracks_evaluation {
            if let Some(subschema) = schema.get("unevaluatedProperties") {
                if let (Some(record), Some(object)) = (record.as_ref(), data.as_object()) {
                    for key in record.unevaluated() {
                        if let Some(value) = object.get(&key) {
                            valid &= self.validate_node(value, subschema)?;
                        }
                    }
                }
            }
        }

        Ok(valid)
    }

    fn dispatch_object(
        &mut self,
        handler: Handler,
        data: &Value,
        value: &Value,
        record: Option<&mut EvaluationRecord>,
    ) -> EvalResult<bool> {
        match handler {
            Handler::Properties => self.check_properties(data, value, record),
            Handler::PatternProperties => self.check_pattern_properties(data, value, record),
            Handler::Required => self.check_required(data, value),
            Handler::Dependencies => self.check_dependencies(data, value),
            Handler::DependentRequired => self.check_dependent_required(data, value),
            Handler::DependentSchemas => self.check_dependent_schemas(data, value),
            other => unreachable!("non-object keyword {:?} in object group", other),
        }
    }

    /// `properties`: each present property with a declared subschema is
    /// validated against it (and marked evaluated when tracking).
    fn check_properties(
        &mut self,
        data: &Value,
        properties: &Value,
        mut record: Option<&mut EvaluationRecord>,
    ) -> EvalResult<bool> {
        let declared = properties.as_object().ok_or_else(|| {
            EvalError::InvalidSchema("Properties schema must be an object".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => {
                return self
                    .sink
                    .report("Cannot validate properties on a non-object");
            }
        };
        let mut valid = true;
        for (key, value) in object {
            if let Some(subschema) = declared.get(key) {
                valid &= self.validate_node(value, subschema)?;
                if let Some(record) = record.as_deref_mut() {
                    record.mark(key);
                }
            }
        }
        Ok(valid)
    }

    /// `patternProperties`: permissive before draft2019-09; with
    /// evaluation tracking, every key matching a pattern is validated
    /// against that pattern's subschema and marked evaluated regardless
    /// of whether its value passes.
    fn check_pattern_properties(
        &mut self,
        data: &Value,
        patterns: &Value,
        mut record: Option<&mut EvaluationRecord>,
    ) -> EvalResult<bool> {
        if !self.table.tracks_evaluation {
            return Ok(true);
        }
        let declared = patterns.as_object().ok_or_else(|| {
            EvalError::InvalidSchema("patternProperties must be an object".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => {
                return self
                    .sink
                    .report("patternProperties will only validate against an object");
            }
        };
        let mut valid = true;
        for (pattern, subschema) in declared {
            let regex = compile_pattern(pattern)?;
            for (key, value) in object {
                if regex.is_match(key) {
                    valid &= self.validate_node(value, subschema)?;
                    if let Some(record) = record.as_deref_mut() {
                        record.mark(key);
                    }
                }
            }
        }
        Ok(valid)
    }

    /// `required`: every listed property name must be present. All names
    /// are checked so lazy mode surfaces each missing one.
    fn check_required(&mut self, data: &Value, names: &Value) -> EvalResult<bool> {
        let names = names.as_array().ok_or_else(|| {
            EvalError::InvalidSchema("Required must be a list of property names".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => return self.sink.report("Required schema requires an object"),
        };
        let mut valid = true;
        for name in names {
            let name = name.as_str().ok_or_else(|| {
                EvalError::InvalidSchema("Required property name must be a string".into())
            })?;
            if !object.contains_key(name) {
                valid &= self.sink.report(format!(
                    "The '{}' property is required but was missing",
                    name
                ))?;
            }
        }
        Ok(valid)
    }

    /// `dependencies` (draft7): per present property, either a list of
    /// further required names or a subschema the whole object must
    /// satisfy.
    fn check_dependencies(&mut self, data: &Value, dependencies: &Value) -> EvalResult<bool> {
        let dependencies = dependencies.as_object().ok_or_else(|| {
            EvalError::InvalidSchema("Dependencies must be an object".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => return Ok(true),
        };
        let mut valid = true;
        for (property, dependency) in dependencies {
            if !object.contains_key(property) {
                continue;
            }
            match dependency {
                Value::Array(names) => {
                    valid &= self.check_dependency_names(object, names)?;
                }
                Value::Object(_) | Value::Bool(_) => {
                    valid &= self.validate_node(data, dependency)?;
                }
                _ => {
                    return Err(EvalError::InvalidSchema(format!(
                        "The dependency for '{}' must be a list of property names or a schema",
                        property
                    )));
                }
            }
        }
        Ok(valid)
    }

    /// `dependentRequired` (draft2019-09): list-of-names form only.
    fn check_dependent_required(&mut self, data: &Value, dependencies: &Value) -> EvalResult<bool> {
        let dependencies = dependencies.as_object().ok_or_else(|| {
            EvalError::InvalidSchema("dependentRequired must be an object".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => return Ok(true),
        };
        let mut valid = true;
        for (property, dependency) in dependencies {
            let names = dependency.as_array().ok_or_else(|| {
                EvalError::InvalidSchema(format!(
                    "The dependentRequired value for '{}' must be a list of property names",
                    property
                ))
            })?;
            if object.contains_key(property) {
                valid &= self.check_dependency_names(object, names)?;
            }
        }
        Ok(valid)
    }

    /// `dependentSchemas` (draft2019-09): subschema form only.
    fn check_dependent_schemas(&mut self, data: &Value, dependencies: &Value) -> EvalResult<bool> {
        let dependencies = dependencies.as_object().ok_or_else(|| {
            EvalError::InvalidSchema("dependentSchemas must be an object".into())
        })?;
        let object = match data.as_object() {
            Some(object) => object,
            None => return Ok(true),
        };
        let mut valid = true;
        for (property, dependency) in dependencies {
            if !matches!(dependency, Value::Object(_) | Value::Bool(_)) {
                return Err(EvalError::InvalidSchema(format!(
                    "The dependentSchemas value for '{}' must be a schema",
                    property
                )));
            }
            if object.contains_key(property) {
                valid &= self.validate_node(data, dependency)?;
            }
        }
        Ok(valid)
    }

    fn check_dependency_names(
        &mut self,
        object: &Map<String, Value>,
        names: &[Value],
    ) -> EvalResult<bool> {
        let mut valid = true;
        for name in names {
            let name = name.as_str().ok_or_else(|| {
                EvalError::InvalidSchema("Dependency property name must be a string".into())
            })?;
            if !object.contains_key(name) {
                valid &= self.sink.report(format!(
                    "The '{}' property is required by a dependency but was missing",
                    name
                ))?;
            }
        }
        Ok(valid)
    }

    /// `additionalProperties`: applies to every key not declared in
    /// `properties` and not matching any `patternProperties` regex.
    /// Boolean forms short-circuit; a schema form validates each
    /// remaining value.
    fn check_additional_properties(
        &mut self,
        object: &Map<String, Value>,
        additional: &Value,
        schema: &Map<String, Value>,
    ) -> EvalResult<bool> {
        let declared = schema.get("properties").and_then(Value::as_object);
        let patterns = match schema.get("patternProperties").and_then(Value::as_object) {
            Some(map) => map
                .keys()
                .map(|pattern| compile_pattern(pattern))
                .collect::<EvalResult<Vec<Regex>>>()?,
            None => Vec::new(),
        };

        let mut valid = true;
        for (key, value) in object {
            if declared.map_or(false, |d| d.contains_key(key)) {
                continue;
            }
            if patterns.iter().any(|regex| regex.is_match(key)) {
                continue;
            }
            match additional {
                Value::Bool(true) => {}
                Value::Bool(false) => {
                    valid &= self.sink.report(format!(
                        "The property '{}' is not allowed by additionalProperties",
                        key
                    ))?;
                }
                subschema => {
                    valid &= self.validate_node(value, subschema)?;
                }
            }
        }
        Ok(valid)
    }
}

fn compile_pattern(pattern: &str) -> EvalResult<Regex> {
    Regex::new(pattern).map_err(|error| {
        EvalError::InvalidSchema(format!(
            "Invalid pattern '{}' in patternProperties: {}",
            pattern, error
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Draft;
    use crate::engine::ReportingMode;
    use serde_json::json;

    #[test]
    fn test_required_reports_every_missing_name_in_lazy_mode() {
        let schema = json!({"required": ["a", "b", "c"]});
        let mut evaluator =
            Evaluator::with_mode(schema, Draft::Draft4, ReportingMode::Lazy);
        assert_eq!(evaluator.validate(&json!({"b": 1})).unwrap(), false);
        assert_eq!(evaluator.errors().len(), 2);
    }

    #[test]
    fn test_required_against_non_object_fails() {
        let schema = json!({"required": ["a"]});
        let mut evaluator = Evaluator::new(schema, Draft::Draft4);
        assert!(evaluator.validate(&json!([1])).is_err());
    }

    #[test]
    fn test_required_name_must_be_string() {
        let schema = json!({"required": ["a", 2]});
        let mut evaluator = Evaluator::new(schema, Draft::Draft4);
        assert!(matches!(
            evaluator.validate(&json!({"a": 1})),
            Err(EvalError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_additional_properties_false_rejects_undeclared() {
        let schema = json!({
            "properties": {"a": {"type": "integer"}},
            "additionalProperties": false
        });
        for draft in Draft::ALL {
            let mut evaluator = Evaluator::new(schema.clone(), draft);
            assert_eq!(evaluator.validate(&json!({"a": 1})).unwrap(), true);
            assert!(evaluator.validate(&json!({"a": 1, "b": 2})).is_err());
        }
    }

    #[test]
    fn test_additional_properties_schema_validates_surplus_values() {
        let schema = json!({
            "properties": {"a": {}},
            "additionalProperties": {"type": "string"}
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft7);
        assert_eq!(
            evaluator.validate(&json!({"a": 1, "b": "ok"})).unwrap(),
            true
        );
        assert!(evaluator.validate(&json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_additional_properties_excludes_pattern_matches() {
        let schema = json!({
            "patternProperties": {"^x_": {}},
            "additionalProperties": false
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft7);
        assert_eq!(evaluator.validate(&json!({"x_a": 1})).unwrap(), true);
        assert!(evaluator.validate(&json!({"y_a": 1})).is_err());
    }

    #[test]
    fn test_pattern_properties_permissive_before_2019() {
        let schema = json!({"patternProperties": {"^n_": {"type": "integer"}}});
        let mut evaluator = Evaluator::new(schema.clone(), Draft::Draft7);
        assert_eq!(
            evaluator.validate(&json!({"n_a": "not an integer"})).unwrap(),
            true
        );
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert!(evaluator.validate(&json!({"n_a": "not an integer"})).is_err());
    }

    #[test]
    fn test_unevaluated_properties_consume_the_record() {
        let schema = json!({
            "properties": {"a": {}},
            "unevaluatedProperties": false
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!({"a": 1})).unwrap(), true);
        assert!(evaluator.validate(&json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_unevaluated_properties_after_pattern_properties() {
        let schema = json!({
            "patternProperties": {"^p_": {}},
            "unevaluatedProperties": {"type": "integer"}
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(
            evaluator
                .validate(&json!({"p_a": "anything", "other": 3}))
                .unwrap(),
            true
        );
        assert!(evaluator
            .validate(&json!({"p_a": "anything", "other": "x"}))
            .is_err());
    }

    #[test]
    fn test_additional_properties_marks_every_key_evaluated() {
        let schema = json!({
            "additionalProperties": {"type": "integer"},
            "unevaluatedProperties": false
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        // additionalProperties accounts for all keys, so
        // unevaluatedProperties: false sees none left over.
        assert_eq!(evaluator.validate(&json!({"a": 1, "b": 2})).unwrap(), true);
        assert!(evaluator.validate(&json!({"a": "x"})).is_err());
    }

    #[test]
    fn test_unevaluated_is_unknown_before_2019() {
        let schema = json!({
            "properties": {"a": {}},
            "unevaluatedProperties": false
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft7);
        assert_eq!(evaluator.validate(&json!({"a": 1, "b": 2})).unwrap(), true);
    }

    #[test]
    fn test_record_does_not_leak_into_nested_objects() {
        let schema = json!({
            "properties": {
                "outer": {
                    "properties": {"inner": {}},
                    "unevaluatedProperties": false
                }
            },
            "unevaluatedProperties": false
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(
            evaluator
                .validate(&json!({"outer": {"inner": 1}}))
                .unwrap(),
            true
        );
        // The nested object's surplus key fails on the nested record,
        // not the outer one.
        assert!(evaluator
            .validate(&json!({"outer": {"inner": 1, "extra": 2}}))
            .is_err());
    }

    #[test]
    fn test_dependencies_mixed_forms_draft7() {
        let schema = json!({
            "dependencies": {
                "a": ["b"],
                "c": {"required": ["d"]}
            }
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft7);
        assert_eq!(evaluator.validate(&json!({})).unwrap(), true);
        assert_eq!(evaluator.validate(&json!({"a": 1, "b": 2})).unwrap(), true);
        assert!(evaluator.validate(&json!({"a": 1})).is_err());
        assert_eq!(evaluator.validate(&json!({"c": 1, "d": 2})).unwrap(), true);
        assert!(evaluator.validate(&json!({"c": 1})).is_err());
    }

    #[test]
    fn test_dependent_required_enforces_list_form() {
        let schema = json!({"dependentRequired": {"a": ["b"]}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!({"a": 1, "b": 2})).unwrap(), true);
        assert!(evaluator.validate(&json!({"a": 1})).is_err());

        let schema = json!({"dependentRequired": {"a": {"required": ["b"]}}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert!(matches!(
            evaluator.validate(&json!({"a": 1})),
            Err(EvalError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_dependent_schemas_enforces_schema_form() {
        let schema = json!({"dependentSchemas": {"a": {"required": ["b"]}}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!({"a": 1, "b": 2})).unwrap(), true);
        assert!(evaluator.validate(&json!({"a": 1})).is_err());

        let schema = json!({"dependentSchemas": {"a": ["b"]}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert!(matches!(
            evaluator.validate(&json!({"a": 1})),
            Err(EvalError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_dependencies_unknown_under_2019() {
        let schema = json!({"dependencies": {"a": ["b"]}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!({"a": 1})).unwrap(), true);
    }

    #[test]
    fn test_invalid_pattern_is_schema_invalid() {
        let schema = json!({"patternProperties": {"(": {}}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert!(matches!(
            evaluator.validate(&json!({"a": 1})),
            Err(EvalError::InvalidSchema(_))
        ));
    }
}
