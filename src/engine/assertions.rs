//! Type, value, and array keyword handlers.
//!
//! Handlers report data failures through the error sink and raise
//! schema-invalid faults directly. A handler invoked against data of an
//! inapplicable kind (e.g. `minLength` against a number) reports a
//! validation failure, matching the baseline's strictness.

use serde_json::{Map, Value};

use crate::draft::Draft;

use super::equality::json_equal;
use super::errors::{EvalError, EvalResult};
use super::evaluator::Evaluator;

impl Evaluator {
    /// `type`: the value must be a single recognized type name.
    pub(super) fn check_type(&mut self, data: &Value, type_value: &Value) -> EvalResult<bool> {
        let type_name = type_value.as_str().ok_or_else(|| {
            EvalError::InvalidSchema(format!("Unknown type '{}'", type_value))
        })?;
        match type_name {
            "null" => {
                if !data.is_null() {
                    return self.sink.report("Data type was not null");
                }
            }
            "number" => {
                if !data.is_number() {
                    return self.sink.report("Data was not a number");
                }
            }
            "integer" => return self.check_type_integer(data),
            "string" => {
                if !data.is_string() {
                    return self.sink.report("Data was not a string");
                }
            }
            "array" => {
                if !data.is_array() {
                    return self.sink.report("Data was not a array");
                }
            }
            "object" => {
                if !data.is_object() {
                    return self.sink.report("Data was not a object");
                }
            }
            other => {
                return Err(EvalError::InvalidSchema(format!("Unknown type '{}'", other)));
            }
        }
        Ok(true)
    }

    /// Draft4 accepts only integer-typed values; draft6+ also accepts a
    /// float whose fractional part is exactly zero.
    fn check_type_integer(&mut self, data: &Value) -> EvalResult<bool> {
        let number = match data {
            Value::Number(n) => n,
            _ => {
                return self
                    .sink
                    .report(format!("The value '{}' is not an integer", data));
            }
        };
        if number.is_i64() || number.is_u64() {
            return Ok(true);
        }
        if self.draft >= Draft::Draft6 {
            if let Some(float) = number.as_f64() {
                if float.fract() == 0.0 {
                    return Ok(true);
                }
            }
        }
        self.sink
            .report(format!("The value '{}' is not an integer", data))
    }

    /// `enum`: membership by deep equality.
    pub(super) fn check_enum(&mut self, data: &Value, enum_value: &Value) -> EvalResult<bool> {
        let allowed = enum_value.as_array().ok_or_else(|| {
            EvalError::InvalidSchema("The enum restriction must be a list of values".into())
        })?;
        if !allowed.iter().any(|candidate| json_equal(data, candidate)) {
            return self.sink.report(format!(
                "The value '{}' was not in the enumerated list of allowed values",
                data
            ));
        }
        Ok(true)
    }

    /// `const` (draft6+): deep equality with numeric cross-type
    /// tolerance; booleans never equal numbers.
    pub(super) fn check_const(&mut self, data: &Value, const_value: &Value) -> EvalResult<bool> {
        if !json_equal(data, const_value) {
            return self.sink.report(format!(
                "The data value '{}' was not the const value '{}'",
                data, const_value
            ));
        }
        Ok(true)
    }

    pub(super) fn check_min_length(&mut self, data: &Value, length: &Value) -> EvalResult<bool> {
        let minimum = length.as_u64().ok_or_else(|| {
            EvalError::InvalidSchema("The minLength value must be an integer".into())
        })?;
        let text = match data.as_str() {
            Some(s) => s,
            None => return self.sink.report("The data for minLength was not a string"),
        };
        let count = text.chars().count() as u64;
        if count < minimum {
            return self.sink.report(format!(
                "The data length {} was less than the minimum {}",
                count, minimum
            ));
        }
        Ok(true)
    }

    pub(super) fn check_max_length(&mut self, data: &Value, length: &Value) -> EvalResult<bool> {
        let maximum = length.as_u64().ok_or_else(|| {
            EvalError::InvalidSchema("The maxLength value must be an integer".into())
        })?;
        let text = match data.as_str() {
            Some(s) => s,
            None => {
                return self
                    .sink
                    .report(format!("Cannot determine length of non-string '{}'", data));
            }
        };
        let count = text.chars().count() as u64;
        if count > maximum {
            return self.sink.report(format!(
                "Length of '{}' is more than maximum {}",
                text, maximum
            ));
        }
        Ok(true)
    }

    /// `format` as an assertion (pre-2019 drafts): consulted only when a
    /// checker is registered for the named format.
    pub(super) fn check_format(&mut self, data: &Value, format_value: &Value) -> EvalResult<bool> {
        let name = format_value.as_str().ok_or_else(|| {
            EvalError::InvalidSchema("The format value must be a string".into())
        })?;
        if let Some(check) = self.format_check(name) {
            if !check(data) {
                return self.sink.report(format!(
                    "The value '{}' did not conform to the '{}' format",
                    data, name
                ));
            }
        }
        Ok(true)
    }

    /// `format` under draft2019-09: purely advisory. A non-conforming
    /// value is recorded as a warning and never fails validation.
    pub(super) fn check_format_advisory(
        &mut self,
        data: &Value,
        format_value: &Value,
    ) -> EvalResult<bool> {
        let name = format_value.as_str().ok_or_else(|| {
            EvalError::InvalidSchema("The format value must be a string".into())
        })?;
        if let Some(check) = self.format_check(name) {
            if !check(data) {
                self.sink
                    .warn(format!("String '{}' didn't conform to format {}", data, name));
            }
        }
        Ok(true)
    }

    /// `contains` (draft6/draft7): at least one element matches.
    pub(super) fn check_contains(&mut self, data: &Value, subschema: &Value) -> EvalResult<bool> {
        let items = match data.as_array() {
            Some(items) => items,
            None => {
                return self
                    .sink
                    .report("Cannot evaluate a 'contains' against a non-array");
            }
        };
        if self.contains_count(items, subschema)? == 0 {
            return self
                .sink
                .report("No array elements matched the contains schema");
        }
        Ok(true)
    }

    /// `contains` with `minContains`/`maxContains` (draft2019-09).
    ///
    /// `minContains` defaults to 1. An absent `maxContains` is expressed
    /// as `occurrences + 1`, so no explicit maximum never fails.
    pub(super) fn check_contains_bounded(
        &mut self,
        data: &Value,
        subschema: &Value,
        schema: &Map<String, Value>,
    ) -> EvalResult<bool> {
        let min_contains = match schema.get("minContains") {
            Some(value) => value.as_u64().ok_or_else(|| {
                EvalError::InvalidSchema("The minContains value must be an integer".into())
            })?,
            None => 1,
        };
        let max_contains = match schema.get("maxContains") {
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                EvalError::InvalidSchema("The maxContains value must be an integer".into())
            })?),
            None => None,
        };

        let items = match data.as_array() {
            Some(items) => items,
            None => {
                return self
                    .sink
                    .report("Cannot evaluate a 'contains' against a non-array");
            }
        };
        let occurrences = self.contains_count(items, subschema)?;
        let max_contains = max_contains.unwrap_or(occurrences + 1);

        let mut valid = true;
        if occurrences < min_contains {
            valid &= self.sink.report(format!(
                "There were too few occurrences {} in array that matched the contains schema",
                occurrences
            ))?;
        }
        if occurrences > max_contains {
            valid &= self.sink.report(format!(
                "There were too many occurrences {} in array that matched the contains schema",
                occurrences
            ))?;
        }
        Ok(valid)
    }

    /// Counts array elements matching the subschema, each evaluated in
    /// isolation.
    fn contains_count(&mut self, items: &[Value], subschema: &Value) -> EvalResult<u64> {
        let mut occurrences = 0;
        for item in items {
            if self.validate_branch(item, subschema)? {
                occurrences += 1;
            }
        }
        Ok(occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_integer_draft4_rejects_whole_floats() {
        let mut evaluator = Evaluator::new(json!({"type": "integer"}), Draft::Draft4);
        assert_eq!(evaluator.validate(&json!(3)).unwrap(), true);
        assert!(evaluator.validate(&json!(3.0)).is_err());
        assert!(evaluator.validate(&json!(true)).is_err());
    }

    #[test]
    fn test_type_integer_draft6_accepts_whole_floats() {
        let mut evaluator = Evaluator::new(json!({"type": "integer"}), Draft::Draft6);
        assert_eq!(evaluator.validate(&json!(3.0)).unwrap(), true);
        assert!(evaluator.validate(&json!(3.5)).is_err());
    }

    #[test]
    fn test_unknown_type_name_is_schema_invalid() {
        let mut evaluator = Evaluator::new(json!({"type": "quaternion"}), Draft::Draft7);
        let err = evaluator.validate(&json!(1)).unwrap_err();
        assert!(matches!(err, EvalError::InvalidSchema(_)));

        let mut evaluator = Evaluator::new(json!({"type": ["string", "null"]}), Draft::Draft7);
        let err = evaluator.validate(&json!("x")).unwrap_err();
        assert!(matches!(err, EvalError::InvalidSchema(_)));
    }

    #[test]
    fn test_enum_membership_uses_deep_equality() {
        let schema = json!({"enum": [1.0, {"a": [2]}, "x"]});
        let mut evaluator = Evaluator::new(schema, Draft::Draft4);
        assert_eq!(evaluator.validate(&json!(1)).unwrap(), true);
        assert_eq!(evaluator.validate(&json!({"a": [2]})).unwrap(), true);
        assert!(evaluator.validate(&json!(true)).is_err());
        assert!(evaluator.validate(&json!("y")).is_err());
    }

    #[test]
    fn test_enum_must_be_a_list() {
        let mut evaluator = Evaluator::new(json!({"enum": "oops"}), Draft::Draft4);
        assert!(matches!(
            evaluator.validate(&json!(1)),
            Err(EvalError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_const_cross_type_numeric_tolerance() {
        let mut evaluator = Evaluator::new(json!({"const": 1.0}), Draft::Draft6);
        assert_eq!(evaluator.validate(&json!(1)).unwrap(), true);

        let mut evaluator = Evaluator::new(json!({"const": true}), Draft::Draft6);
        assert!(evaluator.validate(&json!(1)).is_err());
    }

    #[test]
    fn test_const_is_unknown_under_draft4() {
        let mut evaluator = Evaluator::new(json!({"const": 1}), Draft::Draft4);
        assert_eq!(evaluator.validate(&json!(999)).unwrap(), true);
    }

    #[test]
    fn test_string_length_bounds() {
        let schema = json!({"minLength": 2, "maxLength": 3});
        let mut evaluator = Evaluator::new(schema, Draft::Draft4);
        assert_eq!(evaluator.validate(&json!("ab")).unwrap(), true);
        assert!(evaluator.validate(&json!("a")).is_err());
        assert!(evaluator.validate(&json!("abcd")).is_err());
        assert!(evaluator.validate(&json!(12)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut evaluator = Evaluator::new(json!({"maxLength": 2}), Draft::Draft4);
        assert_eq!(evaluator.validate(&json!("éé")).unwrap(), true);
    }

    #[test]
    fn test_format_assertion_with_registered_checker() {
        let mut evaluator = Evaluator::new(json!({"format": "date-time"}), Draft::Draft7);
        assert_eq!(
            evaluator.validate(&json!("2024-02-29T10:00:00Z")).unwrap(),
            true
        );
        assert!(evaluator.validate(&json!("not a timestamp")).is_err());
    }

    #[test]
    fn test_unregistered_format_passes() {
        let mut evaluator = Evaluator::new(json!({"format": "ipv4"}), Draft::Draft7);
        assert_eq!(evaluator.validate(&json!("999.999")).unwrap(), true);
    }

    #[test]
    fn test_custom_format_override() {
        let mut evaluator = Evaluator::new(json!({"format": "even"}), Draft::Draft7);
        evaluator.add_format("even", |v: &Value| {
            v.as_u64().map_or(false, |n| n % 2 == 0)
        });
        assert_eq!(evaluator.validate(&json!(4)).unwrap(), true);
        assert!(evaluator.validate(&json!(3)).is_err());
    }

    #[test]
    fn test_contains_draft6_requires_one_match() {
        let schema = json!({"contains": {"type": "string"}});
        let mut evaluator = Evaluator::new(schema, Draft::Draft6);
        assert_eq!(evaluator.validate(&json!([1, "x", 2])).unwrap(), true);
        assert!(evaluator.validate(&json!([1, 2])).is_err());
        assert!(evaluator.validate(&json!("not an array")).is_err());
    }

    #[test]
    fn test_bounded_contains_respects_explicit_maximum() {
        let schema = json!({
            "contains": {"const": 1},
            "minContains": 2,
            "maxContains": 3
        });
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!([1, 1, 2])).unwrap(), true);
        assert_eq!(evaluator.validate(&json!([1, 1, 1])).unwrap(), true);
        // 4 occurrences exceed maxContains 3.
        assert!(evaluator.validate(&json!([1, 1, 1, 1])).is_err());
        // 1 occurrence is below minContains 2.
        assert!(evaluator.validate(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_bounded_contains_without_maximum_never_fails_high() {
        let schema = json!({"contains": {"const": 1}, "minContains": 1});
        let mut evaluator = Evaluator::new(schema, Draft::Draft201909);
        assert_eq!(evaluator.validate(&json!([1, 1, 1, 1, 1])).unwrap(), true);
    }

    #[test]
    fn test_bounded_contains_reports_both_bounds_in_lazy_mode() {
        use crate::engine::ReportingMode;
        let schema = json!({
            "contains": {"const": 1},
            "minContains": 5,
            "maxContains": 0
        });
        let mut evaluator =
            Evaluator::with_mode(schema, Draft::Draft201909, ReportingMode::Lazy);
        assert_eq!(evaluator.validate(&json!([1, 1])).unwrap(), false);
        assert_eq!(evaluator.errors().len(), 2);
    }
}
