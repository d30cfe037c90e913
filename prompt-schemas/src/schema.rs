//! The [`Schema`] trait: validated construction from raw JSON.
//!
//! Every request and response type derives a JSON Schema through
//! `schemars`. Construction first checks the raw value against that schema
//! with `jsonschema`, collecting every violation, and only then hands the
//! value to `serde`. Nothing is coerced and no partial object escapes.
//!
//! Each type compiles its validator once, on first use.

use std::sync::OnceLock;

use jsonschema::Validator;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use tracing::trace;

use crate::error::{Error, FieldViolation, Result};

/// A validated data shape with a published JSON Schema.
///
/// Types in this crate implement it through `impl_schema!`, which supplies
/// the name and a per-type validator cache.
pub trait Schema: Serialize + DeserializeOwned + JsonSchema {
    /// Name used in diagnostics, prompts and test-case assertions.
    const NAME: &'static str;

    /// Returns the compiled validator for this type's schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if the generated schema does not
    /// compile.
    fn validator() -> Result<&'static Validator>;

    /// Returns the JSON Schema describing this type as a JSON value.
    #[must_use]
    fn schema_value() -> Value {
        let schema = schemars::schema_for!(Self);
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
    }

    /// Validates `value` and constructs the typed object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every violated field when the
    /// value does not conform to the schema.
    fn from_value(value: Value) -> Result<Self> {
        validate_value::<Self>(&value)?;
        serde_path_to_error::deserialize(value).map_err(|err| {
            let path = pointer(err.path());
            Error::Validation {
                schema: Self::NAME,
                violations: vec![FieldViolation::new(path, err.into_inner().to_string())],
            }
        })
    }

    /// Parses JSON text and constructs the typed object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedJson`] if `text` is not JSON, otherwise the
    /// errors of [`Schema::from_value`].
    fn from_json(text: &str) -> Result<Self> {
        let value = serde_json::from_str(text).map_err(|source| Error::MalformedJson {
            schema: Self::NAME,
            source,
        })?;
        Self::from_value(value)
    }

    /// Serializes the object back into a JSON value.
    #[must_use]
    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A compiled validator, or the reason the schema failed to compile.
pub(crate) type CompiledSchema = std::result::Result<Validator, String>;

/// Compiles `T`'s schema into `cell` on first use.
pub(crate) fn compiled<T: Schema>(
    cell: &'static OnceLock<CompiledSchema>,
) -> Result<&'static Validator> {
    cell.get_or_init(|| {
        trace!(schema = T::NAME, "compiling schema");
        jsonschema::validator_for(&T::schema_value()).map_err(|err| err.to_string())
    })
    .as_ref()
    .map_err(|reason| Error::InvalidSchema {
        schema: T::NAME,
        reason: reason.clone(),
    })
}

/// Implements [`Schema`] for types named by their own identifier.
macro_rules! impl_schema {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::schema::Schema for $ty {
                const NAME: &'static str = stringify!($ty);

                fn validator() -> $crate::error::Result<&'static ::jsonschema::Validator> {
                    static VALIDATOR: ::std::sync::OnceLock<$crate::schema::CompiledSchema> =
                        ::std::sync::OnceLock::new();
                    $crate::schema::compiled::<Self>(&VALIDATOR)
                }
            }
        )+
    };
}

pub(crate) use impl_schema;

// Renders a serde path in the JSON Pointer form jsonschema uses.
fn pointer(path: &serde_path_to_error::Path) -> String {
    path.iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(index.to_string()),
            Segment::Map { key } => Some(key.clone()),
            Segment::Enum { variant } => Some(variant.clone()),
            Segment::Unknown => None,
        })
        .fold(String::new(), |mut out, part| {
            out.push('/');
            out.push_str(&part);
            out
        })
}

/// A response envelope that carries intermediate reasoning next to the
/// structured result.
pub trait ChainOfThought: Schema {
    /// The reasoning block the model fills first.
    type Reasoning: Schema;
    /// The structured result kept for downstream use.
    type Final: Schema;

    /// Borrows the reasoning block.
    fn reasoning(&self) -> &Self::Reasoning;

    /// Discards the reasoning and returns the final result.
    fn into_final(self) -> Self::Final;
}

/// Checks `value` against the JSON Schema of `T`.
///
/// # Errors
///
/// Returns [`Error::Validation`] with one [`FieldViolation`] per failed
/// constraint, or [`Error::InvalidSchema`] if the generated schema does not
/// compile.
pub fn validate_value<T: Schema>(value: &Value) -> Result<()> {
    let violations: Vec<FieldViolation> = T::validator()?
        .iter_errors(value)
        .map(|err| FieldViolation::new(err.instance_path().to_string(), err.to_string()))
        .collect();

    if violations.is_empty() {
        return Ok(());
    }

    trace!(schema = T::NAME, count = violations.len(), "schema validation failed");
    Err(Error::Validation {
        schema: T::NAME,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scenario::{ObjectiveSchema, ScenarioSchema};

    fn objective(id: Value) -> Value {
        json!({ "id": id, "description": "Hold the bridge", "priority": "critical" })
    }

    #[test]
    fn validator_is_compiled_once_per_type() {
        let first = ObjectiveSchema::validator().unwrap();
        let second = ObjectiveSchema::validator().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn fractional_integer_keeps_field_path() {
        let err = ObjectiveSchema::from_value(objective(json!(1.0))).expect_err("1.0 is not a u32");
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path(), "/id");
        assert!(violations[0].message().contains("u32"));
    }

    #[test]
    fn oversized_integer_keeps_field_path() {
        let err = ObjectiveSchema::from_value(objective(json!(5_000_000_000_u64)))
            .expect_err("does not fit a u32");
        assert_eq!(err.violations()[0].path(), "/id");
    }

    #[test]
    fn nested_serde_failures_point_into_arrays() {
        let mut scenario = json!({
            "title": "t", "description": "d", "category": "c", "difficulty": "Beginner",
            "estimated_duration": 5, "objectives": [objective(json!(1)), objective(json!(2.0))],
            "win_conditions": "w", "lose_conditions": "l", "max_turns": 3,
            "scenario_opening_message": "o", "characters": [], "tags": []
        });
        let err = ScenarioSchema::from_value(scenario.clone()).expect_err("2.0 rejected");
        assert_eq!(err.violations()[0].path(), "/objectives/1/id");

        scenario["objectives"][1]["id"] = json!(2);
        assert!(ScenarioSchema::from_value(scenario).is_ok());
    }

    #[test]
    fn schema_value_names_the_type() {
        let schema = ObjectiveSchema::schema_value();
        assert_eq!(schema["title"], json!("ObjectiveSchema"));
    }
}
