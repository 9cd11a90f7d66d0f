//! Case conversion

use super::{expect_no_arguments, expect_text};
use crate::{Operator, OperatorDefinition};
use serde_json::Value;

/// `lower` converts text to lowercase: `"ALEX11"` becomes `"alex11"`
#[derive(Debug, Clone, Copy)]
pub struct Lower;

/// `upper` converts text to uppercase: `"alex11"` becomes `"ALEX11"`
#[derive(Debug, Clone, Copy)]
pub struct Upper;

impl OperatorDefinition for Lower {
    fn name(&self) -> &str {
        "lower"
    }

    fn description(&self) -> &str {
        "Converts the token value to lowercase."
    }

    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String> {
        expect_no_arguments("lower", args)?;
        Ok(Box::new(Lower))
    }
}

impl Operator for Lower {
    fn name(&self) -> &str {
        "lower"
    }

    fn validate(&self, value: &Value) -> Option<String> {
        expect_text(value)
    }

    fn execute(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other,
        }
    }
}

impl OperatorDefinition for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    fn description(&self) -> &str {
        "Converts the token value to uppercase."
    }

    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String> {
        expect_no_arguments("upper", args)?;
        Ok(Box::new(Upper))
    }
}

impl Operator for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    fn validate(&self, value: &Value) -> Option<String> {
        expect_text(value)
    }

    fn execute(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }
    }
}
