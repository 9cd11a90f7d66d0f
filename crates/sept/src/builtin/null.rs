use crate::{Operator, OperatorDefinition};
use serde_json::Value;

/// Name of the operator filling in for expressions without one
pub const NULL_OPERATOR: &str = "NULL";

/// Passes its input through unchanged
#[derive(Debug, Clone, Copy)]
pub struct Null;

impl OperatorDefinition for Null {
    fn name(&self) -> &str {
        NULL_OPERATOR
    }

    fn description(&self) -> &str {
        "Leaves the token value as it is."
    }

    fn is_private(&self) -> bool {
        true
    }

    fn create(&self, _args: &[String]) -> Result<Box<dyn Operator>, String> {
        Ok(Box::new(Null))
    }
}

impl Operator for Null {
    fn name(&self) -> &str {
        NULL_OPERATOR
    }

    fn validate(&self, _value: &Value) -> Option<String> {
        None
    }

    fn execute(&self, value: Value) -> Value {
        value
    }
}
