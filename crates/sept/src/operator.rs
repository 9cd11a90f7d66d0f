//! Operators: per-occurrence value transformations

use serde::Serialize;
use serde_json::Value;

/// One argument an operator accepts, for documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A registered operator kind
///
/// Each `{{name[args]:...}}` occurrence gets its own [`Operator`] built by
/// [`OperatorDefinition::create`]. Names are case-sensitive.
pub trait OperatorDefinition: Send + Sync {
    fn name(&self) -> &str;

    /// Free-form help text for listings
    fn description(&self) -> &str {
        ""
    }

    fn arguments(&self) -> &[ArgumentSpec] {
        &[]
    }

    /// Private operators are usable but left out of listings
    fn is_private(&self) -> bool {
        false
    }

    /// Build an instance bound to one occurrence's arguments
    ///
    /// Returns a message describing the problem if the arguments are unusable.
    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String>;
}

/// An operator bound to its arguments
pub trait Operator: Send + Sync {
    fn name(&self) -> &str;

    /// Check the incoming value, returning a message if it cannot be used
    fn validate(&self, value: &Value) -> Option<String>;

    /// Transform a value that passed [`Operator::validate`]
    fn execute(&self, value: Value) -> Value;
}
