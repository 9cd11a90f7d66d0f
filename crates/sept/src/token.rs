//! Tokens: named readers of template data

use crate::binding::{is_valid_binding, lookup_key, resolve_binding};
use crate::{Result, SeptError};
use serde_json::Value;

/// A named value source
///
/// Tokens are registered once and shared by every expression that refers to
/// them. Names are case-insensitive.
pub trait Token: Send + Sync {
    fn name(&self) -> &str;

    /// Free-form help text for listings
    fn description(&self) -> &str {
        ""
    }

    /// Read this token's value out of `data`, `None` if it is not there
    fn value(&self, data: &Value) -> Option<Value>;
}

/// Reads `data[name]` directly
///
/// Synthesized for references that match no registered token when fallback
/// mode is on. An exact key match wins, otherwise keys are compared ignoring
/// case.
#[derive(Debug, Clone)]
pub struct FallbackToken {
    name: String,
}

impl FallbackToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Token for FallbackToken {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, data: &Value) -> Option<Value> {
        lookup_key(data, &self.name).cloned()
    }
}

/// A token whose value sits at a `$.path` inside the data
///
/// # Example
/// ```
/// use sept::{BindingToken, Token};
/// use serde_json::json;
///
/// let token = BindingToken::new("firstname", "$.user.first_name").unwrap();
/// let data = json!({ "user": { "first_name": "alex" } });
/// assert_eq!(token.value(&data), Some(json!("alex")));
/// ```
#[derive(Debug, Clone)]
pub struct BindingToken {
    name: String,
    bind: String,
    description: String,
}

impl BindingToken {
    pub fn new(name: impl Into<String>, bind: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let bind = bind.into();
        if !is_valid_binding(&bind) {
            return Err(SeptError::InvalidBinding { name, bind });
        }
        Ok(Self {
            name,
            bind,
            description: String::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn bind(&self) -> &str {
        &self.bind
    }
}

impl Token for BindingToken {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self, data: &Value) -> Option<Value> {
        resolve_binding(&self.bind, data).cloned()
    }
}
