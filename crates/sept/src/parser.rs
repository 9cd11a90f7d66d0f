//! Parser facade and configuration

use crate::binder::Binder;
use crate::registry::{OperatorRegistry, TokenRegistry};
use crate::{BindingToken, CompiledTemplate, OperatorDefinition, Result, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parser settings, loadable from JSON
///
/// ```json
/// {
///   "fallback": true,
///   "tokens": [
///     { "name": "firstname", "bind": "$.user.first_name" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    /// Read references with no registered token straight from the data
    #[serde(default = "default_fallback")]
    pub fallback: bool,

    /// Tokens to register at startup
    #[serde(default)]
    pub tokens: Vec<TokenBinding>,
}

fn default_fallback() -> bool {
    true
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            tokens: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Parse a configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A configured token reading a `$.path` out of the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBinding {
    pub name: String,
    pub bind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Entry point: registries plus settings
///
/// Registration is meant to happen up front; compiled templates keep their
/// own handles to the tokens and operators they use, so later registrations
/// never affect templates that were already compiled.
///
/// # Example
/// ```
/// use sept::{BindingToken, TemplateParser};
/// use serde_json::json;
///
/// let mut parser = TemplateParser::new();
/// parser
///     .register_token(BindingToken::new("lastname", "$.user.last_name").unwrap(), false)
///     .unwrap();
///
/// let data = json!({ "user": { "last_name": "Hughes" } });
/// assert_eq!(parser.parse("/home/{{lower:lastname}}", &data).unwrap(), "/home/hughes");
/// ```
#[derive(Clone, Default)]
pub struct TemplateParser {
    tokens: TokenRegistry,
    operators: OperatorRegistry,
    config: ParserConfig,
}

impl TemplateParser {
    /// A parser with the builtin operators and fallback tokens enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser set up from configuration, registering its tokens
    pub fn from_config(config: ParserConfig) -> Result<Self> {
        let mut parser = Self {
            tokens: TokenRegistry::new(),
            operators: OperatorRegistry::new(),
            config,
        };

        for binding in parser.config.tokens.clone() {
            let mut token = BindingToken::new(binding.name, binding.bind)?;
            if let Some(description) = binding.description {
                token = token.with_description(description);
            }
            parser.tokens.register(token, false)?;
        }

        Ok(parser)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_fallback(&mut self, fallback: bool) {
        self.config.fallback = fallback;
    }

    pub fn register_token<T: Token + 'static>(&mut self, token: T, allow_overwrite: bool) -> Result<()> {
        self.tokens.register(token, allow_overwrite)
    }

    pub fn register_operator<D: OperatorDefinition + 'static>(
        &mut self,
        definition: D,
        allow_overwrite: bool,
    ) -> Result<()> {
        self.operators.register(definition, allow_overwrite)
    }

    /// Compile a template using the configured fallback setting
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate> {
        self.compile_with_fallback(source, self.config.fallback)
    }

    pub fn compile_with_fallback(&self, source: &str, fallback: bool) -> Result<CompiledTemplate> {
        let binder = Binder::new(&self.tokens, &self.operators).with_fallback(fallback);
        CompiledTemplate::compile(source, &binder)
    }

    /// Compile and resolve in one step
    pub fn parse(&self, source: &str, data: &Value) -> Result<String> {
        self.compile(source)?.resolve(data)
    }

    /// Registered tokens sorted by name
    pub fn tokens(&self) -> Vec<&dyn Token> {
        self.tokens.tokens()
    }

    /// Public operators sorted by name
    pub fn operators(&self) -> Vec<&dyn OperatorDefinition> {
        self.operators.operators()
    }

    pub fn token_registry(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn operator_registry(&self) -> &OperatorRegistry {
        &self.operators
    }
}
