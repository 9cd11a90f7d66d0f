//! Token and operator registries
//!
//! Each registry is plain per-instance state: two parsers with different
//! custom tokens never see each other's registrations.

use crate::builtin::{self, NULL_OPERATOR};
use crate::{FallbackToken, Operator, OperatorDefinition, Result, SeptError, Token};
use log::debug;
use sept_syntax::{OperatorRef, Reference};
use std::collections::HashMap;
use std::sync::Arc;

/// Canonical form of a token name
pub fn canonical_token_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Tokens by case-insensitive name
#[derive(Default, Clone)]
pub struct TokenRegistry {
    tokens: HashMap<String, Arc<dyn Token>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token, failing if the name is taken unless `allow_overwrite`
    pub fn register<T: Token + 'static>(&mut self, token: T, allow_overwrite: bool) -> Result<()> {
        self.register_shared(Arc::new(token), allow_overwrite)
    }

    pub fn register_shared(&mut self, token: Arc<dyn Token>, allow_overwrite: bool) -> Result<()> {
        let name = canonical_token_name(token.name());
        if !allow_overwrite && self.tokens.contains_key(&name) {
            return Err(SeptError::TokenNameCollision(token.name().to_string()));
        }
        debug!("registering token {name}");
        self.tokens.insert(name, token);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Token>> {
        self.tokens.get(&canonical_token_name(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(&canonical_token_name(name))
    }

    /// Find the token a reference names
    ///
    /// Without a registered match, `fallback` synthesizes a [`FallbackToken`];
    /// otherwise the lookup fails with [`SeptError::TokenNotFound`].
    pub fn resolve(
        &self,
        reference: &Reference,
        expression: &str,
        fallback: bool,
    ) -> Result<Arc<dyn Token>> {
        if let Some(token) = self.get(&reference.name) {
            return Ok(token);
        }
        if fallback {
            debug!("no token named {}, reading it from data", reference.name);
            return Ok(Arc::new(FallbackToken::new(reference.name.trim())));
        }
        Err(SeptError::TokenNotFound {
            name: canonical_token_name(&reference.name),
            span: reference.span,
            expression: expression.to_string(),
        })
    }

    /// Registered tokens sorted by name
    pub fn tokens(&self) -> Vec<&dyn Token> {
        let mut tokens: Vec<&dyn Token> = self.tokens.values().map(|t| t.as_ref()).collect();
        tokens.sort_by_cached_key(|token| canonical_token_name(token.name()));
        tokens
    }
}

/// Operator definitions by case-sensitive name
#[derive(Clone)]
pub struct OperatorRegistry {
    definitions: HashMap<String, Arc<dyn OperatorDefinition>>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorRegistry {
    /// A registry holding the builtin operators
    pub fn new() -> Self {
        let definitions = builtin::operators()
            .into_iter()
            .map(|definition| (definition.name().to_string(), definition))
            .collect();
        Self { definitions }
    }

    /// Add an operator, failing if the name is taken unless `allow_overwrite`
    pub fn register<D: OperatorDefinition + 'static>(
        &mut self,
        definition: D,
        allow_overwrite: bool,
    ) -> Result<()> {
        self.register_shared(Arc::new(definition), allow_overwrite)
    }

    pub fn register_shared(
        &mut self,
        definition: Arc<dyn OperatorDefinition>,
        allow_overwrite: bool,
    ) -> Result<()> {
        let name = definition.name().to_string();
        if !allow_overwrite && self.definitions.contains_key(&name) {
            return Err(SeptError::OperatorNameCollision(name));
        }
        debug!("registering operator {name}");
        self.definitions.insert(name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OperatorDefinition>> {
        self.definitions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Build a fresh operator for one occurrence in a template
    pub fn resolve(&self, operator: &OperatorRef) -> Result<Box<dyn Operator>> {
        let definition =
            self.definitions
                .get(&operator.name)
                .ok_or_else(|| SeptError::OperatorNotFound {
                    name: operator.name.clone(),
                    span: operator.span,
                })?;

        definition
            .create(&operator.args)
            .map_err(|message| SeptError::InvalidOperatorArguments {
                operator: operator.name.clone(),
                message,
                span: operator.span,
            })
    }

    /// The no-op operator standing in for expressions without one
    pub fn null(&self) -> Result<Box<dyn Operator>> {
        let definition = self
            .definitions
            .get(NULL_OPERATOR)
            .ok_or_else(|| SeptError::OperatorNotFound {
                name: NULL_OPERATOR.to_string(),
                span: Default::default(),
            })?;

        definition
            .create(&[])
            .map_err(|message| SeptError::InvalidOperatorArguments {
                operator: NULL_OPERATOR.to_string(),
                message,
                span: Default::default(),
            })
    }

    /// Public operators sorted by name
    pub fn operators(&self) -> Vec<&dyn OperatorDefinition> {
        let mut operators: Vec<&dyn OperatorDefinition> = self
            .definitions
            .values()
            .map(|d| d.as_ref())
            .filter(|d| !d.is_private())
            .collect();
        operators.sort_by(|a, b| a.name().cmp(b.name()));
        operators
    }
}
