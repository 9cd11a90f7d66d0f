//! Builtin operators
//!
//! Every [`crate::OperatorRegistry`] starts out with these registered.

mod case;
mod null;
mod pad;
mod replace;
mod substr;

pub use case::{Lower, Upper};
pub use null::{Null, NULL_OPERATOR};
pub use pad::Pad;
pub use replace::Replace;
pub use substr::Substr;

use crate::binding::kind_of;
use crate::OperatorDefinition;
use serde_json::Value;
use std::sync::Arc;

/// Definitions of all builtin operators
pub fn operators() -> Vec<Arc<dyn OperatorDefinition>> {
    vec![
        Arc::new(Null),
        Arc::new(Lower),
        Arc::new(Upper),
        Arc::new(Substr),
        Arc::new(Replace),
        Arc::new(Pad),
    ]
}

/// Validation shared by operators that only work on text
fn expect_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => None,
        other => Some(format!("Value must be text, found {}", kind_of(other))),
    }
}

fn expect_no_arguments(name: &str, args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("{name} takes no arguments, got {}", args.len()))
    }
}
