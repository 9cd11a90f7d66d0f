//! Left padding

use crate::binding::{kind_of, value_to_string};
use crate::{ArgumentSpec, Operator, OperatorDefinition};
use serde_json::Value;

/// `pad[width,char]` left-pads the value to `width` characters
///
/// With `name = "1"`: `pad[4,X]` gives `"XXX1"`, `pad[4,0]` gives `"0001"`
/// and `pad[1,X]` leaves `"1"` alone. Numbers and booleans are padded as
/// their text form.
#[derive(Debug, Clone, Copy)]
pub struct Pad;

const ARGUMENTS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "Width",
        description: "The number of characters the result should have at least.",
        required: true,
    },
    ArgumentSpec {
        name: "Padding Character",
        description: "The single character added on the left.",
        required: true,
    },
];

impl OperatorDefinition for Pad {
    fn name(&self) -> &str {
        "pad"
    }

    fn description(&self) -> &str {
        "Pads the token value on the left with a character."
    }

    fn arguments(&self) -> &[ArgumentSpec] {
        ARGUMENTS
    }

    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String> {
        let [width, fill] = args else {
            return Err(format!(
                "pad expects a width and a padding character, got {} arguments",
                args.len()
            ));
        };

        let width: usize = width
            .parse()
            .map_err(|_| format!("The width passed to pad must be a number, got \"{width}\""))?;

        let mut chars = fill.chars();
        let (Some(fill), None) = (chars.next(), chars.next()) else {
            return Err(format!(
                "The padding character passed to pad must be a single character, got \"{fill}\""
            ));
        };

        Ok(Box::new(PadOperator { width, fill }))
    }
}

struct PadOperator {
    width: usize,
    fill: char,
}

impl Operator for PadOperator {
    fn name(&self) -> &str {
        "pad"
    }

    fn validate(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => None,
            other => Some(format!(
                "Value must be text or a number, found {}",
                kind_of(other)
            )),
        }
    }

    fn execute(&self, value: Value) -> Value {
        let text = value_to_string(&value);
        let missing = self.width.saturating_sub(text.chars().count());
        let mut padded: String = std::iter::repeat(self.fill).take(missing).collect();
        padded.push_str(&text);
        Value::String(padded)
    }
}
