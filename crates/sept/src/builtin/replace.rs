//! Find and replace

use super::expect_text;
use crate::{ArgumentSpec, Operator, OperatorDefinition};
use serde_json::Value;

/// Keywords usable inside replace arguments, since whitespace is stripped
/// from expressions
const KEYWORDS: &[(&str, &str)] = &[(r"\s", " ")];

/// `replace[find,replacement]` swaps every occurrence of `find`
///
/// With `name = "alex"`, `replace[ex,an]` gives `"alan"`. Write `\s` for a
/// space: `replace[\s,-]` turns `"a b c"` into `"a-b-c"`.
#[derive(Debug, Clone, Copy)]
pub struct Replace;

const ARGUMENTS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "Find String",
        description: "The characters to search for.",
        required: true,
    },
    ArgumentSpec {
        name: "Replace String",
        description: "The characters to put in place of the find string.",
        required: true,
    },
];

fn expand_keywords(arg: &str) -> String {
    KEYWORDS
        .iter()
        .fold(arg.to_string(), |acc, (keyword, replacement)| {
            acc.replace(keyword, replacement)
        })
}

impl OperatorDefinition for Replace {
    fn name(&self) -> &str {
        "replace"
    }

    fn description(&self) -> &str {
        "Finds and replaces characters in the token value."
    }

    fn arguments(&self) -> &[ArgumentSpec] {
        ARGUMENTS
    }

    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String> {
        let [find, replacement] = args else {
            return Err(format!(
                "replace expects two text arguments, got {}",
                args.len()
            ));
        };
        Ok(Box::new(ReplaceOperator {
            find: expand_keywords(find),
            replacement: expand_keywords(replacement),
        }))
    }
}

struct ReplaceOperator {
    find: String,
    replacement: String,
}

impl Operator for ReplaceOperator {
    fn name(&self) -> &str {
        "replace"
    }

    fn validate(&self, value: &Value) -> Option<String> {
        expect_text(value)
    }

    fn execute(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.replace(&self.find, &self.replacement)),
            other => other,
        }
    }
}
