//! Substring extraction

use super::expect_text;
use crate::{ArgumentSpec, Operator, OperatorDefinition};
use serde_json::Value;

const START_KEY: &str = "start";
const END_KEY: &str = "end";

/// `substr[start,end]` keeps the characters between two positions
///
/// Positions are zero-based character indexes, negative ones count back from
/// the end, and the keywords `start` and `end` stand for either side of the
/// text. With one argument the substring runs to the end.
///
/// With `name = "alex"`: `substr[start,2]` and `substr[0,2]` give `"al"`,
/// `substr[1,3]` gives `"le"`, `substr[-2]` gives `"ex"`.
#[derive(Debug, Clone, Copy)]
pub struct Substr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
    Index(i64),
}

impl Bound {
    fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim().to_lowercase();
        match arg.as_str() {
            START_KEY => Some(Bound::Start),
            END_KEY => Some(Bound::End),
            _ => arg.parse().ok().map(Bound::Index),
        }
    }

    /// Position in a text of `len` characters, clamped to `0..=len`
    fn position(self, len: usize) -> usize {
        match self {
            Bound::Start => 0,
            Bound::End => len,
            Bound::Index(i) if i < 0 => {
                len.saturating_sub(usize::try_from(i.unsigned_abs()).unwrap_or(usize::MAX))
            }
            Bound::Index(i) => usize::try_from(i).unwrap_or(usize::MAX).min(len),
        }
    }
}

const ARGUMENTS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "Start Location",
        description: "Where the substring begins. A number, \"start\" or \"end\".",
        required: true,
    },
    ArgumentSpec {
        name: "End Location",
        description: "Where the substring stops, exclusive. A number, \"start\" or \"end\".",
        required: false,
    },
];

impl OperatorDefinition for Substr {
    fn name(&self) -> &str {
        "substr"
    }

    fn description(&self) -> &str {
        "Returns part of the token value between two character positions."
    }

    fn arguments(&self) -> &[ArgumentSpec] {
        ARGUMENTS
    }

    fn create(&self, args: &[String]) -> Result<Box<dyn Operator>, String> {
        let (start, end) = match args {
            [start] => (start.as_str(), END_KEY),
            [start, end] => (start.as_str(), end.as_str()),
            _ => {
                return Err(format!(
                    "substr expects one or two arguments that are numbers or \"start\"/\"end\", got {}",
                    args.len()
                ))
            }
        };

        let parse = |which: &str, arg: &str| {
            Bound::parse(arg).ok_or_else(|| {
                format!(
                    "The {which} argument of substr must be a number or \"start\"/\"end\", \"{arg}\" was passed instead"
                )
            })
        };

        Ok(Box::new(SubstrOperator {
            start: parse("first", start)?,
            end: parse("second", end)?,
        }))
    }
}

struct SubstrOperator {
    start: Bound,
    end: Bound,
}

impl Operator for SubstrOperator {
    fn name(&self) -> &str {
        "substr"
    }

    fn validate(&self, value: &Value) -> Option<String> {
        expect_text(value)
    }

    fn execute(&self, value: Value) -> Value {
        let Value::String(text) = value else {
            return value;
        };

        let len = text.chars().count();
        let start = self.start.position(len);
        let end = self.end.position(len);
        if start >= end {
            return Value::String(String::new());
        }

        Value::String(text.chars().skip(start).take(end - start).collect())
    }
}
