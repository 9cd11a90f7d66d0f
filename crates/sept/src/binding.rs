//! Data lookups and value stringification

use serde_json::Value;

/// Resolve a JSONPath-like binding expression against data
///
/// Supports simple paths like:
/// - `$.field` - Root field
/// - `$.object.field` - Nested field
/// - `$.array[0]` - Array index
/// - `$.array[0].field` - Array element field
pub fn resolve_binding<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    let path = path.strip_prefix("$.")?;
    let mut current = data;

    for segment in path.split('.') {
        if let Some(bracket_pos) = segment.find('[') {
            let field = &segment[..bracket_pos];
            let index: usize = segment[bracket_pos + 1..]
                .strip_suffix(']')?
                .parse()
                .ok()?;

            if !field.is_empty() {
                current = current.get(field)?;
            }
            current = current.get(index)?;
        } else {
            current = current.get(segment)?;
        }
    }

    Some(current)
}

/// True if `path` is something [`resolve_binding`] can walk
pub fn is_valid_binding(path: &str) -> bool {
    match path.strip_prefix("$.") {
        Some(rest) => rest.split('.').all(|segment| {
            let field = segment.split('[').next().unwrap_or_default();
            !segment.is_empty() && (segment.contains('[') || !field.is_empty())
        }),
        None => false,
    }
}

/// Look a key up in a data object, exactly first and then ignoring case
pub fn lookup_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let object = data.as_object()?;
    object.get(key).or_else(|| {
        let wanted = key.to_lowercase();
        object
            .iter()
            .find(|(candidate, _)| candidate.to_lowercase() == wanted)
            .map(|(_, value)| value)
    })
}

/// Convert a JSON value to the text spliced into a template
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Short name of a value's JSON type, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "text",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_simple_field() {
        let data = json!({ "name": "John" });
        let result = resolve_binding("$.name", &data);
        assert_eq!(result, Some(&json!("John")));
    }

    #[test]
    fn test_resolve_nested_field() {
        let data = json!({
            "deep": {
                "nested": {
                    "data": { "githubUsername": "Ahuge" }
                }
            }
        });
        let result = resolve_binding("$.deep.nested.data.githubUsername", &data);
        assert_eq!(result, Some(&json!("Ahuge")));
    }

    #[test]
    fn test_resolve_array_object() {
        let data = json!({
            "users": [
                { "name": "alex" },
                { "name": "sam" }
            ]
        });
        assert_eq!(resolve_binding("$.users[1].name", &data), Some(&json!("sam")));
    }

    #[test]
    fn test_resolve_malformed_index() {
        let data = json!({ "users": ["a"] });
        assert_eq!(resolve_binding("$.users[", &data), None);
        assert_eq!(resolve_binding("$.users[x]", &data), None);
        assert_eq!(resolve_binding("users", &data), None);
    }

    #[test]
    fn test_valid_bindings() {
        assert!(is_valid_binding("$.name"));
        assert!(is_valid_binding("$.a.b[2].c"));
        assert!(!is_valid_binding("name"));
        assert!(!is_valid_binding("$."));
        assert!(!is_valid_binding("$.a..b"));
    }

    #[test]
    fn test_lookup_key_ignores_case_as_fallback() {
        let data = json!({ "Name": "upper", "name": "lower", "Other": 1 });
        assert_eq!(lookup_key(&data, "name"), Some(&json!("lower")));
        assert_eq!(lookup_key(&data, "other"), Some(&json!(1)));
        assert_eq!(lookup_key(&data, "missing"), None);
        assert_eq!(lookup_key(&json!([1, 2]), "name"), None);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("hello")), "hello");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!([1, 2])), "[1,2]");
    }
}
