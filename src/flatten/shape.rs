//! A uniform view over nested values (JSON, YAML) used by the flattener and
//! the payload decoder.

use serde_json::Value;

/// The shape of one node in a nested structure
#[derive(Debug)]
pub enum Shape<'a, T> {
    Null,
    /// A leaf already rendered to its ledger string form
    Scalar(String),
    Sequence(Vec<&'a T>),
    /// Entries in document order, keys rendered to strings
    Mapping(Vec<(String, &'a T)>),
}

/// A nested value the flattener can walk
pub trait Structured: Sized {
    fn shape(&self) -> Shape<'_, Self>;

    /// Compact one-line text of the whole value, used where a nested value
    /// has to be stored as a single ledger value
    fn inline_text(&self) -> String;
}

/// Render a scalar the way ledger values are written.
///
/// `null` becomes `""`, booleans `true`/`false`, numbers and strings their
/// natural form. Returns `None` for sequences and mappings.
pub fn stringify<T: Structured>(value: &T) -> Option<String> {
    match value.shape() {
        Shape::Null => Some(String::new()),
        Shape::Scalar(text) => Some(text),
        Shape::Sequence(_) | Shape::Mapping(_) => None,
    }
}

/// [`stringify`] for scalars, the value's inline text for containers
pub fn stringify_any<T: Structured>(value: &T) -> String {
    stringify(value).unwrap_or_else(|| value.inline_text())
}

impl Structured for Value {
    fn shape(&self) -> Shape<'_, Self> {
        match self {
            Value::Null => Shape::Null,
            Value::Bool(b) => Shape::Scalar(b.to_string()),
            Value::Number(n) => Shape::Scalar(n.to_string()),
            Value::String(s) => Shape::Scalar(s.clone()),
            Value::Array(items) => Shape::Sequence(items.iter().collect()),
            Value::Object(map) => {
                Shape::Mapping(map.iter().map(|(k, v)| (k.clone(), v)).collect())
            }
        }
    }

    fn inline_text(&self) -> String {
        self.to_string()
    }
}

#[cfg(feature = "yaml")]
impl Structured for serde_yaml::Value {
    fn shape(&self) -> Shape<'_, Self> {
        use serde_yaml::Value as Yaml;

        match self {
            Yaml::Null => Shape::Null,
            Yaml::Bool(b) => Shape::Scalar(b.to_string()),
            Yaml::Number(n) => Shape::Scalar(n.to_string()),
            Yaml::String(s) => Shape::Scalar(s.clone()),
            Yaml::Sequence(items) => Shape::Sequence(items.iter().collect()),
            Yaml::Mapping(map) => {
                Shape::Mapping(map.iter().map(|(k, v)| (yaml_key(k), v)).collect())
            }
            Yaml::Tagged(tagged) => tagged.value.shape(),
        }
    }

    /// JSON text where the value has a JSON form, otherwise block YAML
    fn inline_text(&self) -> String {
        serde_json::to_string(self)
            .or_else(|_| serde_yaml::to_string(self).map(|text| text.trim_end().to_string()))
            .unwrap_or_default()
    }
}

/// YAML allows any value as a mapping key. A null key is spelled `null` so
/// its path is never empty, other scalars use their ledger form and anything
/// else its inline text.
#[cfg(feature = "yaml")]
fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::Null => "null".to_string(),
        _ => stringify_any(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify_json_scalars() {
        assert_eq!(stringify(&json!(null)).unwrap(), "");
        assert_eq!(stringify(&json!(true)).unwrap(), "true");
        assert_eq!(stringify(&json!(false)).unwrap(), "false");
        assert_eq!(stringify(&json!(42)).unwrap(), "42");
        assert_eq!(stringify(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(stringify(&json!("Nova")).unwrap(), "Nova");
        assert!(stringify(&json!([1])).is_none());
        assert!(stringify(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_json_mapping_keeps_document_order() {
        let value = json!({"zeta": 1, "alpha": 2});
        let Shape::Mapping(entries) = value.shape() else {
            panic!("expected a mapping");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_non_string_keys() {
        let value: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\n").unwrap();
        let Shape::Mapping(entries) = value.shape() else {
            panic!("expected a mapping");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "true"]);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_null_key_is_spelled_out() {
        let value: serde_yaml::Value = serde_yaml::from_str("~: v\n").unwrap();
        let Shape::Mapping(entries) = value.shape() else {
            panic!("expected a mapping");
        };
        assert_eq!(entries[0].0, "null");
    }

    #[test]
    fn test_stringify_any_renders_containers_inline() {
        assert_eq!(stringify_any(&json!(7)), "7");
        assert_eq!(stringify_any(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(stringify_any(&json!({"x": 1})), r#"{"x":1}"#);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_sequence_inline_text_is_json() {
        let value: serde_yaml::Value = serde_yaml::from_str("[a, 1, true]").unwrap();
        assert_eq!(value.inline_text(), r#"["a",1,true]"#);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_tagged_value_uses_inner_shape() {
        let value: serde_yaml::Value = serde_yaml::from_str("!thing 7").unwrap();
        assert_eq!(stringify(&value).unwrap(), "7");
    }
}
