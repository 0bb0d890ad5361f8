//! Object key translation between wire naming and Rust field naming

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Naming convention every object key is rewritten to before field matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyConvention {
    /// Keys are matched exactly as they appear on the wire
    #[default]
    Preserve,
    /// `userName` / `user-name` become `user_name`
    SnakeCase,
    /// `user_name` / `user-name` become `userName`
    CamelCase,
    /// `user_name` / `userName` become `user-name`
    KebabCase,
}

impl KeyConvention {
    /// Convert a single key
    pub fn convert_key(&self, key: &str) -> String {
        match self {
            Self::Preserve => key.to_string(),
            Self::SnakeCase => key.to_snake_case(),
            Self::CamelCase => key.to_lower_camel_case(),
            Self::KebabCase => key.to_kebab_case(),
        }
    }

    /// Rewrite every object key in a JSON document, recursively.
    ///
    /// When two keys of one object convert to the same name, the one that
    /// appears later in the document wins.
    pub fn apply(&self, value: Value) -> Value {
        if *self == Self::Preserve {
            return value;
        }
        self.rewrite(value)
    }

    fn rewrite(&self, value: Value) -> Value {
        match value {
            Value::Object(entries) => {
                let converted: Map<String, Value> = entries
                    .into_iter()
                    .map(|(key, inner)| (self.convert_key(&key), self.rewrite(inner)))
                    .collect();
                Value::Object(converted)
            }
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.rewrite(v)).collect()),
            other => other,
        }
    }
}
