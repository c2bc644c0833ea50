//! Typed per-node configuration.
//!
//! A node's settings are an ordered list of named fields. Each field holds a
//! [`ConfigValue`] whose kind is fixed by the catalog default the field was
//! seeded from, so assignments can be checked instead of trusted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a configuration field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
}

/// A primitive configuration value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            ConfigValue::Number(_) => FieldKind::Number,
            ConfigValue::Text(_) => FieldKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            ConfigValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Text(_) => None,
        }
    }

    /// False for NaN and infinite numbers, which JSON cannot carry.
    pub fn is_finite(&self) -> bool {
        match self {
            ConfigValue::Number(n) => n.is_finite(),
            ConfigValue::Text(_) => true,
        }
    }

    /// Parse raw UI text into a value of the given kind.
    ///
    /// Text fields accept anything. Number fields accept anything `f64`
    /// parses after trimming, an empty string is rejected.
    pub fn coerce(
        kind: FieldKind,
        raw: &str,
    ) -> Option<Self> {
        match kind {
            FieldKind::Text => Some(ConfigValue::Text(raw.to_string())),
            FieldKind::Number => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(ConfigValue::Number),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

/// One named configuration field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigField {
    pub name: String,
    pub value: ConfigValue,
}

/// Ordered mapping from field name to value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct NodeConfig {
    fields: Vec<ConfigField>,
}

impl NodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces an existing field of the same name in place.
    pub fn with(
        mut self,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(
        &mut self,
        name: &str,
        value: ConfigValue,
    ) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(ConfigField {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&ConfigValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub(crate) fn get_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut ConfigValue> {
        self.fields.iter_mut().find(|f| f.name == name).map(|f| &mut f.value)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigField> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number_field() {
        assert_eq!(ConfigValue::coerce(FieldKind::Number, " 250 "), Some(ConfigValue::Number(250.0)));
        assert_eq!(ConfigValue::coerce(FieldKind::Number, "12.5"), Some(ConfigValue::Number(12.5)));
        assert_eq!(ConfigValue::coerce(FieldKind::Number, ""), None);
        assert_eq!(ConfigValue::coerce(FieldKind::Number, "ten"), None);
        assert_eq!(ConfigValue::coerce(FieldKind::Number, "NaN"), None);
    }

    #[test]
    fn test_coerce_text_field_keeps_raw() {
        assert_eq!(ConfigValue::coerce(FieldKind::Text, " 42 "), Some(ConfigValue::Text(" 42 ".to_string())));
    }

    #[test]
    fn test_config_preserves_insertion_order() {
        let config = NodeConfig::new().with("to", "").with("message", "hi").with("senderId", "AFREASY");
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["to", "message", "senderId"]);

        let config = config.with("to", "+254700000000");
        let names: Vec<&str> = config.names().collect();
        assert_eq!(names, vec!["to", "message", "senderId"]);
        assert_eq!(config.get("to"), Some(&ConfigValue::from("+254700000000")));
    }

    #[test]
    fn test_config_serializes_as_ordered_list() {
        let config = NodeConfig::new().with("amount", 0.0).with("currency", "KES");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "amount", "value": 0.0},
                {"name": "currency", "value": "KES"}
            ])
        );

        let back: NodeConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
