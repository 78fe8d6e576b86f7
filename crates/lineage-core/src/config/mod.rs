use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// Settings shared by the layout, viewport and controller layers.
///
/// Stored as a JSON object addressed by dotted paths (`layout.nodeSpacing`). Overrides are
/// deep-merged onto [`LineageConfig::default`], so callers only spell out what they change.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageConfig(Value);

impl Default for LineageConfig {
    fn default() -> Self {
        Self(default_config_value())
    }
}

pub fn default_config_value() -> Value {
    json!({
        "layout": {
            "rankDir": "LR",
            "nodeSpacing": 40.0,
            "rankSpacing": 120.0,
            "rootWidth": 220.0,
            "rootHeight": 72.0,
            "nodeWidth": 180.0,
            "nodeHeight": 56.0,
            "orderSweeps": 8
        },
        "viewport": {
            "width": 1200.0,
            "height": 800.0,
            "fitPadding": 0.2,
            "fitDelayMs": 50,
            "minZoom": 0.1,
            "maxZoom": 2.0
        },
        "controls": {
            "defaultDirection": "upstream",
            "defaultDepth": 3,
            "maxDepth": 10,
            "bothStrategy": "split"
        },
        "style": {
            "defaultBorderColor": "#94a3b8",
            "borderColors": {
                "TABLE": "#2563eb",
                "VIEW": "#16a34a",
                "MATERIALIZED_VIEW": "#0d9488",
                "EXTERNAL_TABLE": "#9333ea",
                "FILE": "#d97706"
            }
        }
    })
}

impl LineageConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON object and merges it onto the defaults.
    pub fn from_json_overrides(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: "expected a JSON object at the top level".to_string(),
            });
        }
        let mut cfg = Self::default();
        cfg.deep_merge(&value);
        Ok(cfg)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.lookup(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_i64().map(|n| n as f64))
            .or_else(|| v.as_u64().map(|n| n as f64))
            .filter(|n| n.is_finite())
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        let v = self.lookup(dotted_path)?;
        v.as_u64()
            .or_else(|| v.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
    }

    /// Border color for an object type, falling back to `style.defaultBorderColor`.
    pub fn border_color(&self, object_type: &str) -> Option<&str> {
        let upper = object_type.trim().to_ascii_uppercase();
        self.lookup("style.borderColors")
            .and_then(Value::as_object)
            .and_then(|colors| colors.get(&upper))
            .and_then(Value::as_str)
            .or_else(|| self.get_str("style.defaultBorderColor"))
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Configs are objects; coerce anything else so this never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
