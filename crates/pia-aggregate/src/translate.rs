use serde_json::Value;

/// Resolves stable label keys (`summary.dpo_name`, `pia.statuses.2`, ...)
/// into display strings. The engine only ever emits keys; language text
/// lives with the implementor.
pub trait Translator: Send + Sync {
    fn instant(&self, key: &str) -> String;
}

/// Leaves every key untranslated. Used when the client translates.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn instant(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Looks keys up in a nested JSON translation file, where `a.b.c` walks
/// `{"a": {"b": {"c": "text"}}}`. Unknown keys fall back to the key itself.
#[derive(Debug, Clone)]
pub struct JsonTranslator {
    root: Value,
}

impl JsonTranslator {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            root: serde_json::from_str(json)?,
        })
    }
}

impl Translator for JsonTranslator {
    fn instant(&self, key: &str) -> String {
        key.split('.')
            .try_fold(&self.root, |node, segment| node.get(segment))
            .and_then(Value::as_str)
            .map_or_else(|| key.to_string(), str::to_string)
    }
}
