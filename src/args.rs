use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The untyped key/value map delivered with a tool invocation. Constructed
/// fresh per call and discarded with the response; handlers pull typed
/// values out of it with [`ArgumentBag::get`].
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ArgumentBag(pub Map<String, Value>);

impl ArgumentBag {
    /// Extract a typed value, falling back to `default` when the key is
    /// absent or the value does not match the default's shape. The fallback
    /// is deliberately silent; required-field checks are the handler's job.
    pub fn get<T: FromArg>(&self, key: &str, default: T) -> T {
        self.0.get(key).and_then(T::from_arg).unwrap_or(default)
    }

    /// The raw JSON value for keys that need structural parsing (2-D data
    /// arrays, color objects, recipient lists).
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Exact-shape extraction from a dynamic value. Numbers always come off the
/// wire as f64; integral parameters truncate after extraction.
pub trait FromArg: Sized {
    fn from_arg(value: &Value) -> Option<Self>;
}

impl FromArg for String {
    fn from_arg(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromArg for f64 {
    fn from_arg(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromArg for bool {
    fn from_arg(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}
