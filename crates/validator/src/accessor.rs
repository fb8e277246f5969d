//! Dotted-path access over a validated payload
//!
//! A [`DataAccessor`] owns one payload and answers two different questions:
//! whether a field is *present*, and what its value is. A present field may
//! hold `null`; that is a normal state, distinct from absence.
//!
//! Paths like `"a.b.c"` walk objects by key and arrays by decimal index. Any
//! missing hop, or a scalar in the middle of the path, means the whole path
//! is absent.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Separator between path segments.
const PATH_SEPARATOR: char = '.';

/// Errors raised when reading a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The path does not exist in the payload.
    #[error("field '{0}' not found")]
    FieldNotFound(String),

    /// The field exists but could not be deserialized into the requested type.
    #[error("field '{path}' has an unexpected shape: {reason}")]
    Conversion {
        /// Path that was read.
        path: String,
        /// Deserializer message.
        reason: String,
    },

    /// The payload could not be turned into a JSON value.
    #[error("payload is not representable as structured data: {0}")]
    Payload(String),
}

/// Read-only view over a payload of arbitrary depth.
///
/// # Examples
///
/// ```
/// use fieldcheck_validator::DataAccessor;
/// use serde_json::json;
///
/// let data = DataAccessor::new(json!({"a": {"b": {"c": 5}}, "n": null}));
///
/// assert_eq!(data.field("a.b.c").unwrap(), &json!(5));
/// assert!(!data.has_field("a.b.x"));
/// assert!(data.has_field("n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataAccessor {
    payload: Value,
}

impl DataAccessor {
    /// Wraps a payload.
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Wraps any serializable object-like value.
    pub fn from_serialize<T: Serialize + ?Sized>(payload: &T) -> Result<Self, AccessError> {
        serde_json::to_value(payload)
            .map(Self::new)
            .map_err(|e| AccessError::Payload(e.to_string()))
    }

    /// Returns true if every hop of `path` exists.
    #[must_use]
    pub fn has_field(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Returns the value at `path`, which may be `null`.
    pub fn field(&self, path: &str) -> Result<&Value, AccessError> {
        self.lookup(path)
            .ok_or_else(|| AccessError::FieldNotFound(path.to_string()))
    }

    /// Returns the value at `path`, or `default` when the path is absent.
    #[must_use]
    pub fn field_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.lookup(path).unwrap_or(default)
    }

    /// Deserializes the value at `path` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, AccessError> {
        let value = self.field(path)?;
        T::deserialize(value).map_err(|e| AccessError::Conversion {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Borrows the whole payload.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.payload
    }

    /// Returns the whole payload.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.payload
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        if !path.contains(PATH_SEPARATOR) {
            return child(&self.payload, path);
        }
        path.split(PATH_SEPARATOR)
            .try_fold(&self.payload, |current, segment| child(current, segment))
    }
}

/// Single existence check: key-exists for objects, index-in-bounds for arrays.
fn child<'a>(container: &'a Value, segment: &str) -> Option<&'a Value> {
    match container {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

impl From<Value> for DataAccessor {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

impl From<DataAccessor> for Value {
    fn from(accessor: DataAccessor) -> Self {
        accessor.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DataAccessor {
        DataAccessor::new(json!({
            "id": 7,
            "flag": false,
            "empty": "",
            "nothing": null,
            "user": {"address": {"zip": "12345"}},
            "tags": ["a", {"name": "b"}],
            "dotted.key": 1
        }))
    }

    #[test]
    fn test_single_segment() {
        let data = sample();
        assert!(data.has_field("id"));
        assert!(!data.has_field("missing"));
    }

    #[test]
    fn test_falsy_values_are_present() {
        let data = sample();
        assert!(data.has_field("flag"));
        assert!(data.has_field("empty"));
        assert!(data.has_field("nothing"));
        assert_eq!(data.field("nothing").unwrap(), &Value::Null);
    }

    #[test]
    fn test_nested_path() {
        let data = sample();
        assert_eq!(data.field("user.address.zip").unwrap(), &json!("12345"));
        assert!(!data.has_field("user.address.city"));
        assert!(!data.has_field("user.missing.zip"));
    }

    #[test]
    fn test_scalar_intermediate_is_absent() {
        let data = sample();
        assert!(!data.has_field("id.value"));
    }

    #[test]
    fn test_array_index_segments() {
        let data = sample();
        assert_eq!(data.field("tags.0").unwrap(), &json!("a"));
        assert_eq!(data.field("tags.1.name").unwrap(), &json!("b"));
        assert!(!data.has_field("tags.2"));
        assert!(!data.has_field("tags.x"));
    }

    #[test]
    fn test_dotted_keys_are_split() {
        let data = sample();
        assert!(!data.has_field("dotted.key"));
    }

    #[test]
    fn test_field_not_found() {
        let data = sample();
        assert_eq!(
            data.field("user.name"),
            Err(AccessError::FieldNotFound("user.name".to_string()))
        );
    }

    #[test]
    fn test_field_or_default() {
        let data = sample();
        let fallback = json!("fallback");
        assert_eq!(data.field_or("missing", &fallback), &fallback);
        assert_eq!(data.field_or("nothing", &fallback), &Value::Null);
    }

    #[test]
    fn test_get_as() {
        let data = sample();
        assert_eq!(data.get_as::<u32>("id").unwrap(), 7);
        assert!(matches!(
            data.get_as::<u32>("empty"),
            Err(AccessError::Conversion { .. })
        ));
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Profile {
            name: &'static str,
            age: Option<u8>,
        }

        let data = DataAccessor::from_serialize(&Profile {
            name: "ada",
            age: None,
        })
        .unwrap();
        assert_eq!(data.field("name").unwrap(), &json!("ada"));
        assert!(data.has_field("age"));
    }

    #[test]
    fn test_top_level_array() {
        let data = DataAccessor::new(json!([10, 20]));
        assert!(data.has_field("1"));
        assert!(!data.has_field("2"));
    }
}
