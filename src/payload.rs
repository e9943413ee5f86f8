use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Ordered mapping of named fields to values, the record shape of a payload
pub type Record = serde_json::Map<String, Value>;

/// The data value flowing through a pipeline
///
/// A payload takes one of three shapes, and its shape may change between
/// stages (e.g. raw text becomes a record after parsing). Stages match
/// exhaustively on the variants instead of probing runtime content.
///
/// # Example
/// ```
/// use nexus_pipeline::Payload;
/// use serde_json::json;
///
/// let reading = Payload::record([("sensor", json!("temp")), ("value", json!(23.5))]);
/// assert!(!reading.is_empty());
/// assert_eq!(reading.render(), r#"{"sensor":"temp","value":23.5}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// An ordered mapping of named fields to values
    Record(Record),

    /// Raw text
    Text(String),

    /// An opaque, unstructured value
    Token(Value),
}

impl Payload {
    /// Create a record payload from named fields, preserving field order
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut record = Record::new();
        for (key, value) in fields {
            record.insert(key.into(), value);
        }
        Payload::Record(record)
    }

    /// Create a text payload
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    /// Create an opaque token payload
    pub fn token(value: impl Into<Value>) -> Self {
        Payload::Token(value.into())
    }

    /// Whether the payload carries no data
    ///
    /// Empty text, an empty record, and a null/empty token all count as
    /// empty; the intake stage rejects these.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Record(record) => record.is_empty(),
            Payload::Text(text) => text.is_empty(),
            Payload::Token(value) => match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(items) => items.is_empty(),
                _ => false,
            },
        }
    }

    /// Borrow the record fields, if the payload is a record
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Payload::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Borrow the text, if the payload is raw text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render the payload as a human-readable string
    ///
    /// Text renders as-is; records and tokens render as JSON. This is what
    /// a pipeline reports as its final output.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Record(record) => write!(f, "{}", Value::Object(record.clone())),
            Payload::Token(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_field_order() {
        let payload = Payload::record([
            ("sensor", json!("temp")),
            ("value", json!(23.5)),
            ("unit", json!("C")),
        ]);
        let record = payload.as_record().unwrap();
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["sensor", "value", "unit"]);
    }

    #[test]
    fn test_empty_text_is_empty() {
        assert!(Payload::text("").is_empty());
        assert!(!Payload::text("Real-time sensor stream").is_empty());
    }

    #[test]
    fn test_empty_record_is_empty() {
        assert!(Payload::Record(Record::new()).is_empty());
        assert!(!Payload::record([("sensor", json!("temp"))]).is_empty());
    }

    #[test]
    fn test_empty_tokens() {
        assert!(Payload::token(Value::Null).is_empty());
        assert!(Payload::token("").is_empty());
        assert!(Payload::token(json!([])).is_empty());
        assert!(!Payload::token(json!(0)).is_empty());
        assert!(!Payload::token(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_render_text_as_is() {
        assert_eq!(Payload::text("hello").render(), "hello");
    }

    #[test]
    fn test_render_record_as_json() {
        let payload = Payload::record([("kind", json!("csv")), ("count", json!(1))]);
        assert_eq!(payload.render(), r#"{"kind":"csv","count":1}"#);
    }

    #[test]
    fn test_render_token_as_json() {
        assert_eq!(Payload::token(json!(42)).render(), "42");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Payload::text("raw").as_text(), Some("raw"));
        assert_eq!(Payload::token(json!("raw")).as_text(), None);
    }
}
