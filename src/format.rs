use serde::{Deserialize, Serialize};
use std::fmt;

/// Format tag used to route payloads to a pipeline
///
/// The tag is a routing key only: it never alters which stages run or how
/// they transform data. Pipelines registered under the same tag are
/// tie-broken by registration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Json,
    Csv,
    Stream,
}

impl FormatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Json => "json",
            FormatTag::Csv => "csv",
            FormatTag::Stream => "stream",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(FormatTag::Json),
            "csv" => Some(FormatTag::Csv),
            "stream" => Some(FormatTag::Stream),
            _ => None,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trip() {
        for tag in [FormatTag::Json, FormatTag::Csv, FormatTag::Stream] {
            assert_eq!(FormatTag::from_str(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn test_from_str_unknown() {
        assert_eq!(FormatTag::from_str("xml"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FormatTag::Json.to_string(), "json");
        assert_eq!(FormatTag::Stream.to_string(), "stream");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&FormatTag::Csv).unwrap();
        assert_eq!(json, "\"csv\"");
        let tag: FormatTag = serde_json::from_str("\"stream\"").unwrap();
        assert_eq!(tag, FormatTag::Stream);
    }
}
