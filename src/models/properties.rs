//! Result record returned by lookups.

use serde::{Deserialize, Serialize};

/// Code and display names of a matched region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Properties {
    /// JMA / municipal area code, e.g. "1310100"
    pub code: String,

    /// Japanese display name, e.g. "千代田区"
    pub name: String,

    /// English name, when the dataset provides one
    #[serde(rename = "enName", skip_serializing_if = "Option::is_none", default)]
    pub en_name: Option<String>,
}

impl Properties {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            en_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_name_omitted_when_missing() {
        let props = Properties::new("130010", "東京都");
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"code":"130010","name":"東京都"}"#);
    }

    #[test]
    fn test_en_name_serialized() {
        let mut props = Properties::new("270000", "大阪府");
        props.en_name = Some("Osaka".to_string());
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["enName"], "Osaka");
    }
}
