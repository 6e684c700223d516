//! Schema fragments shared between endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Round identifier that may arrive as a JSON number or a string (query
/// parameters always arrive as strings).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RoundField {
    /// Round sent as a JSON number.
    Number(i64),
    /// Round sent as a string, e.g. from a query parameter.
    Text(String),
}

impl RoundField {
    /// Interpret the field as an integer round number, if possible.
    pub fn as_round(&self) -> Option<i64> {
        match self {
            RoundField::Number(value) => Some(*value),
            RoundField::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_parse_from_numbers_and_strings() {
        let number: RoundField = serde_json::from_value(serde_json::json!(3)).unwrap();
        assert_eq!(number.as_round(), Some(3));

        let text: RoundField = serde_json::from_value(serde_json::json!(" 2 ")).unwrap();
        assert_eq!(text.as_round(), Some(2));

        let junk: RoundField = serde_json::from_value(serde_json::json!("next")).unwrap();
        assert_eq!(junk.as_round(), None);
    }
}
