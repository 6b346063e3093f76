//! The `ValueRange` body returned by `spreadsheets.values.get`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One spreadsheet row: cells in column order. Trailing empty cells are
/// omitted by the API, so rows may be shorter than the requested range.
pub type Row = Vec<String>;

/// A block of cells read from a spreadsheet range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// The A1 range the values cover, as resolved by the API (e.g. "Members!A2:S412").
    #[serde(default)]
    pub range: String,

    /// "ROWS" or "COLUMNS".
    #[serde(default)]
    pub major_dimension: String,

    /// Cell values. The API omits the field entirely for an empty range.
    #[serde(default, deserialize_with = "deserialize_rows")]
    pub values: Vec<Row>,
}

/// Renders every cell as a string regardless of how the API typed it.
/// Unformatted reads return numbers and booleans; `null` becomes "".
fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<Row>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<Value>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_cells_render_as_strings() {
        let json = r#"{"range":"S!A1:C1","majorDimension":"ROWS","values":[["a",12,true,null,1.5]]}"#;
        let vr: ValueRange = serde_json::from_str(json).unwrap();
        assert_eq!(vr.values, vec![vec!["a", "12", "TRUE", "", "1.5"]]);
    }

    #[test]
    fn missing_values_is_empty() {
        let json = r#"{"range":"S!A1:C9","majorDimension":"ROWS"}"#;
        let vr: ValueRange = serde_json::from_str(json).unwrap();
        assert!(vr.values.is_empty());
    }
}
