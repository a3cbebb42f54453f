use crate::model::{Descriptor, RawRecord};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("input is not a JSON array of capability records: {0}")]
    Syntax(String),
}

/// Parses a capability table dump: a JSON array of records.
///
/// Strict JSON is tried first; hand-edited dumps with trailing commas or
/// unquoted keys fall back to JSON5. Record-level problems (missing fields,
/// non-numeric values) are absorbed by [`Descriptor::from_record`] rather
/// than rejected here.
pub fn parse_capabilities(input: &str) -> Result<Vec<Descriptor>, ParseError> {
    let records: Vec<RawRecord> = match serde_json::from_str(input) {
        Ok(records) => records,
        Err(json_err) => {
            json5::from_str(input).map_err(|_| ParseError::Syntax(json_err.to_string()))?
        }
    };
    Ok(records.into_iter().map(Descriptor::from_record).collect())
}

pub fn load_capabilities(path: &Path) -> Result<Vec<Descriptor>, ParseError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_capabilities(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_array() {
        let input = r#"[
            {"Tag": "1", "Permissions": "rwx", "Executive": "0", "Global": "1",
             "Object Type": "sealed", "Bounds": "0x0-0x40", "Address": "3",
             "Reference": 5, "Type": "A"},
            {"Tag": "1", "Permissions": "r", "Executive": "0", "Global": "0",
             "Object Type": "data", "Bounds": "0x40-0x80", "Address": 7,
             "Reference": "3", "Type": "A"}
        ]"#;
        let descriptors = parse_capabilities(input).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].reference, Some(5));
        assert_eq!(descriptors[0].address_value, Some(3));
        assert_eq!(descriptors[1].reference, Some(3));
        assert_eq!(descriptors[1].address_value, Some(7));
    }

    #[test]
    fn json5_fallback_accepts_trailing_commas() {
        let input = r#"[
            {"Type": "A", "Reference": 1, "Address": "2",},
        ]"#;
        let descriptors = parse_capabilities(input).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].type_name, "A");
    }

    #[test]
    fn rejects_non_array_input() {
        let err = parse_capabilities(r#"{"Type": "A"}"#).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_capabilities(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.json"));
    }
}
