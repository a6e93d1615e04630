use crate::types::{ToonError, ToonResult};
use std::collections::HashSet;

pub fn validate_array_length(expected: usize, actual: usize) -> ToonResult<()> {
    if expected != actual {
        return Err(ToonError::length_mismatch(expected, actual));
    }
    Ok(())
}

pub fn validate_array_length_non_negative(length: i64) -> ToonResult<()> {
    if length < 0 {
        return Err(ToonError::InvalidInput(
            "Array length must be non-negative".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_field_list(fields: &[String]) -> ToonResult<()> {
    if fields.is_empty() {
        return Err(ToonError::InvalidInput(
            "Field list cannot be empty for tabular arrays".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.is_empty() {
            return Err(ToonError::InvalidInput(
                "Field name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(field.as_str()) {
            return Err(ToonError::InvalidInput(format!(
                "Duplicate field name: '{field}'"
            )));
        }
    }

    Ok(())
}

pub fn validate_delimiter_consistency(
    detected: Option<crate::types::Delimiter>,
    expected: Option<crate::types::Delimiter>,
) -> ToonResult<()> {
    if let (Some(detected), Some(expected)) = (detected, expected) {
        if detected != expected {
            return Err(ToonError::InvalidDelimiter(format!(
                "Detected delimiter {detected} but expected {expected}"
            )));
        }
    }
    Ok(())
}
