use crate::types::{ToonError, ToonResult};

pub fn validate_depth(depth: usize, max_depth: usize) -> ToonResult<()> {
    if depth > max_depth {
        return Err(ToonError::InvalidStructure(format!(
            "Maximum nesting depth of {max_depth} exceeded"
        )));
    }
    Ok(())
}
