use crate::constants;

pub(crate) fn is_structural_char(ch: char) -> bool {
    constants::is_structural_char(ch)
}

/// Whether `s` is one of the reserved literal keywords (`true`, `false`, `null`).
pub fn is_keyword(s: &str) -> bool {
    constants::is_keyword(s)
}

/// Whether `s` would round-trip as something other than a plain string if left
/// unquoted: a keyword literal or a numeric-like token.
///
/// # Examples
/// ```
/// use serde_toon::is_literal_like;
///
/// assert!(is_literal_like("true"));
/// assert!(is_literal_like("42"));
/// assert!(!is_literal_like("hello"));
/// ```
pub fn is_literal_like(s: &str) -> bool {
    is_keyword(s) || is_numeric_like(s)
}

/// Matches the spec's numeric-like predicate: `-?\d+(\.\d+)?(e[+-]?\d+)?`,
/// plus any leading-zero digit run (`007`) which must stay quoted to survive
/// a round trip.
fn is_numeric_like(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let mut idx = 0;
    if bytes[idx] == b'-' {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == int_start {
        return false;
    }
    if bytes[int_start] == b'0' && idx - int_start > 1 {
        return true;
    }

    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == frac_start {
            return false;
        }
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        idx += 1;
        if idx < bytes.len() && matches!(bytes[idx], b'+' | b'-') {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len()
}
