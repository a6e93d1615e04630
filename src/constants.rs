pub const KEYWORDS: &[&str] = &["null", "true", "false"];

pub const DEFAULT_INDENT: usize = 2;

pub const MAX_DEPTH: usize = 256;

/// 2^53 - 1, the largest integer a double can represent exactly.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;
pub const MIN_SAFE_INTEGER: i64 = -9_007_199_254_740_991;

#[inline]
pub fn is_structural_char(ch: char) -> bool {
    matches!(ch, '[' | ']' | '{' | '}' | ':' | '-')
}

#[inline]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}
