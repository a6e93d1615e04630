use itoa::Buffer as ItoaBuffer;
use ryu::Buffer as RyuBuffer;

use crate::types::Number;
use crate::utils::text::TextBuffer;

pub(crate) fn write_canonical_number_into<B: TextBuffer>(n: &Number, out: &mut B) {
    match n {
        Number::PosInt(u) => write_u64(out, *u),
        Number::NegInt(i) => write_i64(out, *i),
        Number::Float(f) => write_f64_canonical_into(*f, out),
    }
}

fn write_u64<B: TextBuffer>(out: &mut B, value: u64) {
    let mut buf = ItoaBuffer::new();
    out.push_str(buf.format(value));
}

fn write_i64<B: TextBuffer>(out: &mut B, value: i64) {
    let mut buf = ItoaBuffer::new();
    out.push_str(buf.format(value));
}

fn write_f64_canonical_into<B: TextBuffer>(f: f64, out: &mut B) {
    // Normalize integer-valued floats to integers
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        write_i64(out, f as i64);
        return;
    }

    if !f.is_finite() {
        out.push_char('0');
        return;
    }

    if f == 0.0 {
        out.push_char('0');
        return;
    }

    let mut buf = RyuBuffer::new();
    let formatted = buf.format(f);

    // Handle cases where Rust would use exponential notation
    if formatted.contains('e') || formatted.contains('E') {
        out.push_str(&expand_exponent(formatted));
    } else {
        push_trimmed_decimal(formatted, out);
    }
}

/// Repositions ryu's exact significant digits by the exponent instead of
/// re-deriving decimal text at a fixed precision, so magnitudes ryu renders
/// in exponential form (very large or very small) lose no precision.
fn expand_exponent(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut i = 0;
    let mut negative = false;
    if bytes.get(i) == Some(&b'-') {
        negative = true;
        i += 1;
    }

    let mut digits = String::new();
    let mut dot_pos = None;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                digits.push(bytes[i] as char);
                i += 1;
            }
            b'.' => {
                dot_pos = Some(digits.len());
                i += 1;
            }
            b'e' | b'E' => {
                i += 1;
                break;
            }
            _ => {
                i += 1;
            }
        }
    }

    let mut exp_sign = 1i32;
    if i < bytes.len() {
        if bytes[i] == b'-' {
            exp_sign = -1;
            i += 1;
        } else if bytes[i] == b'+' {
            i += 1;
        }
    }

    let mut exp: i32 = 0;
    while i < bytes.len() {
        if let b'0'..=b'9' = bytes[i] {
            exp = exp
                .saturating_mul(10)
                .saturating_add((bytes[i] - b'0') as i32);
        }
        i += 1;
    }
    exp *= exp_sign;

    let dot_pos = dot_pos.unwrap_or(digits.len());
    let new_pos = dot_pos as i32 + exp;
    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if new_pos <= 0 {
        out.push('0');
        out.push('.');
        out.extend(std::iter::repeat_n('0', (-new_pos) as usize));
        out.push_str(&digits);
        return trim_number_string(out);
    }

    if new_pos as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', new_pos as usize - digits.len()));
        return trim_number_string(out);
    }

    let pos = new_pos as usize;
    out.push_str(&digits[..pos]);
    out.push('.');
    out.push_str(&digits[pos..]);
    trim_number_string(out)
}

fn trim_number_string(mut value: String) -> String {
    if let Some(dot) = value.find('.') {
        let mut end = value.len();
        while end > dot + 1 && value.as_bytes()[end - 1] == b'0' {
            end -= 1;
        }
        value.truncate(end);
        if value.ends_with('.') {
            value.pop();
        }
    }
    let digits = value
        .trim_start_matches('-')
        .chars()
        .filter(|ch| *ch != '.')
        .collect::<String>();
    if digits.chars().all(|ch| ch == '0') {
        return "0".to_string();
    }
    value
}

#[cfg(test)]
fn remove_trailing_zeros(s: &str) -> String {
    if let Some((int_part, frac_part)) = s.split_once('.') {
        let trimmed = frac_part.trim_end_matches('0');
        if trimmed.is_empty() {
            int_part.to_string()
        } else {
            let mut out = String::with_capacity(int_part.len() + 1 + trimmed.len());
            out.push_str(int_part);
            out.push('.');
            out.push_str(trimmed);
            out
        }
    } else {
        // No decimal point, return as-is
        s.to_string()
    }
}

fn push_trimmed_decimal<B: TextBuffer>(s: &str, out: &mut B) {
    if let Some((int_part, frac_part)) = s.split_once('.') {
        let trimmed = frac_part.trim_end_matches('0');
        if trimmed.is_empty() {
            out.push_str(int_part);
        } else {
            out.push_str(int_part);
            out.push_char('.');
            out.push_str(trimmed);
        }
    } else {
        out.push_str(s);
    }
}
