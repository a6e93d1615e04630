mod de;
mod ser;

pub(crate) use de::from_value;
pub(crate) use ser::to_value;

use std::io::{Read, Write};

use crate::types::{DecodeOptions, EncodeOptions, ToonError, ToonResult};

/// Decode TOON text into any deserializable type, using default options.
pub fn from_str<T: serde::de::DeserializeOwned>(input: &str) -> ToonResult<T> {
    crate::decode::decode_default(input)
}

/// Decode TOON text into any deserializable type, with explicit options.
pub fn from_str_with_options<T: serde::de::DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> ToonResult<T> {
    crate::decode::decode(input, options)
}

/// Decode TOON bytes (must be valid UTF-8) into any deserializable type.
pub fn from_slice<T: serde::de::DeserializeOwned>(input: &[u8]) -> ToonResult<T> {
    let text = std::str::from_utf8(input)
        .map_err(|e| ToonError::InvalidInput(format!("invalid UTF-8: {e}")))?;
    from_str(text)
}

/// Decode TOON bytes (must be valid UTF-8) into any deserializable type, with
/// explicit options.
pub fn from_slice_with_options<T: serde::de::DeserializeOwned>(
    input: &[u8],
    options: &DecodeOptions,
) -> ToonResult<T> {
    let text = std::str::from_utf8(input)
        .map_err(|e| ToonError::InvalidInput(format!("invalid UTF-8: {e}")))?;
    from_str_with_options(text, options)
}

/// Read all of `reader` and decode it as TOON, using default options.
pub fn from_reader<R: Read, T: serde::de::DeserializeOwned>(mut reader: R) -> ToonResult<T> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| ToonError::InvalidInput(format!("failed to read input: {e}")))?;
    from_slice(&buf)
}

/// Read all of `reader` and decode it as TOON, with explicit options.
pub fn from_reader_with_options<R: Read, T: serde::de::DeserializeOwned>(
    mut reader: R,
    options: &DecodeOptions,
) -> ToonResult<T> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| ToonError::InvalidInput(format!("failed to read input: {e}")))?;
    from_slice_with_options(&buf, options)
}

/// Encode any serializable value to a TOON `String`, using default options.
pub fn to_string<T: serde::Serialize>(value: &T) -> ToonResult<String> {
    crate::encode::encode_default(value)
}

/// Encode any serializable value to a TOON `String`, with explicit options.
pub fn to_string_with_options<T: serde::Serialize>(
    value: &T,
    options: &EncodeOptions,
) -> ToonResult<String> {
    crate::encode::encode(value, options)
}

/// Encode a `serde_json::Value` to a TOON `String`, using default options.
pub fn to_string_value(value: &serde_json::Value) -> ToonResult<String> {
    crate::encode::encode_value_default(value)
}

/// Encode a `serde_json::Value` to a TOON `String`, with explicit options.
pub fn to_string_value_with_options(
    value: &serde_json::Value,
    options: &EncodeOptions,
) -> ToonResult<String> {
    crate::encode::encode_value(value, options)
}

/// Encode any serializable value to TOON bytes, using default options.
pub fn to_vec<T: serde::Serialize>(value: &T) -> ToonResult<Vec<u8>> {
    crate::encode::encode_to_vec(value, &EncodeOptions::default())
}

/// Encode any serializable value to TOON bytes, with explicit options.
pub fn to_vec_with_options<T: serde::Serialize>(
    value: &T,
    options: &EncodeOptions,
) -> ToonResult<Vec<u8>> {
    crate::encode::encode_to_vec(value, options)
}

/// Encode a `serde_json::Value` to TOON bytes, using default options.
pub fn to_vec_value(value: &serde_json::Value) -> ToonResult<Vec<u8>> {
    crate::encode::encode_value_to_vec(value, &EncodeOptions::default())
}

/// Encode a `serde_json::Value` to TOON bytes, with explicit options.
pub fn to_vec_value_with_options(
    value: &serde_json::Value,
    options: &EncodeOptions,
) -> ToonResult<Vec<u8>> {
    crate::encode::encode_value_to_vec(value, options)
}

/// Encode any serializable value as TOON and write it to `writer`, using
/// default options.
pub fn to_writer<W: Write, T: serde::Serialize>(mut writer: W, value: &T) -> ToonResult<()> {
    let bytes = to_vec(value)?;
    writer
        .write_all(&bytes)
        .map_err(|e| ToonError::InvalidInput(format!("failed to write output: {e}")))
}

/// Encode any serializable value as TOON and write it to `writer`, with
/// explicit options.
pub fn to_writer_with_options<W: Write, T: serde::Serialize>(
    mut writer: W,
    value: &T,
    options: &EncodeOptions,
) -> ToonResult<()> {
    let bytes = to_vec_with_options(value, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| ToonError::InvalidInput(format!("failed to write output: {e}")))
}

/// Encode a `serde_json::Value` as TOON and write it to `writer`, using
/// default options.
pub fn to_writer_value<W: Write>(mut writer: W, value: &serde_json::Value) -> ToonResult<()> {
    let bytes = to_vec_value(value)?;
    writer
        .write_all(&bytes)
        .map_err(|e| ToonError::InvalidInput(format!("failed to write output: {e}")))
}

/// Encode a `serde_json::Value` as TOON and write it to `writer`, with
/// explicit options.
pub fn to_writer_value_with_options<W: Write>(
    mut writer: W,
    value: &serde_json::Value,
    options: &EncodeOptions,
) -> ToonResult<()> {
    let bytes = to_vec_value_with_options(value, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| ToonError::InvalidInput(format!("failed to write output: {e}")))
}
