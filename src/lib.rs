//! # Serde TOON
//!
//! `serde_toon` is a Serde-compatible implementation of TOON v3.0 with v1.5
//! optional features. The API mirrors `serde_json` helpers while preserving
//! TOON-specific encode/decode options.
//!
//! ## Example
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_toon::{from_str, to_string};
//! # use serde_toon::Error;
//! #[derive(Debug, Serialize, Deserialize, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! # fn main() -> Result<(), serde_toon::Error> {
//! let user = User {
//!     name: "Ada".to_string(),
//!     age: 37,
//! };
//!
//! let toon = to_string(&user)?;
//! let round_trip: User = from_str(&toon)?;
//! assert_eq!(user, round_trip);
//! # Ok(())
//! # }
//! ```
#![warn(rustdoc::missing_crate_level_docs)]

mod constants;
mod decode;
mod encode;
mod serde;
mod types;
mod utils;

pub use serde_json::{Map, Number, Value};

pub use decode::{decode, decode_default, decode_strict, decode_strict_with_options};
pub use encode::{encode, encode_default, encode_value, encode_value_default};
pub use serde::{
    from_reader, from_reader_with_options, from_slice, from_slice_with_options, from_str,
    from_str_with_options, to_string, to_string_value, to_string_value_with_options,
    to_string_with_options, to_vec, to_vec_value, to_vec_value_with_options, to_vec_with_options,
    to_writer, to_writer_value, to_writer_value_with_options, to_writer_with_options,
};

pub use types::{
    is_identifier_segment, DecodeOptions, Delimiter, EncodeOptions, ErrorContext, Indent,
    ToonError, ToonResult,
};

pub use types::{ToonError as Error, ToonResult as Result};

pub use utils::{
    literal::{is_keyword, is_literal_like},
    string::{escape_string, is_valid_unquoted_key, needs_quoting},
};
