use rstest::rstest;
use serde_json::{json, Value};
use serde_toon::{DecodeOptions, Delimiter, EncodeOptions, Indent};

#[allow(dead_code)]
#[derive(Clone, Debug, Default)]
struct SpecOptions {
    delimiter: Option<char>,
    indent: Option<usize>,
    strict: Option<bool>,
}

#[allow(dead_code)]
impl SpecOptions {
    fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
}

#[allow(dead_code)]
struct Spec07Adapter;

impl Spec07Adapter {
    fn encode(_input: &Value, _options: &SpecOptions) -> Result<String, String> {
        let options = map_encode_options(_options);
        serde_toon::to_string_with_options(_input, &options).map_err(|err| err.to_string())
    }

    fn decode(_input: &str, _options: &SpecOptions) -> Result<Value, String> {
        let options = map_decode_options(_options);
        serde_toon::from_str_with_options(_input, &options).map_err(|err| err.to_string())
    }

}

fn map_encode_options(options: &SpecOptions) -> EncodeOptions {
    let mut encoded = EncodeOptions::default();
    if let Some(delimiter) = options.delimiter {
        encoded.delimiter = match delimiter {
            ',' => Delimiter::Comma,
            '\t' => Delimiter::Tab,
            '|' => Delimiter::Pipe,
            _ => Delimiter::Comma,
        };
    }
    if let Some(indent) = options.indent {
        encoded.indent = Indent::Spaces(indent);
    }
    encoded
}

fn map_decode_options(options: &SpecOptions) -> DecodeOptions {
    let mut decoded = DecodeOptions::default();
    if let Some(indent) = options.indent {
        decoded.indent = Indent::Spaces(indent);
    }
    if let Some(strict) = options.strict {
        decoded.strict = strict;
    }
    decoded
}

#[rstest]
#[case(json!({"v": ""}), Some("v: \"\""), SpecOptions::default())]
#[case(json!({"v": " leading"}), Some("v: \" leading\""), SpecOptions::default())]
#[case(json!({"v": "trailing "}), Some("v: \"trailing \""), SpecOptions::default())]
#[case(json!({"v": "true"}), Some("v: \"true\""), SpecOptions::default())]
#[case(json!({"v": "05"}), Some("v: \"05\""), SpecOptions::default())]
#[case(json!({"v": "1e6"}), Some("v: \"1e6\""), SpecOptions::default())]
#[case(json!({"v": "a:b"}), Some("v: \"a:b\""), SpecOptions::default())]
#[case(json!({"v": "a[b]"}), Some("v: \"a[b]\""), SpecOptions::default())]
#[case(json!({"v": "a{b}"}), Some("v: \"a{b}\""), SpecOptions::default())]
#[case(
    json!({"v": "a\nb\rc\t\"d\"\\e"}),
    Some("v: \"a\\nb\\rc\\t\\\"d\\\"\\\\e\""),
    SpecOptions::default()
)]
#[case(json!({"v": "a,b"}), Some("v: \"a,b\""), SpecOptions::default())]
#[case(
    json!({"v": "a,b"}),
    Some("v: a,b"),
    SpecOptions::default().with_delimiter('|')
)]
#[case(json!({"v": "-"}), Some("v: \"-\""), SpecOptions::default())]
#[case(json!({"v": "-lead"}), Some("v: \"-lead\""), SpecOptions::default())]
#[case(json!({"a.b": 1}), Some("a.b: 1"), SpecOptions::default())]
#[case(json!({"a-b": 1}), Some("\"a-b\": 1"), SpecOptions::default())]
fn spec07_strings_keys_encode(
    #[case] input: Value,
    #[case] expected: Option<&'static str>,
    #[case] options: SpecOptions,
) {
    match expected {
        Some(expected) => {
            let actual = Spec07Adapter::encode(&input, &options)
                .unwrap_or_else(|err| panic!("encode failed: {err}"));
            assert_eq!(actual, expected);
        }
        None => {
            assert!(Spec07Adapter::encode(&input, &options).is_err());
        }
    }
}

#[rstest]
#[case(
    "v: \"a\\nb\\rc\\t\\\"d\\\"\\\\e\"",
    Some(json!({"v": "a\nb\rc\t\"d\"\\e"})),
    SpecOptions::default()
)]
#[case("v: \"\\q\"", None, SpecOptions::default())]
#[case("\"a-b\": 1", Some(json!({"a-b": 1})), SpecOptions::default())]
#[case("a.b: 1", Some(json!({"a.b": 1})), SpecOptions::default())]
#[case("a-b: 1", None, SpecOptions::default().with_strict(true))]
#[case("key value", Some(json!("key value")), SpecOptions::default())]
fn spec07_strings_keys_decode(
    #[case] input: &str,
    #[case] expected: Option<Value>,
    #[case] options: SpecOptions,
) {
    match expected {
        Some(expected) => {
            let actual = Spec07Adapter::decode(input, &options)
                .unwrap_or_else(|err| panic!("decode failed: {err}"));
            assert_eq!(actual, expected);
        }
        None => {
            assert!(Spec07Adapter::decode(input, &options).is_err());
        }
    }
}

