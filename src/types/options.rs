use crate::{constants::DEFAULT_INDENT, types::Delimiter};

/// Indentation style used for nested structures.
///
/// # Examples
/// ```
/// use serde_toon::Indent;
///
/// let indent = Indent::Spaces(2);
/// let _ = indent;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(DEFAULT_INDENT)
    }
}

impl Indent {
    /// Return the indentation string for a given depth.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::Indent;
    ///
    /// let indent = Indent::Spaces(2);
    /// assert_eq!(indent.get_string(2), "    ");
    /// ```
    pub fn get_string(&self, depth: usize) -> String {
        if depth == 0 {
            return String::new();
        }

        match self {
            Indent::Spaces(count) => {
                if *count > 0 {
                    " ".repeat(*count * depth)
                } else {
                    String::new()
                }
            }
        }
    }

    /// Return the number of spaces used for indentation.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::Indent;
    ///
    /// let indent = Indent::Spaces(4);
    /// assert_eq!(indent.get_spaces(), 4);
    /// ```
    pub fn get_spaces(&self) -> usize {
        match self {
            Indent::Spaces(count) => *count,
        }
    }
}

/// Options for encoding JSON values to TOON format.
///
/// # Examples
/// ```
/// use serde_toon::{Delimiter, EncodeOptions};
///
/// let opts = EncodeOptions::new().with_delimiter(Delimiter::Pipe);
/// let _ = opts;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub delimiter: Delimiter,
    pub indent: Indent,
    pub length_marker: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            indent: Indent::default(),
            length_marker: false,
        }
    }
}

impl EncodeOptions {
    /// Create new encoding options with defaults.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::EncodeOptions;
    ///
    /// let opts = EncodeOptions::new();
    /// let _ = opts;
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter for array elements.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::{Delimiter, EncodeOptions};
    ///
    /// let opts = EncodeOptions::new().with_delimiter(Delimiter::Tab);
    /// let _ = opts;
    /// ```
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the indentation string for nested structures.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::{EncodeOptions, Indent};
    ///
    /// let opts = EncodeOptions::new().with_indent(Indent::Spaces(4));
    /// let _ = opts;
    /// ```
    pub fn with_indent(mut self, style: Indent) -> Self {
        self.indent = style;
        self
    }

    /// Set indentation to a specific number of spaces.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::EncodeOptions;
    ///
    /// let opts = EncodeOptions::new().with_spaces(2);
    /// let _ = opts;
    /// ```
    pub fn with_spaces(mut self, count: usize) -> Self {
        self.indent = Indent::Spaces(count);
        self
    }

    /// Emit the optional `#` length marker on array headers (`[#N]` instead
    /// of `[N]`). Purely decorative: the decoder accepts either form.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::EncodeOptions;
    ///
    /// let opts = EncodeOptions::new().with_length_marker(true);
    /// let _ = opts;
    /// ```
    pub fn with_length_marker(mut self, length_marker: bool) -> Self {
        self.length_marker = length_marker;
        self
    }
}

/// Options for decoding TOON format to JSON values.
///
/// # Examples
/// ```
/// use serde_toon::DecodeOptions;
///
/// let opts = DecodeOptions::new().with_strict(false);
/// let _ = opts;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub strict: bool,
    pub indent: Indent,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: true,
            indent: Indent::default(),
        }
    }
}

impl DecodeOptions {
    /// Create new decoding options with defaults (strict mode enabled).
    ///
    /// # Examples
    /// ```
    /// use serde_toon::DecodeOptions;
    ///
    /// let opts = DecodeOptions::new();
    /// let _ = opts;
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict mode (validates array lengths, indentation,
    /// etc.).
    ///
    /// # Examples
    /// ```
    /// use serde_toon::DecodeOptions;
    ///
    /// let opts = DecodeOptions::new().with_strict(false);
    /// let _ = opts;
    /// ```
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the indentation style for decode operations that require it.
    ///
    /// # Examples
    /// ```
    /// use serde_toon::{DecodeOptions, Indent};
    ///
    /// let opts = DecodeOptions::new().with_indent(Indent::Spaces(2));
    /// let _ = opts;
    /// ```
    pub fn with_indent(mut self, style: Indent) -> Self {
        self.indent = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_encode_options_indent() {
        let opts = EncodeOptions::new().with_spaces(4);
        assert_eq!(opts.indent, Indent::Spaces(4));

        let opts = EncodeOptions::new().with_indent(Indent::Spaces(2));
        assert_eq!(opts.indent, Indent::Spaces(2));
    }

    #[rstest::rstest]
    fn test_indent_helpers() {
        let indent = Indent::Spaces(2);
        assert_eq!(indent.get_string(0), "");
        assert_eq!(indent.get_string(3).len(), 6);
        assert_eq!(indent.get_spaces(), 2);

        let indent = Indent::Spaces(0);
        assert_eq!(indent.get_string(2), "");
    }

    #[rstest::rstest]
    fn test_encode_options_setters() {
        let opts = EncodeOptions::new()
            .with_delimiter(Delimiter::Pipe)
            .with_length_marker(true)
            .with_spaces(4);

        assert_eq!(opts.delimiter, Delimiter::Pipe);
        assert!(opts.length_marker);
        assert_eq!(opts.indent, Indent::Spaces(4));
    }

    #[rstest::rstest]
    fn test_decode_options_setters() {
        let opts = DecodeOptions::new()
            .with_strict(false)
            .with_indent(Indent::Spaces(4));

        assert!(!opts.strict);
        assert_eq!(opts.indent, Indent::Spaces(4));
    }
}
