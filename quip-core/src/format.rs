//! Canonical serialization of parsed records.

use crate::escape;
use crate::record::CommandRecord;
use crate::{PARAM_SYMBOL, QUOTE_SYMBOL};

impl CommandRecord {
    /// Serializes the record back into canonical grammar text.
    ///
    /// The command token is followed by every direct parameter, then every
    /// `#name` block with its values, names in lexicographic order. All
    /// value tokens are quoted, with control characters escaped. Reparsing
    /// the output reproduces the record's command, direct parameters and
    /// named parameters exactly; the output is not guaranteed to equal the
    /// original source text.
    pub fn formatted_text(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 16);

        if !self.command.is_empty() {
            out.push_str(&self.command);
            out.push(' ');
        }
        for param in &self.dir_params {
            push_quoted(&mut out, param);
            out.push(' ');
        }
        for (name, values) in &self.params {
            out.push(PARAM_SYMBOL);
            out.push_str(name);
            out.push(' ');
            for value in values {
                push_quoted(&mut out, value);
                out.push(' ');
            }
        }

        while out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

/// Appends a value token quoted and escaped.
pub(crate) fn push_quoted(out: &mut String, value: &str) {
    out.push(QUOTE_SYMBOL);
    for c in value.chars() {
        escape::push_escaped(out, c);
    }
    out.push(QUOTE_SYMBOL);
}

#[test]
fn test_formatted_text_shape() {
    let record = CommandRecord::parse("cmd a \"b c\" #t 1 2 #s x").unwrap();
    assert_eq!(
        record.formatted_text(),
        "cmd \"a\" \"b c\" #s \"x\" #t \"1\" \"2\""
    );
}

#[test]
fn test_formatted_text_escapes_controls() {
    let record = CommandRecord::parse("cmd \"a\\nb\" #t \"x\\ty\"").unwrap();
    assert_eq!(record.formatted_text(), "cmd \"a\\nb\" #t \"x\\ty\"");
}

#[test]
fn test_roundtrip_canonicalization() {
    let sources = [
        "cmd a b #t 1 2 #s \"x y\"",
        "#name value",
        "cmd \"with \\\"quotes\\\"\" #t \"line\\nbreak\" \"tab\\there\"",
        "cmd 长太息以掩涕兮 #t aaa 2.71828",
    ];
    for source in sources.iter() {
        let record = CommandRecord::parse(source).unwrap();
        let reparsed = CommandRecord::parse(&record.formatted_text()).unwrap();
        assert_eq!(reparsed.command(), record.command(), "source: {}", source);
        assert_eq!(
            reparsed.dir_params(),
            record.dir_params(),
            "source: {}",
            source
        );
        assert_eq!(reparsed.params(), record.params(), "source: {}", source);
    }
}

#[test]
fn test_roundtrip_is_idempotent() {
    let record = CommandRecord::parse("cmd \"a b\" #t 1").unwrap();
    let once = record.formatted_text();
    let twice = CommandRecord::parse(&once).unwrap().formatted_text();
    assert_eq!(once, twice);
}
