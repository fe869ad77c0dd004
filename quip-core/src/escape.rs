//! Backslash escape codec shared by the parser and the formatter.
//!
//! Decoding maps a fixed set of escape letters to their control characters;
//! any other escaped character decodes to itself, so there is no error path.
//! Encoding is the near-inverse, covering the same set plus explicit escapes
//! for the quote and backslash characters.

use crate::ESCAPE_SYMBOL;

/// Decodes the character following a backslash.
pub fn decode(raw: char) -> char {
    match raw {
        '0' => '\0',
        'a' => '\u{7}',
        'b' => '\u{8}',
        't' => '\t',
        'n' => '\n',
        'v' => '\u{b}',
        'f' => '\u{c}',
        'r' => '\r',
        other => other,
    }
}

/// Returns the escape sequence for characters the formatter must not emit
/// bare, `None` for everything else.
pub fn encode(ch: char) -> Option<&'static str> {
    let sequence = match ch {
        '"' => "\\\"",
        '\\' => "\\\\",
        '\n' => "\\n",
        '\t' => "\\t",
        '\0' => "\\0",
        '\u{7}' => "\\a",
        '\u{8}' => "\\b",
        '\u{b}' => "\\v",
        '\u{c}' => "\\f",
        '\r' => "\\r",
        _ => return None,
    };
    Some(sequence)
}

/// Appends `ch` to `out`, escaped when it has an escape sequence.
pub fn push_escaped(out: &mut String, ch: char) {
    match encode(ch) {
        Some(sequence) => out.push_str(sequence),
        None => out.push(ch),
    }
}

/// Decodes all escape sequences in a token.
///
/// A backslash together with the character following it forms one escaped
/// unit. A lone trailing backslash is dropped. The scratch buffer is cleared
/// and reused for the intermediate work.
pub fn apply(token: &str, scratch: &mut String) -> String {
    scratch.clear();
    let mut escaping = false;

    for c in token.chars() {
        if c != ESCAPE_SYMBOL || escaping {
            if !escaping {
                scratch.push(c);
                continue;
            }
            scratch.push(decode(c));
            escaping = false;
        } else {
            escaping = true;
        }
    }

    scratch.clone()
}

#[test]
fn test_decode_control_set() {
    assert_eq!(decode('n'), '\n');
    assert_eq!(decode('t'), '\t');
    assert_eq!(decode('0'), '\0');
    assert_eq!(decode('a'), '\u{7}');
    // unmapped characters decode to themselves
    assert_eq!(decode('"'), '"');
    assert_eq!(decode('\\'), '\\');
    assert_eq!(decode('x'), 'x');
}

#[test]
fn test_apply_escapes() {
    let mut scratch = String::new();
    assert_eq!(apply("a\\nb", &mut scratch), "a\nb");
    assert_eq!(apply("a\\\\b", &mut scratch), "a\\b");
    assert_eq!(apply("a\\\"b", &mut scratch), "a\"b");
    // trailing lone backslash is dropped
    assert_eq!(apply("ab\\", &mut scratch), "ab");
    assert_eq!(apply("", &mut scratch), "");
}

#[test]
fn test_encode_roundtrip() {
    for c in ['\n', '\t', '\0', '\u{7}', '\u{8}', '\u{b}', '\u{c}', '\r'].iter() {
        let sequence = encode(*c).unwrap();
        let mut scratch = String::new();
        assert_eq!(apply(sequence, &mut scratch), c.to_string());
    }
    assert_eq!(encode('x'), None);
}
