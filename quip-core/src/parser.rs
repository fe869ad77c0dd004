//! Parser logic.
//!
//! Provides the two entry points turning raw input into a
//! [`CommandRecord`]: a single-pass character state machine over a raw line,
//! and a fragment walk over pre-tokenized input such as a shell-style
//! argument vector.
//!
//! [`CommandRecord`]: ../record/struct.CommandRecord.html

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::record::CommandRecord;
use crate::{escape, format};
use crate::{ESCAPE_SYMBOL, PARAM_SYMBOL, QUOTE_SYMBOL};

/// Lexical class of the token currently being matched.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Matching {
    /// Bare word, or not inside any token.
    None,
    /// Quoted string, content runs to the next unescaped quote.
    Quoted,
    /// Parameter name, opened by the marker character.
    Name,
}

/// Reusable parse buffers.
///
/// Both parse entry points accumulate token text through intermediate string
/// buffers. Callers parsing many lines can keep one `Scratch` instance
/// around and use [`CommandRecord::parse_with`] to avoid reallocating those
/// buffers on every call.
///
/// A single instance must not be shared between concurrently executing
/// parse calls; each concurrent caller supplies its own instance or lets
/// the crate allocate transiently.
///
/// [`CommandRecord::parse_with`]: ../record/struct.CommandRecord.html#method.parse_with
#[derive(Debug, Default)]
pub struct Scratch {
    pub(crate) token: String,
    pub(crate) text: String,
}

impl Scratch {
    pub fn new() -> Self {
        Default::default()
    }
}

impl CommandRecord {
    /// Parses a raw command line into a record.
    pub fn parse(input: &str) -> Result<CommandRecord> {
        Self::parse_with(input, &mut Scratch::new())
    }

    /// Parses a raw command line, reusing caller-owned scratch buffers.
    pub fn parse_with(input: &str, scratch: &mut Scratch) -> Result<CommandRecord> {
        let mut record = CommandRecord::default();
        record.text = input.trim().to_string();
        if input.is_empty() {
            return Ok(record);
        }

        let mut values: Vec<String> = Vec::new();
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut dir_params: Option<Vec<String>> = None;
        let mut cur_param: Option<String> = None;

        let mut anchor = 0;
        let mut in_words = false;
        let mut escaping = false;
        let mut matching = Matching::None;

        for (i, c) in input.char_indices() {
            if matching != Matching::Quoted && c.is_whitespace() {
                if in_words {
                    let word = slice(input, anchor, i)?;
                    if !word.trim().is_empty() {
                        if record.command.is_empty()
                            && matching != Matching::Name
                            && params.is_empty()
                            && cur_param.is_none()
                        {
                            record.command = escape::apply(word, &mut scratch.token);
                            values.clear();
                        } else if matching != Matching::Name {
                            values.push(escape::apply(word, &mut scratch.token));
                        } else {
                            cur_param = Some(word[1..].to_string());
                        }
                    }
                    in_words = false;
                    matching = Matching::None;
                }
                continue;
            }

            if !in_words {
                anchor = i;
                match c {
                    QUOTE_SYMBOL => matching = Matching::Quoted,
                    PARAM_SYMBOL => {
                        match &cur_param {
                            Some(name) if !name.trim().is_empty() => {
                                params.insert(name.clone(), std::mem::take(&mut values));
                            }
                            None => dir_params = Some(std::mem::take(&mut values)),
                            _ => values.clear(),
                        }
                        matching = Matching::Name;
                        cur_param = Some(String::new());
                    }
                    _ => {}
                }
                in_words = true;
                continue;
            }

            if matching == Matching::Quoted && c == QUOTE_SYMBOL && !escaping {
                let content = slice(input, anchor + 1, i)?;
                values.push(escape::apply(content, &mut scratch.token));
                in_words = false;
                matching = Matching::None;
            }

            if matching == Matching::Quoted && c == ESCAPE_SYMBOL && !escaping {
                escaping = true;
                continue;
            }
            escaping = false;
        }

        if in_words {
            if matching == Matching::Quoted {
                // unterminated quoted string: kept only past a minimal
                // length, otherwise the stray capture is discarded
                let content = slice(input, anchor + 1, input.len())?;
                if content.chars().count() > 2 {
                    values.push(escape::apply(content, &mut scratch.token));
                    matching = Matching::None;
                }
            } else {
                let word = slice(input, anchor, input.len())?;
                if !word.trim().is_empty() {
                    if record.command.is_empty()
                        && matching != Matching::Name
                        && params.is_empty()
                        && cur_param.is_none()
                    {
                        record.command = escape::apply(word, &mut scratch.token);
                        values.clear();
                    } else if matching != Matching::Name {
                        values.push(escape::apply(word, &mut scratch.token));
                    } else {
                        cur_param = Some(word[1..].to_string());
                    }
                }
            }
        }

        // the final flush is skipped when input ended inside a discarded
        // quoted capture
        if matching != Matching::Quoted {
            match &cur_param {
                Some(name) if !name.trim().is_empty() => {
                    params.insert(name.clone(), std::mem::take(&mut values));
                }
                None => dir_params = Some(std::mem::take(&mut values)),
                _ => {}
            }
        }

        trace!(
            "parsed command: {:?}, directs: {}, names: {}",
            record.command,
            dir_params.as_ref().map(|d| d.len()).unwrap_or(0),
            params.len()
        );

        record.dir_params = dir_params.unwrap_or_default();
        record.params = params;
        Ok(record)
    }

    /// Builds a record from pre-tokenized fragments.
    ///
    /// Fragments are treated as discrete bare words: no quote stripping
    /// takes place, escape sequences are decoded directly. The first
    /// fragment not starting with the quote or marker character is split on
    /// whitespace, its first sub-token becoming the command and the rest
    /// seeding the direct parameters. Fragments starting with the marker
    /// open parameter names. An equivalent canonical `text` is re-derived,
    /// re-quoting every value fragment.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<CommandRecord> {
        Self::from_args_with(args, &mut Scratch::new())
    }

    /// Fragment entry point reusing caller-owned scratch buffers.
    pub fn from_args_with<S: AsRef<str>>(args: &[S], scratch: &mut Scratch) -> Result<CommandRecord> {
        let mut record = CommandRecord::default();
        if args.is_empty() {
            return Ok(record);
        }

        let mut values: Vec<String> = Vec::new();
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut dir_params: Option<Vec<String>> = None;
        let mut cur_param: Option<String> = None;

        scratch.text.clear();
        let mut text = std::mem::take(&mut scratch.text);

        for arg in args {
            let fragment = arg.as_ref();

            if cur_param.is_none()
                && record.command.is_empty()
                && !fragment.is_empty()
                && !fragment.starts_with(QUOTE_SYMBOL)
                && !fragment.starts_with(PARAM_SYMBOL)
            {
                for sub in fragment.split_whitespace() {
                    let decoded = escape::apply(sub, &mut scratch.token);
                    if record.command.is_empty() {
                        record.command = decoded;
                        if !record.command.is_empty() {
                            // tokens accumulated before the command are
                            // discarded, never retained as direct params
                            values.clear();
                            text.push_str(&record.command);
                            text.push(' ');
                        }
                    } else {
                        values.push(decoded);
                    }
                }
                continue;
            }

            if fragment.starts_with(PARAM_SYMBOL) {
                flush_args(&mut params, &mut dir_params, &cur_param, &mut values, &mut text);
                cur_param = Some(fragment[1..].to_string());
            } else {
                values.push(escape::apply(fragment, &mut scratch.token));
            }
        }

        flush_args(&mut params, &mut dir_params, &cur_param, &mut values, &mut text);

        record.text = text.trim_end().to_string();
        scratch.text = text;
        record.dir_params = dir_params.unwrap_or_default();
        record.params = params;
        Ok(record)
    }
}

/// Routes the accumulated values by the open-parameter state and appends
/// their canonical form to the rebuilt text.
fn flush_args(
    params: &mut BTreeMap<String, Vec<String>>,
    dir_params: &mut Option<Vec<String>>,
    cur_param: &Option<String>,
    values: &mut Vec<String>,
    text: &mut String,
) {
    match cur_param {
        Some(name) if !name.trim().is_empty() => {
            text.push(PARAM_SYMBOL);
            text.push_str(name);
            text.push(' ');
            for value in values.iter() {
                format::push_quoted(text, value);
                text.push(' ');
            }
            params.insert(name.clone(), std::mem::take(values));
        }
        None => {
            for value in values.iter() {
                format::push_quoted(text, value);
                text.push(' ');
            }
            *dir_params = Some(std::mem::take(values));
        }
        // an empty or whitespace parameter name swallows its values
        _ => values.clear(),
    }
}

fn slice<'a>(input: &'a str, from: usize, to: usize) -> Result<&'a str> {
    input
        .get(from..to)
        .ok_or_else(|| Error::Internal(format!("token slice out of bounds: {}..{}", from, to)))
}

#[test]
fn test_parse_basic() {
    let record = CommandRecord::parse("command 0 2.1 #t 20000129 3.14 str \"str with space\"").unwrap();
    assert_eq!(record.command(), "command");
    assert_eq!(record.dir_params(), ["0", "2.1"]);
    assert_eq!(
        record.values("t"),
        ["20000129", "3.14", "str", "str with space"]
    );
}

#[test]
fn test_command_defaulting() {
    let record = CommandRecord::parse("#name value").unwrap();
    assert_eq!(record.command(), "");
    assert_eq!(record.values("name"), ["value"]);
}

#[test]
fn test_last_write_wins() {
    let record = CommandRecord::parse("cmd #t a b #t c").unwrap();
    assert_eq!(record.values("t"), ["c"]);
}

#[test]
fn test_empty_name_discarded() {
    let record = CommandRecord::parse("cmd # str \"str with space\" #t z").unwrap();
    assert!(!record.contains_param(""));
    assert_eq!(record.params().len(), 1);
    assert_eq!(record.values("t"), ["z"]);
}

#[test]
fn test_quoted_whitespace_preserved() {
    let record = CommandRecord::parse("cmd \"a b\"").unwrap();
    assert_eq!(record.dir_params(), ["a b"]);
}

#[test]
fn test_leading_tokens_discarded() {
    let record = CommandRecord::parse("\"a\" cmd #t aa bb").unwrap();
    assert_eq!(record.command(), "cmd");
    assert_eq!(record.dir_params(), &[] as &[String]);
    assert_eq!(record.values("t"), ["aa", "bb"]);
}

#[test]
fn test_no_command_after_marker() {
    // once a marker was seen, later bare words can never become the command;
    // with no command established the leading token stays a direct param
    let record = CommandRecord::parse("\"xxx\" #t aaa cmd aa \"aaa\"").unwrap();
    assert_eq!(record.command(), "");
    assert_eq!(record.dir_params(), ["xxx"]);
    assert_eq!(record.values("t"), ["aaa", "cmd", "aa", "aaa"]);
}

#[test]
fn test_escaped_quote_inside_string() {
    let record = CommandRecord::parse("cmd \"a\\\"b\"").unwrap();
    assert_eq!(record.dir_params(), ["a\"b"]);
}

#[test]
fn test_escape_decoding() {
    let record = CommandRecord::parse("cmd \"2023/06/30 \\n 2\" a\\tb").unwrap();
    assert_eq!(record.dir_params(), ["2023/06/30 \n 2", "a\tb"]);
}

#[test]
fn test_unterminated_quote_threshold() {
    // three or more characters after the opening quote are kept
    let record = CommandRecord::parse("cmd \"abc").unwrap();
    assert_eq!(record.dir_params(), ["abc"]);

    // shorter stray captures are discarded along with the final flush
    let record = CommandRecord::parse("cmd x \"ab").unwrap();
    assert_eq!(record.command(), "cmd");
    assert_eq!(record.dir_params(), &[] as &[String]);

    let record = CommandRecord::parse("cmd #t x \"ab").unwrap();
    assert!(!record.contains_param("t"));
}

#[test]
fn test_text_trimmed() {
    let record = CommandRecord::parse("  cmd a  ").unwrap();
    assert_eq!(record.text(), "cmd a");
    assert_eq!(record.to_string(), "cmd a");
}

#[test]
fn test_empty_input() {
    let record = CommandRecord::parse("").unwrap();
    assert_eq!(record.command(), "");
    assert_eq!(record.text(), "");
    assert!(record.dir_params().is_empty());
    assert!(record.params().is_empty());
}

#[test]
fn test_trailing_name_with_no_values() {
    let record = CommandRecord::parse("cmd #t").unwrap();
    assert!(record.contains_param("t"));
    assert_eq!(record.values("t"), &[] as &[String]);
}

#[test]
fn test_scratch_reuse() {
    let mut scratch = Scratch::new();
    let first = CommandRecord::parse_with("cmd \"a\\nb\" #t 1", &mut scratch).unwrap();
    let second = CommandRecord::parse_with("other #u 2", &mut scratch).unwrap();
    assert_eq!(first.dir_params(), ["a\nb"]);
    assert_eq!(second.command(), "other");
    assert_eq!(second.values("u"), ["2"]);
}

#[test]
fn test_from_args() {
    let record = CommandRecord::from_args(&["cmd", "1", "#t", "a b"]).unwrap();
    assert_eq!(record.command(), "cmd");
    assert_eq!(record.dir_params(), ["1"]);
    assert_eq!(record.values("t"), ["a b"]);
    assert_eq!(record.text(), "cmd \"1\" #t \"a b\"");
}

#[test]
fn test_from_args_splits_first_fragment() {
    let record = CommandRecord::from_args(&["cmd x y", "#t", "z"]).unwrap();
    assert_eq!(record.command(), "cmd");
    assert_eq!(record.dir_params(), ["x", "y"]);
    assert_eq!(record.values("t"), ["z"]);
}

#[test]
fn test_from_args_leading_quoted_fragment() {
    let record = CommandRecord::from_args(&["\"a\"", "cmd", "#t", "aa"]).unwrap();
    assert_eq!(record.command(), "cmd");
    assert_eq!(record.dir_params(), &[] as &[String]);
    assert_eq!(record.values("t"), ["aa"]);
}

#[test]
fn test_from_args_empty_name_discarded() {
    let record = CommandRecord::from_args(&["cmd", "x", "#", "dropped", "#t", "kept"]).unwrap();
    assert_eq!(record.dir_params(), ["x"]);
    assert_eq!(record.params().len(), 1);
    assert_eq!(record.values("t"), ["kept"]);
}

#[test]
fn test_from_args_roundtrips_through_parse() {
    let record = CommandRecord::from_args(&["cmd", "a b", "#t", "v\\n1"]).unwrap();
    let reparsed = CommandRecord::parse(record.text()).unwrap();
    assert_eq!(reparsed.command(), record.command());
    assert_eq!(reparsed.dir_params(), record.dir_params());
    assert_eq!(reparsed.params(), record.params());
}
