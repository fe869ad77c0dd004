//! Incremental syntax analysis for live command input.
//!
//! Re-lexes the command grammar without collecting any values, wrapping
//! each recognized token in color markers supplied by a pluggable
//! [`ColorFormatter`]. The input may be grammatically unfinished (the user
//! is still typing), so the analyzer also reports the last token matched
//! and its class, and closes any spans left open at end of input.
//!
//! Unlike the parser this component never fails: bad input yields the
//! original text unannotated.
//!
//! [`ColorFormatter`]: trait.ColorFormatter.html

use std::fmt;

use crate::{ESCAPE_SYMBOL, PARAM_SYMBOL, QUOTE_SYMBOL};

/// Token color classes handed to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorKind {
    Command,
    Param,
    Str,
    ParamName,
    Escape,
}

impl fmt::Display for ColorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> std::result::Result<(), fmt::Error> {
        let name = match self {
            ColorKind::Command => "command",
            ColorKind::Param => "param",
            ColorKind::Str => "string",
            ColorKind::ParamName => "param-name",
            ColorKind::Escape => "escape",
        };
        write!(formatter, "{}", name)
    }
}

/// Class of the most recently matched token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    None,
    Param,
    ParamName,
    Command,
}

/// Rendering capability supplied by the host.
///
/// The analyzer emits `color_head` before each recognized token and
/// `color_tail` after it; it never depends on a concrete rendering target.
pub trait ColorFormatter {
    fn color_head(&self, kind: ColorKind) -> String;
    fn color_tail(&self) -> String;
}

/// BBCode-style formatter wrapping tokens in `[color=...]` tags.
pub struct BbcodeFormatter;

impl ColorFormatter for BbcodeFormatter {
    fn color_head(&self, kind: ColorKind) -> String {
        format!("[color={}]", kind)
    }

    fn color_tail(&self) -> String {
        "[/color]".to_string()
    }
}

/// Result of analyzing one line of live input.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Input text interleaved with color markers.
    pub highlighted: String,
    /// The most recent completed command-class token.
    pub matched_command: String,
    /// Text of the last (possibly still in-progress) token.
    pub last_match: String,
    /// Class of the last token.
    pub last_kind: MatchKind,
}

impl Analysis {
    fn unannotated(input: &str) -> Analysis {
        Analysis {
            highlighted: input.to_string(),
            matched_command: String::new(),
            last_match: String::new(),
            last_kind: MatchKind::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Matching {
    None,
    Quoted,
    Name,
}

/// When a token boundary is reached, the completed token becomes the
/// matched command if it was command-class, and the last-match buffer
/// resets for the next token.
fn take_last_match(last_match: &mut String, last_kind: MatchKind, matched_command: &mut String) {
    if last_kind == MatchKind::Command {
        matched_command.clear();
        matched_command.push_str(last_match);
    }
    last_match.clear();
}

/// Decorates `input` with color markers and reports last-match metadata.
///
/// Total function: blank input comes back unannotated with empty metadata.
pub fn analyze(input: &str, color: &dyn ColorFormatter) -> Analysis {
    if input.trim().is_empty() {
        return Analysis::unannotated(input);
    }

    let mut out = String::with_capacity(input.len() * 2);
    let mut last_match = String::new();
    let mut matched_command = String::new();
    let mut last_kind = MatchKind::None;

    let mut open_spans: usize = 0;
    let mut had_command = false;
    let mut in_words = false;
    let mut escaping = false;
    let mut matching = Matching::None;

    for c in input.chars() {
        if !in_words {
            if c == ' ' {
                out.push(c);
                last_kind = MatchKind::None;
                continue;
            }

            in_words = true;
            matching = match c {
                QUOTE_SYMBOL => Matching::Quoted,
                PARAM_SYMBOL => Matching::Name,
                _ => Matching::None,
            };

            match c {
                QUOTE_SYMBOL => {
                    take_last_match(&mut last_match, last_kind, &mut matched_command);
                    last_kind = MatchKind::Param;
                    out.push_str(&color.color_head(ColorKind::Str));
                }
                PARAM_SYMBOL => {
                    take_last_match(&mut last_match, last_kind, &mut matched_command);
                    last_kind = MatchKind::ParamName;
                    out.push_str(&color.color_head(ColorKind::ParamName));
                    had_command = true;
                }
                _ => {
                    take_last_match(&mut last_match, last_kind, &mut matched_command);
                    if !had_command {
                        last_kind = MatchKind::Command;
                        out.push_str(&color.color_head(ColorKind::Command));
                        had_command = true;
                    } else {
                        last_kind = MatchKind::Param;
                        out.push_str(&color.color_head(ColorKind::Param));
                    }
                }
            }
            open_spans += 1;
            out.push(c);
            last_match.push(c);
            continue;
        }

        if matching != Matching::Quoted {
            out.push(c);
            if c == ' ' {
                open_spans = open_spans.saturating_sub(1);
                in_words = false;
                take_last_match(&mut last_match, last_kind, &mut matched_command);
                last_kind = MatchKind::None;
                out.push_str(&color.color_tail());
            } else {
                last_match.push(c);
            }
            continue;
        }

        // quoted-string mode
        if !escaping && c == ESCAPE_SYMBOL {
            out.push_str(&color.color_head(ColorKind::Escape));
            out.push(c);
            open_spans += 1;
            escaping = true;
            continue;
        }
        if escaping {
            if c == ESCAPE_SYMBOL {
                // zero-width space keeps renderers from re-interpreting
                // the escaped backslash
                out.push_str("\\\u{200b}");
            } else {
                out.push(c);
            }
            out.push_str(&color.color_tail());
            open_spans = open_spans.saturating_sub(1);
            escaping = false;
            continue;
        }
        if c == QUOTE_SYMBOL {
            out.push(c);
            open_spans = open_spans.saturating_sub(1);
            in_words = false;
            out.push_str(&color.color_tail());
            continue;
        }

        out.push(c);
        last_match.push(c);
    }

    // close spans left open by unfinished input, innermost first; an
    // unconsumed escape backslash keeps its span open
    while open_spans > 0 {
        open_spans -= 1;
        if out.ends_with(ESCAPE_SYMBOL) {
            continue;
        }
        out.push_str(&color.color_tail());
    }

    Analysis {
        highlighted: out,
        matched_command,
        last_match,
        last_kind,
    }
}

#[cfg(test)]
struct TagFormatter;

#[cfg(test)]
impl ColorFormatter for TagFormatter {
    fn color_head(&self, kind: ColorKind) -> String {
        format!("[{}]", kind)
    }

    fn color_tail(&self) -> String {
        "[/]".to_string()
    }
}

#[test]
fn test_analyze_blank_input() {
    let analysis = analyze("   ", &TagFormatter);
    assert_eq!(analysis.highlighted, "   ");
    assert_eq!(analysis.matched_command, "");
    assert_eq!(analysis.last_match, "");
    assert_eq!(analysis.last_kind, MatchKind::None);
}

#[test]
fn test_analyze_command_in_progress() {
    let analysis = analyze("cmd", &TagFormatter);
    assert_eq!(analysis.highlighted, "[command]cmd[/]");
    // the command token is still open, so it is not yet "matched"
    assert_eq!(analysis.matched_command, "");
    assert_eq!(analysis.last_match, "cmd");
    assert_eq!(analysis.last_kind, MatchKind::Command);
}

#[test]
fn test_analyze_full_line() {
    let analysis = analyze("cmd \"a b\" #t x", &TagFormatter);
    assert_eq!(
        analysis.highlighted,
        "[command]cmd [/][string]\"a b\"[/] [param-name]#t [/][param]x[/]"
    );
    assert_eq!(analysis.matched_command, "cmd");
    assert_eq!(analysis.last_match, "x");
    assert_eq!(analysis.last_kind, MatchKind::Param);
}

#[test]
fn test_analyze_param_name_in_progress() {
    let analysis = analyze("cmd #po", &TagFormatter);
    assert_eq!(analysis.matched_command, "cmd");
    assert_eq!(analysis.last_match, "#po");
    assert_eq!(analysis.last_kind, MatchKind::ParamName);
}

#[test]
fn test_analyze_escape_spans() {
    let analysis = analyze("cmd \"a\\nb\"", &TagFormatter);
    assert_eq!(
        analysis.highlighted,
        "[command]cmd [/][string]\"a[escape]\\n[/]b\"[/]"
    );
}

#[test]
fn test_analyze_escaped_backslash_gets_break() {
    let analysis = analyze("cmd \"a\\\\b\"", &TagFormatter);
    assert_eq!(
        analysis.highlighted,
        "[command]cmd [/][string]\"a[escape]\\\\\u{200b}[/]b\"[/]"
    );
}

#[test]
fn test_analyze_unterminated_escape_keeps_span_open() {
    // input ends right after the escape backslash: neither the escape span
    // nor the string span receives a closing marker
    let analysis = analyze("\"\\", &TagFormatter);
    assert_eq!(analysis.highlighted, "[string]\"[escape]\\");
}

#[test]
fn test_analyze_unterminated_quote_closed_out() {
    let analysis = analyze("cmd \"ab", &TagFormatter);
    assert_eq!(analysis.highlighted, "[command]cmd [/][string]\"ab[/]");
    assert_eq!(analysis.last_match, "\"ab");
    assert_eq!(analysis.last_kind, MatchKind::Param);
}

#[test]
fn test_bbcode_formatter() {
    let analysis = analyze("go #t", &BbcodeFormatter);
    assert_eq!(
        analysis.highlighted,
        "[color=command]go [/color][color=param-name]#t[/color]"
    );
}
