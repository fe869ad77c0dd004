//! Multi-line source ingestion.
//!
//! Physical lines are joined into logical command lines before parsing:
//! `//` starts a line-trailing comment, and a line whose kept segment ends
//! in an odd number of backslashes continues onto the next physical line
//! (the final backslash is the continuation marker and is not emitted; an
//! even count means every backslash is literal content). Comment-only lines
//! never break an ongoing continuation.

use std::io::BufRead;

use crate::error::Result;
use crate::parser::Scratch;
use crate::record::CommandRecord;
use crate::{COMMENT_SYMBOL, ESCAPE_SYMBOL};

/// Parses every logical line readable from `reader` into a record.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<CommandRecord>> {
    let mut records = Vec::new();
    let mut buffer = String::new();
    let mut scratch = Scratch::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        join_line(&mut records, &line, &mut buffer, &mut scratch)?;
    }

    flush_residual(&mut records, &buffer, &mut scratch)?;
    Ok(records)
}

/// Parses an in-memory multi-line source into records.
pub fn parse_str(content: &str) -> Result<Vec<CommandRecord>> {
    let mut records = Vec::new();
    let mut buffer = String::new();
    let mut scratch = Scratch::new();

    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        join_line(&mut records, line, &mut buffer, &mut scratch)?;
    }

    flush_residual(&mut records, &buffer, &mut scratch)?;
    Ok(records)
}

/// Parses every logical line readable from an asynchronous source.
///
/// The joining algorithm is identical to [`read_records`]; suspension
/// happens only at the line-read boundary, lines are processed in strict
/// sequential order.
///
/// [`read_records`]: fn.read_records.html
#[cfg(feature = "async")]
pub async fn read_records_async<R>(reader: R) -> Result<Vec<CommandRecord>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut records = Vec::new();
    let mut buffer = String::new();
    let mut scratch = Scratch::new();

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        join_line(&mut records, &line, &mut buffer, &mut scratch)?;
    }

    flush_residual(&mut records, &buffer, &mut scratch)?;
    Ok(records)
}

/// Processes one physical line: strips the trailing comment, resolves the
/// continuation marker and either keeps accumulating or parses the joined
/// logical line.
fn join_line(
    records: &mut Vec<CommandRecord>,
    line: &str,
    buffer: &mut String,
    scratch: &mut Scratch,
) -> Result<()> {
    match line.find(COMMENT_SYMBOL) {
        // whole line is a comment; an ongoing continuation stays open
        Some(0) => Ok(()),
        Some(comment) => {
            let join_next = trailing_backslash_parity(&line[..comment]);
            let mut cut = comment;
            if join_next {
                // exclude the continuation backslash sitting right before
                // the comment marker
                cut -= ESCAPE_SYMBOL.len_utf8();
            }
            if cut == 0 {
                return Ok(());
            }

            let kept = line[..cut].trim();
            if kept.is_empty() {
                return Ok(());
            }
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(kept);

            if join_next {
                return Ok(());
            }
            push_record(records, buffer, scratch)
        }
        None => {
            let join_next = trailing_backslash_parity(line);
            if join_next && line.chars().count() <= 1 {
                // a lone continuation backslash contributes nothing
                return Ok(());
            }

            let mut kept = line;
            if join_next {
                kept = &line[..line.len() - ESCAPE_SYMBOL.len_utf8()];
            }
            let kept = kept.trim();
            if !kept.is_empty() {
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(kept);
            }

            if join_next {
                return Ok(());
            }
            push_record(records, buffer, scratch)
        }
    }
}

/// Odd number of trailing backslashes means the line logically continues.
fn trailing_backslash_parity(segment: &str) -> bool {
    let mut count = 0;
    for c in segment.chars().rev() {
        if c != ESCAPE_SYMBOL {
            break;
        }
        count += 1;
    }
    count % 2 == 1
}

fn push_record(
    records: &mut Vec<CommandRecord>,
    buffer: &mut String,
    scratch: &mut Scratch,
) -> Result<()> {
    let record = CommandRecord::parse_with(buffer, scratch)?;
    debug!("logical line: {:?}", record.text());
    records.push(record);
    buffer.clear();
    Ok(())
}

fn flush_residual(
    records: &mut Vec<CommandRecord>,
    buffer: &str,
    scratch: &mut Scratch,
) -> Result<()> {
    if !buffer.trim().is_empty() {
        records.push(CommandRecord::parse_with(buffer, scratch)?);
    }
    Ok(())
}

#[test]
fn test_continuation_joins_lines() {
    let records = parse_str("foo \\\nbar").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), "foo bar");
}

#[test]
fn test_even_backslashes_do_not_continue() {
    // two trailing backslashes are literal content, not a continuation
    let records = parse_str("foo \\\\\nbar").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text(), "foo \\\\");
    assert_eq!(records[1].text(), "bar");
}

#[test]
fn test_full_line_comment_dropped() {
    let records = parse_str("// a comment\ncmd 1").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command(), "cmd");
}

#[test]
fn test_trailing_comment_stripped() {
    let records = parse_str("cmd 1 // trailing words").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), "cmd 1");
    assert_eq!(records[0].dir_params(), ["1"]);
}

#[test]
fn test_continuation_before_comment() {
    // odd parity right before the marker: the comment is stripped and the
    // line still continues
    let records = parse_str("foo\\// comment\nbar").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), "foo bar");

    // even parity: both backslashes are literal, no continuation
    let records = parse_str("foo\\\\// comment\nbar").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text(), "foo\\\\");
}

#[test]
fn test_comment_line_keeps_continuation_open() {
    let records = parse_str("foo \\\n// interlude\nbar").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), "foo bar");
}

#[test]
fn test_lone_backslash_line() {
    let records = parse_str("\\\ncmd").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command(), "cmd");
}

#[test]
fn test_residual_buffer_parsed() {
    // source ends while a continuation is still open
    let records = parse_str("foo \\").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), "foo");
}

#[test]
fn test_multi_record_script() {
    let source = "\
// demo script
spawn \"guard\" #pos 10 20 // comment
move 3 \\
     4
say \"two\\nlines\"
";
    let records = parse_str(source).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].command(), "spawn");
    assert_eq!(records[0].values("pos"), ["10", "20"]);
    assert_eq!(records[1].command(), "move");
    assert_eq!(records[1].dir_params(), ["3", "4"]);
    assert_eq!(records[2].dir_params(), ["two\nlines"]);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_joiner_matches_sync() {
    let source = "foo \\\nbar\ncmd 1 // note\n";
    let sync_records = parse_str(source).unwrap();
    let async_records = read_records_async(source.as_bytes()).await.unwrap();
    assert_eq!(sync_records, async_records);
}
