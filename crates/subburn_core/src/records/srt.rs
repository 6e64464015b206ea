//! SubRip (.srt) records.
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! <今日>[きょう]は
//!
//! 2
//! 00:00:05,000 --> 00:00:08,000
//! Two lines
//! of text.
//! ```
//!
//! The index line is optional. Text lines are joined with a space since
//! segments render on a single line.

use super::error::RecordError;
use super::timestamp::parse_clock_time;
use super::TimedRecord;

/// Parse SRT content into records.
///
/// Blocks without a timing line are skipped. Blocks with an unparseable
/// timing line are returned as errors at their position so the caller can
/// log and drop them.
pub fn parse_srt(content: &str) -> Vec<Result<TimedRecord, RecordError>> {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut records = Vec::new();

    for (index, block) in content
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .enumerate()
    {
        let lines: Vec<&str> = block.lines().collect();
        let Some(timing_idx) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        let Some((start, end)) = parse_timing(lines[timing_idx]) else {
            records.push(Err(RecordError::timestamp(index, lines[timing_idx].trim())));
            continue;
        };

        let text = lines[timing_idx + 1..]
            .iter()
            .map(|l| strip_formatting(l.trim()))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        records.push(Ok(TimedRecord::new(start, end, text)));
    }

    records
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm` (trailing position hints allowed).
fn parse_timing(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    let end = end.split_whitespace().next()?;
    Some((parse_clock_time(start)?, parse_clock_time(end)?))
}

/// Remove `<i>`, `<b>`, `<u>` and `<font ...>` tags (and their closers).
///
/// Ruby markup (`<base>[reading]`) is left alone.
fn strip_formatting(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('>') {
            Some(close) if is_format_tag(&tail[1..close]) => {
                rest = &tail[close + 1..];
            }
            _ => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn is_format_tag(inner: &str) -> bool {
    let name = inner.trim_start_matches('/').trim();
    let name = name.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
    matches!(name.as_str(), "i" | "b" | "u" | "s" | "font")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(records: Vec<Result<TimedRecord, RecordError>>) -> Vec<TimedRecord> {
        records.into_iter().filter_map(Result::ok).collect()
    }

    #[test]
    fn parses_basic_blocks() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n\
                       2\n00:00:05,000 --> 00:00:08,500\nTwo lines\nof text.\n";
        let records = ok(parse_srt(content));

        assert_eq!(records.len(), 2);
        assert_eq!((records[0].start, records[0].end), (1.0, 4.0));
        assert_eq!(records[0].text, "Hello, world!");
        assert_eq!(records[1].end, 8.5);
        assert_eq!(records[1].text, "Two lines of text.");
    }

    #[test]
    fn handles_crlf_and_missing_index() {
        let content = "\r\n00:00:01,000 --> 00:00:02,000\r\nA\r\n\r\n00:00:03.000 --> 00:00:04.000\r\nB\r\n";
        let records = ok(parse_srt(content));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].start, 3.0);
    }

    #[test]
    fn bad_timing_is_reported_per_block() {
        let content = "1\n00:00:01,000 --> later\nA\n\n2\n00:00:02,000 --> 00:00:03,000\nB\n";
        let records = parse_srt(content);
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[0],
            Err(RecordError::InvalidTimestamp { index: 0, .. })
        ));
        assert!(records[1].is_ok());
    }

    #[test]
    fn strips_formatting_but_keeps_ruby() {
        assert_eq!(strip_formatting("<i>Italic</i> text"), "Italic text");
        assert_eq!(
            strip_formatting("<font color=\"#fff\">x</font>"),
            "x"
        );
        assert_eq!(strip_formatting("<漢>[かん] a < b"), "<漢>[かん] a < b");
    }

    #[test]
    fn position_hints_after_timing() {
        assert_eq!(
            parse_timing("00:00:01,000 --> 00:00:02,000 X1:40 X2:600"),
            Some((1.0, 2.0))
        );
    }
}
