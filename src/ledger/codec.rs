//! Line grammar for the pair ledger
//!
//! A line is a comma-separated list of `key:value` segments. Only the first
//! colon of a segment separates key from value, and both sides are trimmed.
//! There is no escaping: a value containing `,` or `:` does not survive a
//! write/read cycle unchanged.

use crate::types::Record;

pub const FIELD_SEPARATOR: char = ',';
pub const PAIR_SEPARATOR: char = ':';

/// Parse one ledger line into a record.
///
/// Segments without a colon are dropped. Later duplicate keys overwrite
/// earlier ones. A blank line gives an empty record.
pub fn parse_line(line: &str) -> Record {
    let mut record = Record::new();

    for segment in line.trim().split(FIELD_SEPARATOR) {
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once(PAIR_SEPARATOR) else {
            continue;
        };
        record.insert(key.trim().to_string(), value.trim().to_string());
    }

    record
}

/// Serialize a record as one ledger line, without the trailing newline
pub fn serialize_record(record: &Record) -> String {
    let mut line = String::new();
    for (idx, (key, value)) in record.iter().enumerate() {
        if idx > 0 {
            line.push(FIELD_SEPARATOR);
        }
        line.push_str(key);
        line.push(PAIR_SEPARATOR);
        line.push_str(value);
    }
    line
}

/// Split `text` into lines on `\n`, `\r\n` or a lone `\r`, dropping blank ones
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
}

/// Parse every non-blank line of `text`, in order
pub fn parse_lines(text: &str) -> Vec<Record> {
    split_lines(text).map(parse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_simple_line() {
        let parsed = parse_line("name:Nova,mass:5");
        assert_eq!(parsed, record(&[("name", "Nova"), ("mass", "5")]));
    }

    #[test]
    fn test_parse_trims_and_splits_on_first_colon() {
        let parsed = parse_line("  url : http://example.org , note:a:b ");
        assert_eq!(parsed.get("url").unwrap(), "http://example.org");
        assert_eq!(parsed.get("note").unwrap(), "a:b");
    }

    #[test]
    fn test_parse_drops_segments_without_colon() {
        let parsed = parse_line("orphan,a:1,,b:2");
        assert_eq!(parsed, record(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_parse_duplicate_keys_last_wins_first_position() {
        let parsed = parse_line("a:1,b:2,a:3");
        let keys: Vec<_> = parsed.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(parsed.get("a").unwrap(), "3");
    }

    #[test]
    fn test_parse_empty_value() {
        let parsed = parse_line("a:,b:x");
        assert_eq!(parsed.get("a").unwrap(), "");
    }

    #[test]
    fn test_blank_line_is_empty_record() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   \t").is_empty());
    }

    #[test]
    fn test_serialize_keeps_order() {
        let line = serialize_record(&record(&[("z", "1"), ("a", "2")]));
        assert_eq!(line, "z:1,a:2");
    }

    #[test]
    fn test_serialize_does_not_escape() {
        let line = serialize_record(&record(&[("a", "x,y")]));
        assert_eq!(line, "a:x,y");
        // The comma splits the value on the way back in
        assert_eq!(parse_line(&line), record(&[("a", "x")]));
    }

    #[test]
    fn test_parse_lines_skips_blank_lines() {
        let records = parse_lines("a:1\n\n   \nb:2\r\n");
        assert_eq!(records, vec![record(&[("a", "1")]), record(&[("b", "2")])]);
    }

    #[test]
    fn test_parse_lines_breaks_on_lone_carriage_return() {
        let records = parse_lines("a:1\rb:2\n");
        assert_eq!(records, vec![record(&[("a", "1")]), record(&[("b", "2")])]);
    }
}
