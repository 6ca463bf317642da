//! Reading and writing pair ledger text
//!
//! A ledger file holds one record per line. An optional first record tagged
//! `record:keymap` maps short aliases to full key paths; it is lifted out of
//! the data into [`Ledger::keymap`] on read and written back as the first
//! line on write.

pub mod codec;
pub mod keymap;
pub mod payload;
pub mod writer;

pub use codec::{parse_line, serialize_record};
pub use keymap::{expand, split_keymap};
pub use payload::Payload;
pub use writer::LedgerWriter;

use crate::error::Result;
use crate::types::{Ledger, Record};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use tracing::debug;

impl Ledger {
    /// Parse ledger text. Aliased keys are left as they are; see [`Ledger::expanded`].
    pub fn parse(text: &str) -> Self {
        let (records, keymap) = split_keymap(codec::parse_lines(text));
        debug!(
            records = records.len(),
            aliases = keymap.len(),
            "parsed ledger"
        );
        Ledger { records, keymap }
    }

    /// Read a ledger line by line
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut raw = Vec::new();
        for line in reader.lines() {
            let line = line?;
            raw.extend(codec::split_lines(&line).map(parse_line));
        }

        let (records, keymap) = split_keymap(raw);
        debug!(
            records = records.len(),
            aliases = keymap.len(),
            "read ledger"
        );
        Ok(Ledger { records, keymap })
    }

    /// Rewrite every record's aliased keys to full paths. The keymap is kept.
    pub fn expanded(mut self) -> Self {
        if self.keymap.is_empty() {
            return self;
        }
        let keymap = &self.keymap;
        let records = self
            .records
            .iter()
            .map(|record| expand(record, keymap).into_owned())
            .collect();
        self.records = records;
        self
    }

    /// Records with aliases expanded, borrowing where nothing changes
    pub fn expanded_records(&self) -> impl Iterator<Item = Cow<'_, Record>> {
        self.records
            .iter()
            .map(move |record| expand(record, &self.keymap))
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = LedgerWriter::new(writer);
        writer.write_ledger(self)?;
        writer.flush()
    }

    /// Render the ledger as text, keymap header first
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        if !self.keymap.is_empty() {
            text.push_str(&serialize_record(&keymap::keymap_record(&self.keymap)));
            text.push('\n');
        }
        for record in &self.records {
            text.push_str(&serialize_record(record));
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Keymap;
    use std::io::Cursor;

    #[test]
    fn test_parse_scenario() {
        let ledger = Ledger::parse("name:Nova,mass:5\n");
        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.records[0].get("name").unwrap(), "Nova");
        assert_eq!(ledger.records[0].get("mass").unwrap(), "5");
        assert!(ledger.keymap.is_empty());
    }

    #[test]
    fn test_expand_scenario() {
        let ledger = Ledger::parse("record:keymap,k0:user.name\nk0:Rigel\n").expanded();
        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.records[0].get("user.name").unwrap(), "Rigel");
        assert_eq!(ledger.keymap.get("k0").unwrap(), "user.name");
    }

    #[test]
    fn test_without_expansion_aliases_remain() {
        let ledger = Ledger::parse("record:keymap,k0:user.name\nk0:Rigel\n");
        assert_eq!(ledger.records[0].get("k0").unwrap(), "Rigel");
    }

    #[test]
    fn test_from_reader_matches_parse() {
        let text = "record:keymap,k0:a\n\nk0:1,b:2\n  \nc:3\n";
        let read = Ledger::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(read, Ledger::parse(text));
        assert_eq!(read.records.len(), 2);
    }

    #[test]
    fn test_from_reader_splits_carriage_return_lines() {
        let text = "record:keymap,k0:a\rk0:1\r\nb:2\r";
        let read = Ledger::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(read, Ledger::parse(text));
        assert_eq!(read.records.len(), 2);
        assert_eq!(read.keymap.get("k0").unwrap(), "a");
    }

    #[test]
    fn test_to_text_and_write_to_agree() {
        let mut keymap = Keymap::new();
        keymap.insert("k0".to_string(), "star.name".to_string());
        let mut record = Record::new();
        record.insert("k0".to_string(), "Vega".to_string());
        let ledger = Ledger::new(vec![record]).with_keymap(keymap);

        let mut buffer = Vec::new();
        ledger.write_to(&mut buffer).unwrap();

        let text = ledger.to_text();
        assert_eq!(String::from_utf8(buffer).unwrap(), text);
        assert_eq!(text, "record:keymap,k0:star.name\nk0:Vega\n");
    }

    #[test]
    fn test_expanded_records_borrow_without_keymap() {
        let ledger = Ledger::parse("a:1\n");
        let first = ledger.expanded_records().next().unwrap();
        assert!(matches!(first, Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_text() {
        let ledger = Ledger::parse("\n\n");
        assert!(ledger.is_empty());
        assert_eq!(ledger.to_text(), "");
    }
}
