use crate::error::Result;
use crate::ledger::codec::serialize_record;
use crate::ledger::keymap::keymap_record;
use crate::types::{Keymap, Ledger, Record};
use std::io::Write;

/// Writes ledger lines to any output, one record per line
pub struct LedgerWriter<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(writer: W) -> Self {
        LedgerWriter { writer, lines: 0 }
    }

    /// Write the keymap header line. Nothing is written for an empty keymap.
    pub fn write_keymap(&mut self, keymap: &Keymap) -> Result<()> {
        if keymap.is_empty() {
            return Ok(());
        }
        self.write_record(&keymap_record(keymap))
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        writeln!(self.writer, "{}", serialize_record(record))?;
        self.lines += 1;
        Ok(())
    }

    pub fn write_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Write a whole ledger: keymap header first, then the data records
    pub fn write_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        self.write_keymap(&ledger.keymap)?;
        self.write_records(&ledger.records)
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
