//! Keymap resolution: splitting the keymap record from data and expanding aliases

use crate::types::{Keymap, Record, KEYMAP_RECORD, RECORD_FIELD};
use std::borrow::Cow;

/// Separate keymap records from data records.
///
/// Every record tagged `record:keymap` is merged into the returned keymap,
/// later aliases overwriting earlier ones. Data records keep their order.
pub fn split_keymap(records: Vec<Record>) -> (Vec<Record>, Keymap) {
    let mut data = Vec::with_capacity(records.len());
    let mut keymap = Keymap::new();

    for record in records {
        if is_keymap_record(&record) {
            for (alias, path) in record {
                if alias == RECORD_FIELD {
                    continue;
                }
                keymap.insert(alias, path);
            }
        } else {
            data.push(record);
        }
    }

    (data, keymap)
}

pub fn is_keymap_record(record: &Record) -> bool {
    record.get(RECORD_FIELD).map(String::as_str) == Some(KEYMAP_RECORD)
}

/// Rewrite aliased keys to their full paths.
///
/// Unknown keys pass through. With an empty keymap the record is returned
/// borrowed.
pub fn expand<'a>(record: &'a Record, keymap: &Keymap) -> Cow<'a, Record> {
    if keymap.is_empty() {
        return Cow::Borrowed(record);
    }

    let expanded = record
        .iter()
        .map(|(key, value)| {
            let key = keymap.get(key).unwrap_or(key);
            (key.clone(), value.clone())
        })
        .collect();
    Cow::Owned(expanded)
}

/// Build the synthetic keymap record written as the first ledger line.
///
/// Aliases are sorted by string order, so `k10` precedes `k2`.
pub fn keymap_record(keymap: &Keymap) -> Record {
    let mut aliases: Vec<&String> = keymap.keys().collect();
    aliases.sort();

    let mut record = Record::with_capacity(keymap.len() + 1);
    record.insert(RECORD_FIELD.to_string(), KEYMAP_RECORD.to_string());
    for alias in aliases {
        record.insert(alias.clone(), keymap[alias].clone());
    }
    record
}
