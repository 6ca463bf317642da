//! The structured interchange form of a ledger:
//! `{"entries": [{...}, ...], "keymap": {alias: path, ...}}`

use crate::error::{LedgerError, Result};
use crate::flatten::shape::{stringify_any, Shape, Structured};
use crate::types::{Keymap, Ledger, Record};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub entries: Vec<Record>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keymap: Option<Keymap>,
}

impl Payload {
    /// Build a payload from a decoded ledger; an empty keymap is left out
    pub fn from_ledger(ledger: Ledger) -> Self {
        let keymap = (!ledger.keymap.is_empty()).then_some(ledger.keymap);
        Payload {
            entries: ledger.records,
            keymap,
        }
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::new(self.entries).with_keymap(self.keymap.unwrap_or_default())
    }

    /// Validate and convert a parsed JSON or YAML value.
    ///
    /// `entries` must be a sequence of mappings; `keymap`, when present and
    /// not null, must be a mapping. Nested values are stored as their inline
    /// text, which is subject to the usual no-escaping limitation.
    pub fn from_structured<T: Structured>(data: &T) -> Result<Self> {
        let Shape::Mapping(fields) = data.shape() else {
            return Err(LedgerError::shape(
                "payload must be a mapping with a top-level 'entries' list",
            ));
        };

        let mut entries = None;
        let mut keymap = None;
        for (name, value) in fields {
            match name.as_str() {
                "entries" => entries = Some(value),
                "keymap" => keymap = Some(value),
                _ => {}
            }
        }

        let items = match entries.map(T::shape) {
            Some(Shape::Sequence(items)) => items,
            _ => {
                return Err(LedgerError::shape(
                    "payload must include a top-level 'entries' list",
                ))
            }
        };
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| entry_record(idx, item))
            .collect::<Result<Vec<_>>>()?;

        let keymap = match keymap.map(T::shape) {
            None | Some(Shape::Null) => None,
            Some(Shape::Mapping(pairs)) => {
                let mut keymap = Keymap::with_capacity(pairs.len());
                for (alias, path) in pairs {
                    keymap.insert(alias, stringify_any(path));
                }
                (!keymap.is_empty()).then_some(keymap)
            }
            Some(_) => {
                return Err(LedgerError::shape(
                    "'keymap' must be a mapping of alias -> full key",
                ))
            }
        };

        Ok(Payload { entries, keymap })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_structured(&value)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::from_structured(&value)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }

    #[cfg(feature = "yaml")]
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn entry_record<T: Structured>(idx: usize, item: &T) -> Result<Record> {
    let Shape::Mapping(fields) = item.shape() else {
        return Err(LedgerError::shape(format!("entry {} is not a mapping", idx)));
    };

    Ok(fields
        .into_iter()
        .map(|(key, value)| (key, stringify_any(value)))
        .collect())
}
