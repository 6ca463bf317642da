//! # Pair Ledger - flat line records for nested data
//!
//! A pair ledger stores one record per line as comma-separated `key:value`
//! pairs:
//!
//! ```text
//! record:keymap,k0:user.name,k1:user.tags.0
//! record:yaml-doc,doc_index:0,k0:Rigel,k1:giant
//! ```
//!
//! The optional first line is a keymap that maps short aliases to full dotted
//! paths, so deeply nested documents stay compact.
//!
//! ## Modules
//!
//! - **ledger**: line codec, keymap resolution, writer and the JSON/YAML payload form
//! - **flatten**: nested documents and markup to ledger records
//!
//! ## Quick Start
//!
//! ```rust
//! use pairledger::{decode_ledger, encode_ledger, flatten_documents, LedgerConfig};
//! use serde_json::json;
//!
//! let ledger = decode_ledger("record:keymap,k0:user.name\nk0:Rigel\n", true);
//! assert_eq!(ledger.records[0].get("user.name").unwrap(), "Rigel");
//!
//! let flattened = flatten_documents(&[json!({"user": {"name": "Vega"}})], &LedgerConfig::default());
//! assert_eq!(
//!     encode_ledger(&flattened),
//!     "record:keymap,k0:user.name\nrecord:yaml-doc,doc_index:0,k0:Vega\n"
//! );
//! ```

pub mod error;
pub mod flatten;
pub mod ledger;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{LedgerError, Result};
pub use flatten::{AliasGenerator, HtmlFlattener, StructuralFlattener, Structured};
pub use ledger::{LedgerWriter, Payload};
pub use types::{Keymap, Ledger, LedgerConfig, Record, KEYMAP_RECORD};

/// Decode ledger text, optionally rewriting aliased keys to full paths
pub fn decode_ledger(text: &str, expand_keymap: bool) -> Ledger {
    let ledger = Ledger::parse(text);
    if expand_keymap {
        ledger.expanded()
    } else {
        ledger
    }
}

/// Encode a ledger as text, keymap header first when there is one
pub fn encode_ledger(ledger: &Ledger) -> String {
    ledger.to_text()
}

/// Flatten a batch of documents with one shared alias generator
pub fn flatten_documents<T: Structured>(documents: &[T], config: &LedgerConfig) -> Ledger {
    let aliases = AliasGenerator::new(config.alias_prefix.as_str());
    let mut flattener = StructuralFlattener::new(aliases);
    flattener.add_documents(documents);
    flattener.finish()
}

/// Flatten markup into element and text records
pub fn flatten_markup(markup: &str) -> Vec<Record> {
    let mut flattener = HtmlFlattener::new();
    flattener.feed(markup);
    flattener.finish()
}
