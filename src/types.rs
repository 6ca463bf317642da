use indexmap::IndexMap;

/// Value of the `record` field that marks the in-band keymap record
pub const KEYMAP_RECORD: &str = "keymap";

/// Field naming the kind of a record (`keymap`, `yaml-doc`, `element`, `text`)
pub const RECORD_FIELD: &str = "record";

/// One ledger line: string keys to string values, in insertion order.
///
/// Re-inserting an existing key replaces its value but keeps its position.
pub type Record = IndexMap<String, String>;

/// Alias to full key path, e.g. `k0 -> user.name`
pub type Keymap = IndexMap<String, String>;

/// A decoded ledger: data records plus the keymap that was stored alongside them.
///
/// The keymap record is never part of `records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub records: Vec<Record>,
    pub keymap: Keymap,
}

impl Ledger {
    pub fn new(records: Vec<Record>) -> Self {
        Ledger {
            records,
            keymap: Keymap::new(),
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Configuration for conversions
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Prefix for generated aliases (`k` gives `k0`, `k1`, ...)
    pub alias_prefix: String,

    /// Rewrite aliased keys to their full paths when exporting
    pub expand_keymap: bool,

    /// Indent JSON output
    pub pretty: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            alias_prefix: String::from("k"),
            expand_keymap: true,
            pretty: true,
        }
    }
}
