use crate::flatten::alias::AliasGenerator;
use crate::flatten::shape::{Shape, Structured};
use crate::types::{Ledger, Record, RECORD_FIELD};
use tracing::debug;

/// Record kind written for each flattened document
pub const DOC_RECORD: &str = "yaml-doc";

/// Field carrying the zero-based position of a document in its batch
pub const DOC_INDEX_FIELD: &str = "doc_index";

/// Flattens a batch of nested documents into one record per document.
///
/// Each scalar leaf becomes `alias:value`, where the alias stands for the
/// dotted path of the leaf (`a.b.0.c`). All documents added to one flattener
/// share its alias generator.
pub struct StructuralFlattener {
    aliases: AliasGenerator,
    records: Vec<Record>,
}

impl StructuralFlattener {
    pub fn new(aliases: AliasGenerator) -> Self {
        StructuralFlattener {
            aliases,
            records: Vec::new(),
        }
    }

    /// Flatten `document` as the next document of the batch
    pub fn add_document<T: Structured>(&mut self, document: &T) -> &Record {
        let mut record = Record::new();
        record.insert(RECORD_FIELD.to_string(), DOC_RECORD.to_string());
        record.insert(DOC_INDEX_FIELD.to_string(), self.records.len().to_string());

        // A null document keeps only its tag; a bare scalar has an empty
        // path and is skipped the same way.
        self.walk(document, "", &mut record);

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn add_documents<'a, T, I>(&mut self, documents: I)
    where
        T: Structured + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for document in documents {
            self.add_document(document);
        }
    }

    /// Finish the batch: the flattened records and the keymap of every alias used
    pub fn finish(self) -> Ledger {
        debug!(
            documents = self.records.len(),
            aliases = self.aliases.len(),
            "flattened document batch"
        );
        Ledger::new(self.records).with_keymap(self.aliases.into_keymap())
    }

    /// Recursively walk a node, aliasing the path of every scalar leaf
    fn walk<T: Structured>(&mut self, node: &T, prefix: &str, record: &mut Record) {
        match node.shape() {
            Shape::Mapping(entries) => {
                for (key, child) in entries {
                    self.walk(child, &child_path(prefix, &key), record);
                }
            }
            Shape::Sequence(items) => {
                for (idx, child) in items.into_iter().enumerate() {
                    self.walk(child, &child_path(prefix, &idx.to_string()), record);
                }
            }
            Shape::Null => self.leaf(prefix, String::new(), record),
            Shape::Scalar(text) => self.leaf(prefix, text, record),
        }
    }

    fn leaf(&mut self, path: &str, value: String, record: &mut Record) {
        if path.is_empty() {
            return;
        }
        let alias = self.aliases.alias_for(path).to_string();
        record.insert(alias, value);
    }
}

impl Default for StructuralFlattener {
    fn default() -> Self {
        StructuralFlattener::new(AliasGenerator::default())
    }
}

fn child_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
