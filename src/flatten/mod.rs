//! Flattening nested data into ledger records
//!
//! - **structure**: nested documents (YAML, JSON) become one record per
//!   document with aliased dotted paths as keys
//! - **html**: markup becomes one record per element or text node, linked by ids

pub mod alias;
pub mod html;
pub mod shape;
pub mod structure;

pub use alias::AliasGenerator;
pub use html::{HtmlFlattener, HtmlTree};
pub use shape::{stringify, stringify_any, Shape, Structured};
pub use structure::StructuralFlattener;

/// Split a YAML stream into its documents. An empty stream has none.
#[cfg(feature = "yaml")]
pub fn yaml_documents(text: &str) -> crate::error::Result<Vec<serde_yaml::Value>> {
    use serde::Deserialize;

    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        documents.push(serde_yaml::Value::deserialize(document)?);
    }
    Ok(documents)
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;

    #[test]
    fn test_multi_document_stream() {
        let documents = yaml_documents("a: 1\n---\n- x\n- y\n").unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].is_mapping());
        assert!(documents[1].is_sequence());
    }

    #[test]
    fn test_flatten_yaml_batch() {
        let documents = yaml_documents("star:\n  name: Rigel\n---\nstar:\n  name: Vega\n").unwrap();
        let mut flattener = StructuralFlattener::default();
        flattener.add_documents(&documents);
        let ledger = flattener.finish();

        assert_eq!(ledger.records[0].get("k0").unwrap(), "Rigel");
        assert_eq!(ledger.records[1].get("k0").unwrap(), "Vega");
        assert_eq!(ledger.keymap.len(), 1);
        assert_eq!(
            ledger.to_text(),
            "record:keymap,k0:star.name\n\
             record:yaml-doc,doc_index:0,k0:Rigel\n\
             record:yaml-doc,doc_index:1,k0:Vega\n"
        );
    }
}
