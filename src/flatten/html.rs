//! Markup flattening
//!
//! Markup is tokenized (not tree-built, so no implied `html`/`body` nodes are
//! added) and every element and non-blank text run becomes one record. Records
//! link to their parent by `parent` and list their children as `child0`,
//! `child1`, ...
//!
//! The node tree is built in an arena first and frozen into records in one
//! pass at the end.

use crate::types::{Record, RECORD_FIELD};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::interface::TokenizerResult;
use std::cell::RefCell;
use tracing::{debug, trace};

pub const ELEMENT_RECORD: &str = "element";
pub const TEXT_RECORD: &str = "text";

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena of parsed nodes plus the stack of currently open elements
#[derive(Debug, Default)]
pub struct HtmlTree {
    nodes: Vec<Node>,
    open: Vec<usize>,
}

impl HtmlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids share one counter across elements and text: `n0`, `t1`, `n2`, ...
    fn next_id(&self, prefix: char) -> String {
        format!("{}{}", prefix, self.nodes.len())
    }

    fn push(&mut self, id: String, kind: NodeKind) -> usize {
        let index = self.nodes.len();
        let parent = self.open.last().copied();
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        self.nodes.push(Node {
            id,
            kind,
            parent,
            children: Vec::new(),
        });
        index
    }

    pub fn open_element(&mut self, tag: &str, attrs: Vec<(String, String)>) {
        let id = self.next_id('n');
        let index = self.push(
            id,
            NodeKind::Element {
                tag: tag.to_string(),
                attrs,
            },
        );
        self.open.push(index);
    }

    /// Close the innermost open element. Stray close tags are ignored.
    pub fn close_element(&mut self) {
        self.open.pop();
    }

    /// Add a text node; blank text is ignored and the rest is trimmed
    pub fn text(&mut self, data: &str) {
        let text = data.trim();
        if text.is_empty() {
            return;
        }
        let id = self.next_id('t');
        self.push(id, NodeKind::Text(text.to_string()));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freeze the tree into records, in document order
    pub fn to_records(&self) -> Vec<Record> {
        self.nodes.iter().map(|node| self.node_record(node)).collect()
    }

    fn node_record(&self, node: &Node) -> Record {
        let mut record = Record::new();
        let parent = node.parent.map(|index| self.nodes[index].id.clone());

        match &node.kind {
            NodeKind::Element { tag, attrs } => {
                record.insert(RECORD_FIELD.to_string(), ELEMENT_RECORD.to_string());
                record.insert("id".to_string(), node.id.clone());
                record.insert("tag".to_string(), tag.clone());
                if let Some(parent) = parent {
                    record.insert("parent".to_string(), parent);
                }
                for (name, value) in attrs {
                    record.insert(format!("attr.{}", name), value.clone());
                }
            }
            NodeKind::Text(text) => {
                record.insert(RECORD_FIELD.to_string(), TEXT_RECORD.to_string());
                record.insert("id".to_string(), node.id.clone());
                record.insert("text".to_string(), text.clone());
                if let Some(parent) = parent {
                    record.insert("parent".to_string(), parent);
                }
            }
        }

        for (idx, child) in node.children.iter().enumerate() {
            record.insert(format!("child{}", idx), self.nodes[*child].id.clone());
        }
        record
    }
}

/// Token sink feeding the tree; character tokens are buffered so one run of
/// text between two markup events becomes one node.
#[derive(Default)]
struct TreeSink {
    tree: RefCell<HtmlTree>,
    pending_text: RefCell<String>,
}

impl TreeSink {
    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.pending_text.borrow_mut());
        if !text.is_empty() {
            self.tree.borrow_mut().text(&text);
        }
    }
}

impl TokenSink for TreeSink {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.pending_text.borrow_mut().push_str(&text);
            }
            Token::NullCharacterToken => {
                self.pending_text.borrow_mut().push('\0');
            }
            Token::TagToken(tag) => {
                self.flush_text();
                match tag.kind {
                    TagKind::StartTag => {
                        let name = tag.name.to_string();
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect();

                        let mut tree = self.tree.borrow_mut();
                        tree.open_element(&name, attrs);
                        if tag.self_closing {
                            tree.close_element();
                        } else if let Some(kind) = raw_text_kind(&name) {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => self.tree.borrow_mut().close_element(),
                }
            }
            Token::ParseError(message) => {
                trace!(line = line_number, %message, "tolerated markup error");
            }
            _ => self.flush_text(),
        }
        TokenSinkResult::Continue
    }
}

/// Elements whose content is raw text rather than markup
fn raw_text_kind(tag: &str) -> Option<RawKind> {
    match tag {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}

/// Flattens markup into element and text records.
///
/// Markup may be fed in several chunks; tokenizer state carries across them.
pub struct HtmlFlattener {
    tokenizer: Tokenizer<TreeSink>,
    input: BufferQueue,
}

impl HtmlFlattener {
    pub fn new() -> Self {
        HtmlFlattener {
            tokenizer: Tokenizer::new(TreeSink::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
        }
    }

    pub fn feed(&mut self, markup: &str) {
        self.input.push_back(StrTendril::from_slice(markup));
        // The sink never hands back a script to run
        let result = self.tokenizer.feed(&self.input);
        debug_assert!(matches!(result, TokenizerResult::Done));
    }

    /// Flush the tokenizer and emit every node as a record
    pub fn finish(self) -> Vec<Record> {
        self.tokenizer.end();
        self.tokenizer.sink.flush_text();

        let tree = self.tokenizer.sink.tree.take();
        debug!(nodes = tree.len(), "flattened markup");
        tree.to_records()
    }
}

impl Default for HtmlFlattener {
    fn default() -> Self {
        Self::new()
    }
}
