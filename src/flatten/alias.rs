use crate::types::Keymap;
use std::collections::HashMap;

/// Hands out short sequential aliases for dotted key paths.
///
/// The same path always gets the same alias for the lifetime of the
/// generator, so one generator shared across a document batch keeps the
/// keymap at one entry per distinct path.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    prefix: String,
    path_to_alias: HashMap<String, String>,
    alias_to_path: Keymap,
}

impl AliasGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        AliasGenerator {
            prefix: prefix.into(),
            path_to_alias: HashMap::new(),
            alias_to_path: Keymap::new(),
        }
    }

    /// Alias for `path`, allocating `<prefix><n>` on first sight
    pub fn alias_for(&mut self, path: &str) -> &str {
        if !self.path_to_alias.contains_key(path) {
            let alias = format!("{}{}", self.prefix, self.path_to_alias.len());
            self.alias_to_path.insert(alias.clone(), path.to_string());
            self.path_to_alias.insert(path.to_string(), alias);
        }
        &self.path_to_alias[path]
    }

    pub fn len(&self) -> usize {
        self.path_to_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_to_alias.is_empty()
    }

    pub fn into_keymap(self) -> Keymap {
        self.alias_to_path
    }
}

impl Default for AliasGenerator {
    fn default() -> Self {
        AliasGenerator::new("k")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_sequential() {
        let mut aliases = AliasGenerator::default();
        assert_eq!(aliases.alias_for("a.b"), "k0");
        assert_eq!(aliases.alias_for("a.c"), "k1");
        assert_eq!(aliases.alias_for("d"), "k2");
    }

    #[test]
    fn test_alias_is_memoized() {
        let mut aliases = AliasGenerator::default();
        assert!(aliases.is_empty());
        let first = aliases.alias_for("user.name").to_string();
        aliases.alias_for("user.age");
        assert_eq!(aliases.alias_for("user.name"), first);
        assert_eq!(aliases.len(), 2);
        assert!(!aliases.is_empty());
    }

    #[test]
    fn test_custom_prefix_and_keymap_order() {
        let mut aliases = AliasGenerator::new("f");
        aliases.alias_for("x");
        aliases.alias_for("y");

        let keymap = aliases.into_keymap();
        let pairs: Vec<_> = keymap.iter().map(|(a, p)| (a.as_str(), p.as_str())).collect();
        assert_eq!(pairs, vec![("f0", "x"), ("f1", "y")]);
    }
}
