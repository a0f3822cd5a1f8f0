use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    pub key: String,
    pub text: String,
}

/// Externalized script strings, kept in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<StringEntry>", into = "Vec<StringEntry>")]
pub struct StringTable {
    entries: Vec<StringEntry>,
    index: HashMap<String, usize>,
    // per prefix, every `{prefix}{n}` below this is taken
    next_free: HashMap<String, usize>,
}

impl PartialEq for StringTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for StringTable {}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `text` under the lowest free `{prefix}{n}` key and returns the key.
    pub fn insert(&mut self, prefix: &str, text: impl Into<String>) -> String {
        let mut n = self.next_free.get(prefix).copied().unwrap_or(0);
        let mut key = format!("{prefix}{n}");
        while self.index.contains_key(&key) {
            n += 1;
            key = format!("{prefix}{n}");
        }
        self.next_free.insert(prefix.to_string(), n + 1);
        self.set(key.clone(), text);
        key
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|i| self.entries[*i].text.as_str())
    }

    /// Replaces the text of `key`, appending it if new.
    pub fn set(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.index.get(&key) {
            Some(i) => self.entries[*i].text = text,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(StringEntry { key, text });
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.text.as_str()))
    }
}

impl From<Vec<StringEntry>> for StringTable {
    fn from(entries: Vec<StringEntry>) -> Self {
        let mut table = StringTable::new();
        for e in entries {
            table.set(e.key, e.text);
        }
        table
    }
}

impl From<StringTable> for Vec<StringEntry> {
    fn from(table: StringTable) -> Self {
        table.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_insertion_order() {
        let mut t = StringTable::new();
        assert_eq!(t.insert("T", "first"), "T0");
        assert_eq!(t.insert("T", "second"), "T1");
        t.set("T0", "premier");
        assert_eq!(t.get("T0"), Some("premier"));
        let keys: Vec<_> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["T0", "T1"]);
    }

    #[test]
    fn insert_skips_taken_keys() {
        let mut t = StringTable::new();
        t.set("T1", "manual");
        assert_eq!(t.insert("T", "a"), "T0");
        assert_eq!(t.insert("T", "b"), "T2");
        assert_eq!(t.insert("T", "c"), "T3");
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn prefixes_count_separately() {
        let mut t = StringTable::new();
        t.insert("T", "a");
        t.insert("T", "b");
        assert_eq!(t.insert("L", "c"), "L0");
        assert_eq!(t.insert("T", "d"), "T2");
    }

    #[test]
    fn loaded_tables_fill_from_zero() {
        let yaml = "- key: T0\n  text: a\n- key: T2\n  text: b\n";
        let mut t: StringTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(t.insert("T", "c"), "T1");
        assert_eq!(t.insert("T", "d"), "T3");
    }

    #[test]
    fn yaml_keeps_order() {
        let mut t = StringTable::new();
        t.insert("L", "b");
        t.insert("L", "a");
        let yaml = serde_yaml::to_string(&t).unwrap();
        let back: StringTable = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.get("L1"), Some("a"));
    }
}
