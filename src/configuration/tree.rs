use crate::error::Error;
use serde_derive::{Deserialize, Serialize};
use std::collections::btree_map::{Iter, Keys};
use std::collections::BTreeMap;
use std::fmt;

/// A single configuration value: either a scalar leaf, a list or a nested tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Setting>),
    Tree(ConfigTree),
    Nil,
}

/// Tree of string keys to settings. Both the control file and the decoded
/// environment are represented as a `ConfigTree` so that layers can be
/// deep-merged leaf by leaf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree(BTreeMap<String, Setting>);

impl Setting {
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            Setting::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Scalars rendered as text. Lists and trees have no scalar form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Setting::Text(text) => Some(text.clone()),
            Setting::Int(value) => Some(value.to_string()),
            Setting::Float(value) => Some(value.to_string()),
            Setting::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Integers, or text holding an integer (environment values are always text).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Setting::Int(value) => Some(*value),
            Setting::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Setting::Bool(value) => Some(*value),
            Setting::Int(value) => Some(*value != 0),
            Setting::Text(text) => match text.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Setting::Bool(value) => value.fmt(f),
            Setting::Int(value) => value.fmt(f),
            Setting::Float(value) => value.fmt(f),
            Setting::Text(text) => text.fmt(f),
            Setting::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", rendered.join(","))
            }
            Setting::Tree(tree) => write!(f, "{:?}", tree.0),
            Setting::Nil => Ok(()),
        }
    }
}

impl From<&str> for Setting {
    fn from(text: &str) -> Self {
        Setting::Text(text.to_owned())
    }
}

impl From<String> for Setting {
    fn from(text: String) -> Self {
        Setting::Text(text)
    }
}

impl From<i64> for Setting {
    fn from(value: i64) -> Self {
        Setting::Int(value)
    }
}

impl From<bool> for Setting {
    fn from(value: bool) -> Self {
        Setting::Bool(value)
    }
}

impl From<Vec<Setting>> for Setting {
    fn from(items: Vec<Setting>) -> Self {
        Setting::List(items)
    }
}

impl From<ConfigTree> for Setting {
    fn from(tree: ConfigTree) -> Self {
        Setting::Tree(tree)
    }
}

impl ConfigTree {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a singleton chain `keys[0] -> keys[1] -> ... -> value`.
    pub fn from_path<S: AsRef<str>>(keys: &[S], value: Setting) -> Self {
        let mut tree = ConfigTree::new();
        if let Some((last, parents)) = keys.split_last() {
            let mut current = &mut tree;
            for key in parents {
                current = current.tree_entry(key.as_ref());
            }
            current.insert(last.as_ref(), value);
        }
        tree
    }

    /// Deep merge: `other` wins on every leaf it defines, nested trees are
    /// merged recursively and keys unique to either side survive. A null in
    /// `other` never erases an existing value.
    pub fn merge(&mut self, other: ConfigTree) {
        for (key, incoming) in other.0 {
            match (self.0.get_mut(&key), incoming) {
                (Some(Setting::Tree(current)), Setting::Tree(incoming)) => current.merge(incoming),
                (Some(_), Setting::Nil) => {}
                (_, incoming) => {
                    self.0.insert(key, incoming);
                }
            }
        }
    }

    pub fn merged(mut self, other: ConfigTree) -> Self {
        self.merge(other);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.0.get(key)
    }

    pub fn get_path(&self, path: &[&str]) -> Option<&Setting> {
        let (first, rest) = path.split_first()?;
        let setting = self.get(first)?;
        if rest.is_empty() {
            Some(setting)
        } else {
            setting.as_tree()?.get_path(rest)
        }
    }

    pub fn tree(&self, key: &str) -> Option<&ConfigTree> {
        self.get(key).and_then(Setting::as_tree)
    }

    /// Mutable access to the subtree at `key`, creating it (or replacing a
    /// non-tree value) when necessary.
    pub fn tree_entry(&mut self, key: &str) -> &mut ConfigTree {
        let entry = self
            .0
            .entry(key.to_owned())
            .or_insert_with(|| Setting::Tree(ConfigTree::new()));
        if !matches!(entry, Setting::Tree(_)) {
            *entry = Setting::Tree(ConfigTree::new());
        }
        match entry {
            Setting::Tree(tree) => tree,
            _ => unreachable!("entry was just made a tree"),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Setting::as_text)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Setting::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Setting::as_bool)
    }

    /// Like [`get_str`](Self::get_str) but names the missing leaf as
    /// `<scope>.<key>` in the error.
    pub fn require_str(&self, scope: &str, key: &str) -> Result<String, Error> {
        self.get_str(key)
            .ok_or_else(|| Error::MissingSetting(format!("{}.{}", scope, key)))
    }

    pub fn require_int(&self, scope: &str, key: &str) -> Result<i64, Error> {
        let setting = self
            .get(key)
            .ok_or_else(|| Error::MissingSetting(format!("{}.{}", scope, key)))?;
        setting.as_int().ok_or_else(|| Error::InvalidSetting {
            path: format!("{}.{}", scope, key),
            value: setting.to_string(),
            reason: "not an integer".to_owned(),
        })
    }

    pub fn insert<K: Into<String>, V: Into<Setting>>(&mut self, key: K, value: V) -> Option<Setting> {
        self.0.insert(key.into(), value.into())
    }

    pub fn set_path(&mut self, path: &[&str], value: Setting) {
        if let Some((last, parents)) = path.split_last() {
            let mut current = self;
            for key in parents {
                current = current.tree_entry(key);
            }
            current.insert(*last, value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Setting> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, Setting> {
        self.0.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Setting> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> std::iter::FromIterator<(K, Setting)> for ConfigTree {
    fn from_iter<T: IntoIterator<Item = (K, Setting)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, Setting);
    type IntoIter = std::collections::btree_map::IntoIter<String, Setting>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
