//! Decoding of `ROBOTMK_*` environment variables into a configuration tree.
//!
//! Variable names are flattened key paths joined by `_`, e.g.
//! `ROBOTMK_GLOBAL_OUTPUTDIR` is `global.outputdir`. Two kinds of segments keep
//! their inner underscores: the preserved setting words (`CACHE_TIME`, ...)
//! and suite ids, which are recognised by the suite setting that follows
//! them (`ROBOTMK_SUITES_<id>_<subkey>`).
use crate::configuration::constants::environment::{PREFIX, PRESERVED_WORDS, SUITE_SUBKEYS};
use crate::configuration::tree::{ConfigTree, Setting};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

/// Stands in for protected underscores while a name is split. Environment
/// variable names cannot contain NUL on any supported platform.
const SENTINEL: char = '\u{0}';

lazy_static! {
    static ref SUITE_PATTERNS: Vec<Regex> = SUITE_SUBKEYS
        .iter()
        .map(|subkey| {
            Regex::new(&format!(
                r"^(?:.*_)?SUITES_(?P<id>.+)_{}(?:_.*)?$",
                regex::escape(&subkey.to_uppercase())
            ))
            .expect("Regex compilation error")
        })
        .collect();
}

#[derive(Debug, Clone)]
pub struct EnvVarDecoder {
    prefix: String,
    preserved_words: Vec<String>,
}

impl Default for EnvVarDecoder {
    fn default() -> Self {
        Self::new(PREFIX, PRESERVED_WORDS)
    }
}

impl EnvVarDecoder {
    pub fn new<S: AsRef<str>>(prefix: &str, preserved_words: &[S]) -> Self {
        Self {
            prefix: prefix.to_owned(),
            preserved_words: preserved_words
                .iter()
                .map(|word| word.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// Decodes every variable carrying the prefix into one tree. Values stay
    /// text; variables are visited in name order so the result does not
    /// depend on the platform's environment ordering.
    pub fn decode<I, K, V>(&self, vars: I) -> ConfigTree
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sorted: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let mut decoded = ConfigTree::new();
        for (name, value) in sorted {
            let stripped = match name.strip_prefix(self.prefix.as_str()) {
                Some(stripped) => stripped,
                None => continue,
            };
            let keys = self.key_path(stripped);
            if keys.is_empty() {
                continue;
            }
            trace!("Environment variable {} decoded to {}", name, keys.join("."));
            decoded.merge(ConfigTree::from_path(&keys, Setting::Text(value)));
        }
        decoded
    }

    /// Splits a prefix-less variable name into lower-case key segments.
    pub fn key_path(&self, name: &str) -> Vec<String> {
        let mut protected = name.to_uppercase();
        if let Some(range) = suite_id_range(&protected) {
            let id = protected[range.clone()].replace('_', &SENTINEL.to_string());
            protected.replace_range(range, &id);
        }
        for word in &self.preserved_words {
            if protected.contains(word.as_str()) {
                protected = protected.replace(word.as_str(), &word.replace('_', &SENTINEL.to_string()));
            }
        }
        protected
            .split('_')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.replace(SENTINEL, "_").to_lowercase())
            .collect()
    }
}

/// Locates the suite id in `SUITES_<id>_<subkey>`. Every subkey is tried;
/// when several match, the longest id wins, so a suite called `SELENIUM_TEST`
/// is not cut at the `TEST` subkey.
fn suite_id_range(name: &str) -> Option<Range<usize>> {
    SUITE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(name))
        .filter_map(|caps| caps.name("id").map(|id| id.range()))
        .max_by_key(|range| range.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(vars: Vec<(&str, &str)>) -> ConfigTree {
        EnvVarDecoder::default().decode(vars)
    }

    fn text(value: &str) -> Setting {
        Setting::from(value)
    }

    #[test]
    fn test_suite_id_with_subkey_word_stays_whole() {
        let tree = decode(vec![("ROBOTMK_SUITES_SELENIUM_TEST_PATH", "foo")]);
        assert_eq!(tree.get_path(&["suites", "selenium_test", "path"]), Some(&text("foo")));
    }

    #[test]
    fn test_longest_candidate_wins() {
        let tree = decode(vec![("ROBOTMK_SUITES_SELENIUM_TEST_SUITE", "Login")]);
        assert_eq!(tree.get_path(&["suites", "selenium_test", "suite"]), Some(&text("Login")));
    }

    #[test]
    fn test_preserved_word_is_one_key() {
        let tree = decode(vec![("ROBOTMK_LOG_ROTATION", "7")]);
        assert_eq!(tree.get("log_rotation"), Some(&text("7")));
        assert!(tree.get("log").is_none());
    }

    #[test]
    fn test_preserved_word_inside_global_path() {
        let tree = decode(vec![("ROBOTMK_GLOBAL_CACHE_TIME", "60")]);
        assert_eq!(tree.get_path(&["global", "cache_time"]), Some(&text("60")));
    }

    #[test]
    fn test_suite_cache_time_override() {
        let tree = decode(vec![("ROBOTMK_SUITES_WEB_SHOP_CACHE_TIME", "120")]);
        assert_eq!(tree.get_path(&["suites", "web_shop", "cache_time"]), Some(&text("120")));
    }

    #[test]
    fn test_plain_names_split_on_underscore() {
        let tree = decode(vec![("ROBOTMK_GLOBAL_OUTPUTDIR", "/tmp/out")]);
        assert_eq!(tree.get_path(&["global", "outputdir"]), Some(&text("/tmp/out")));
    }

    #[test]
    fn test_nested_variable_map() {
        let tree = decode(vec![
            ("ROBOTMK_SUITES_CHECKOUT_VARIABLE_USER", "bob"),
            ("ROBOTMK_SUITES_CHECKOUT_VARIABLE_SHOP_URL", "shop.example"),
        ]);
        assert_eq!(
            tree.get_path(&["suites", "checkout", "variable", "user"]),
            Some(&text("bob"))
        );
        assert_eq!(
            tree.get_path(&["suites", "checkout", "variable", "shop", "url"]),
            Some(&text("shop.example"))
        );
    }

    #[test]
    fn test_variablefile_is_not_variable() {
        let tree = decode(vec![("ROBOTMK_SUITES_MY_SUITE_VARIABLEFILE", "vars.py")]);
        assert_eq!(
            tree.get_path(&["suites", "my_suite", "variablefile"]),
            Some(&text("vars.py"))
        );
    }

    #[test]
    fn test_suite_protection_is_scoped_to_one_variable() {
        let tree = decode(vec![
            ("ROBOTMK_SUITES_A_B_NAME", "first"),
            ("ROBOTMK_GLOBAL_A_B", "second"),
        ]);
        assert_eq!(tree.get_path(&["suites", "a_b", "name"]), Some(&text("first")));
        assert_eq!(tree.get_path(&["global", "a", "b"]), Some(&text("second")));
        assert!(tree.get_path(&["global", "a_b"]).is_none());
    }

    #[test]
    fn test_foreign_variables_ignored() {
        let tree = decode(vec![
            ("PATH", "/usr/bin"),
            ("XROBOTMK_GLOBAL_X", "1"),
            ("ROBOTMK_", "empty"),
        ]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_values_stay_text() {
        let tree = decode(vec![("ROBOTMK_GLOBAL_LOGGING", "true")]);
        assert_eq!(tree.get_path(&["global", "logging"]), Some(&text("true")));
    }

    #[test]
    fn test_custom_prefix_and_words() {
        let decoder = EnvVarDecoder::new("RMK_", &["output_dir"]);
        let tree = decoder.decode(vec![("RMK_GLOBAL_OUTPUT_DIR", "/out")]);
        assert_eq!(tree.get_path(&["global", "output_dir"]), Some(&text("/out")));
    }
}
