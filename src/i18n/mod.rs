//! Translation lookup for the supported UI languages.
//!
//! Each language is a nested JSON document compiled into the binary. Keys are
//! dotted paths (`map.sightsCount`). A key missing from the requested language
//! falls back to English, and a key missing from English comes back unchanged,
//! so [`t`] always yields something displayable.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Fr,
    It,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::De, Language::Fr, Language::It];

    /// ISO 639-1 code, also what the remote service expects as `lang`.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::It => "it",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Language::En => include_str!("locales/en.json"),
            Language::De => include_str!("locales/de.json"),
            Language::Fr => include_str!("locales/fr.json"),
            Language::It => include_str!("locales/it.json"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        // Accept region-tagged codes such as "de-CH".
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == primary)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Outcome of a lookup before it is collapsed to a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    FellBack(&'a str),
    Missing,
}

impl<'a> Lookup<'a> {
    pub fn or_key(self, key: &'a str) -> &'a str {
        match self {
            Lookup::Found(s) | Lookup::FellBack(s) => s,
            Lookup::Missing => key,
        }
    }
}

/// A set of per-language translation trees.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    trees: HashMap<Language, Value>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The locales compiled into the crate.
    pub fn builtin() -> &'static Translations {
        static BUILTIN: OnceLock<Translations> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut translations = Translations::new();
            for lang in Language::ALL {
                match serde_json::from_str(lang.source()) {
                    Ok(tree) => { translations.insert(lang, tree); }
                    Err(e) => tracing::error!(lang = %lang, error = %e, "locale file is not valid JSON"),
                }
            }
            translations
        })
    }

    pub fn insert(&mut self, lang: Language, tree: Value) {
        self.trees.insert(lang, tree);
    }

    fn resolve(&self, lang: Language, key: &str) -> Option<&str> {
        let mut node = self.trees.get(&lang)?;
        for segment in key.split('.') {
            node = node.get(segment)?;
        }
        node.as_str()
    }

    pub fn lookup(&self, lang: Language, key: &str) -> Lookup<'_> {
        if let Some(s) = self.resolve(lang, key) {
            return Lookup::Found(s);
        }
        if lang != Language::En {
            if let Some(s) = self.resolve(Language::En, key) {
                return Lookup::FellBack(s);
            }
        }
        Lookup::Missing
    }

    pub fn t(&self, lang: Language, key: &str) -> String {
        self.lookup(lang, key).or_key(key).to_string()
    }

    pub fn t_with<I, K, V>(&self, lang: Language, key: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        interpolate(self.lookup(lang, key).or_key(key), params)
    }

    pub fn has_key(&self, lang: Language, key: &str) -> bool {
        self.resolve(lang, key).is_some()
    }

    /// All dotted keys with a string value in `lang`, sorted.
    pub fn keys(&self, lang: Language) -> Vec<String> {
        fn walk(prefix: &str, node: &Value, out: &mut Vec<String>) {
            match node {
                Value::Object(map) => {
                    for (k, v) in map {
                        let path = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
                        walk(&path, v, out);
                    }
                }
                Value::String(_) => out.push(prefix.to_string()),
                _ => {}
            }
        }

        let mut out = Vec::new();
        if let Some(root) = self.trees.get(&lang) {
            walk("", root, &mut out);
        }
        out.sort();
        out
    }
}

pub fn lookup(lang: Language, key: &str) -> Lookup<'static> {
    Translations::builtin().lookup(lang, key)
}

/// Translate `key`, falling back to English and then to the key itself.
pub fn t(lang: Language, key: &str) -> String {
    Translations::builtin().t(lang, key)
}

/// Translate `key` and substitute `{name}` placeholders from `params`.
pub fn t_with<I, K, V>(lang: Language, key: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    Translations::builtin().t_with(lang, key, params)
}

/// Replace `{name}` with the matching parameter. Placeholders without a
/// parameter are left as they are.
pub fn interpolate<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    let params: HashMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match params.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Existence check in `lang` only, no fallback.
pub fn has_key(lang: Language, key: &str) -> bool {
    Translations::builtin().has_key(lang, key)
}

pub fn keys(lang: Language) -> Vec<String> {
    Translations::builtin().keys(lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_title() {
        assert_eq!(t(Language::De, "title"), "Schweizer Tourismus Karte");
    }

    #[test]
    fn missing_everywhere_returns_key() {
        assert_eq!(t(Language::De, "nonexistent_key"), "nonexistent_key");
        assert_eq!(lookup(Language::De, "nonexistent_key"), Lookup::Missing);
    }

    #[test]
    fn nested_lookup() {
        assert_eq!(t(Language::Fr, "nav.map"), "Carte");
    }

    #[test]
    fn intermediate_object_is_not_a_hit() {
        assert!(!has_key(Language::En, "nav"));
        assert_eq!(t(Language::En, "nav"), "nav");
    }

    #[test]
    fn key_below_a_leaf_is_missing() {
        assert_eq!(t(Language::En, "title.extra"), "title.extra");
    }

    #[test]
    fn english_lookup_never_reports_fallback() {
        assert_eq!(lookup(Language::En, "title"), Lookup::Found("Swiss Tourism Map"));
    }

    #[test]
    fn unmatched_placeholders_survive() {
        let s = t_with(Language::En, "map.sightsCount", [("displayed", "5")]);
        assert_eq!(s, "5 of {total} sights");
    }

    #[test]
    fn all_placeholders_replaced() {
        let s = t_with(Language::De, "map.sightsCount", [("displayed", 5), ("total", 12)]);
        assert_eq!(s, "5 von 12 Sehenswürdigkeiten");
    }

    #[test]
    fn interpolate_repeated_and_unclosed() {
        assert_eq!(interpolate("{a}-{a} {b", [("a", "x")]), "x-x {b");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        assert_eq!(interpolate("{a}{b}", [("a", "{b}"), ("b", "y")]), "{b}y");
    }

    #[test]
    fn partial_locale_falls_back_to_english() {
        let mut translations = Translations::new();
        translations.insert(Language::En, serde_json::json!({ "a": { "b": "English B", "c": "English C" } }));
        translations.insert(Language::It, serde_json::json!({ "a": { "b": "Italiano B" } }));

        assert_eq!(translations.lookup(Language::It, "a.b"), Lookup::Found("Italiano B"));
        assert_eq!(translations.lookup(Language::It, "a.c"), Lookup::FellBack("English C"));
        assert_eq!(translations.t(Language::It, "a.d"), "a.d");
        assert!(!translations.has_key(Language::It, "a.c"));
        assert_eq!(translations.keys(Language::En), vec!["a.b", "a.c"]);
    }

    #[test]
    fn language_without_tree_uses_english() {
        let mut translations = Translations::new();
        translations.insert(Language::En, serde_json::json!({ "title": "T" }));
        assert_eq!(translations.t(Language::Fr, "title"), "T");
    }

    #[test]
    fn language_parsing() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::De);
        assert_eq!("FR".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("it-CH".parse::<Language>().unwrap(), Language::It);
        assert!("rm".parse::<Language>().is_err());
    }

    #[test]
    fn language_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Language::De).unwrap(), "\"de\"");
    }
}
