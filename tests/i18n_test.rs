//! Translation completeness and lookup behaviour across all UI languages.

use swisstour::i18n::{self, lookup, Lookup};
use swisstour::{has_key, t, t_with, Language};

/// Keys the CLI and listing pages rely on.
const REQUIRED_KEYS: &[&str] = &[
    "title",
    "subtitle",
    "nav.map",
    "nav.sights",
    "nav.resorts",
    "nav.products",
    "map.sightsCount",
    "map.resortsCount",
    "sights.title",
    "resorts.title",
    "products.railOffers",
    "products.travelPasses",
    "products.holidayPackages",
    "sort.name",
    "sort.nameDesc",
    "sort.rankAsc",
    "sort.rankDesc",
    "common.error",
    "common.noResults",
    "common.language",
    "common.tools",
    "errors.loadFailed",
    "language.en",
    "language.de",
    "language.fr",
    "language.it",
];

#[test]
fn every_language_has_the_required_keys() {
    for lang in Language::ALL {
        for key in REQUIRED_KEYS {
            assert!(has_key(lang, key), "{lang} is missing '{key}'");
        }
    }
}

#[test]
fn every_language_matches_english_key_set() {
    let english = i18n::keys(Language::En);
    assert!(!english.is_empty());

    for lang in Language::ALL {
        let keys = i18n::keys(lang);
        for key in &keys {
            assert!(english.contains(key), "{lang} defines '{key}' which English lacks");
        }
        for key in &english {
            assert!(keys.contains(key), "{lang} is missing '{key}'");
        }
    }
}

#[test]
fn every_translated_value_is_found_not_fallen_back() {
    for lang in Language::ALL {
        for key in i18n::keys(Language::En) {
            assert!(matches!(lookup(lang, &key), Lookup::Found(_)), "{lang}: '{key}'");
        }
    }
}

#[test]
fn concrete_lookups() {
    assert_eq!(t(Language::De, "title"), "Schweizer Tourismus Karte");
    assert_eq!(t(Language::De, "nonexistent_key"), "nonexistent_key");
    assert_eq!(t(Language::En, "nav.resorts"), "Resorts");
}

#[test]
fn interpolation_leaves_unknown_placeholders() {
    assert_eq!(
        t_with(Language::En, "map.sightsCount", [("displayed", "5")]),
        "5 of {total} sights"
    );
}

#[test]
fn interpolation_is_repeatable() {
    let first = t_with(Language::Fr, "map.resortsCount", [("displayed", 3), ("total", 9)]);
    let second = t_with(Language::Fr, "map.resortsCount", [("displayed", 3), ("total", 9)]);
    assert_eq!(first, second);
    assert_eq!(first, "3 sur 9 stations");
}

#[test]
fn missing_key_with_params_still_interpolates_the_key() {
    assert_eq!(t_with(Language::It, "no.such.{thing}", [("thing", "key")]), "no.such.key");
}
