//! Canonical place-name keys
//!
//! The tree inventory, the garden registry, the station list and the territory
//! boundary files spell the same borough differently ("Côte-des-Neiges",
//! "COTE DES NEIGES", "Cote–des–Neiges"). [`normalize`] folds all of them onto one key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Separators dropped from names: hyphen-minus, hyphen, non-breaking hyphen, figure dash,
/// en dash, em dash.
const SEPARATORS: &[char] = &['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}'];

/// Built-in aliases, applied after normalization.
///
/// The station list still carries the historical compound borough name.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("Hochelaga-Maisonneuve", "Maisonneuve")];

/// Canonicalize a free-text place name.
///
/// Lower-cases, decomposes (NFD) and drops combining marks, then removes hyphens,
/// dashes and whitespace. The result is idempotent and identical for NFC and NFD
/// spellings of the same visual string.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !c.is_whitespace() && !SEPARATORS.contains(c))
        .collect()
}

/// A name already passed through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A raw alias pair as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub from: String,
    pub to: String,
}

/// Post-normalization override table.
///
/// Resolution is a single lookup: an alias target is never itself re-aliased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<NormalizedName, NormalizedName>,
    display: BTreeMap<NormalizedName, String>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding [`DEFAULT_ALIASES`]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for (from, to) in DEFAULT_ALIASES {
            table.insert(from, to);
        }
        table
    }

    /// Add an alias. A later entry for the same source name replaces the earlier one.
    pub fn insert(&mut self, from: &str, to: &str) {
        let target = NormalizedName::new(to);
        self.display.insert(target.clone(), to.trim().to_string());
        self.entries.insert(NormalizedName::new(from), target);
    }

    /// Extend with configured entries
    pub fn extend<'a>(&mut self, aliases: impl IntoIterator<Item = &'a AliasEntry>) {
        for alias in aliases {
            self.insert(&alias.from, &alias.to);
        }
    }

    /// Resolve an already-normalized key
    pub fn resolve(&self, name: NormalizedName) -> NormalizedName {
        match self.entries.get(&name) {
            Some(target) => target.clone(),
            None => name,
        }
    }

    /// Normalize a raw name and resolve it
    pub fn key(&self, raw: &str) -> NormalizedName {
        self.resolve(NormalizedName::new(raw))
    }

    /// Display form of a raw name: the alias target as written, or the trimmed input.
    pub fn display_name(&self, raw: &str) -> String {
        let key = NormalizedName::new(raw);
        match self.entries.get(&key).and_then(|target| self.display.get(target)) {
            Some(name) => name.clone(),
            None => raw.trim().to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
