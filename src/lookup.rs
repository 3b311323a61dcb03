//! Accent lookup with a fallback search ladder.
//!
//! `AccentLookup` resolves an expression to dictionary entries by trying, in
//! order: the expression itself (split from any furigana annotation), its
//! reading, a separator split with per-part lookups, and finally a
//! morpheme-by-morpheme analyzer pass. The first rung that produces entries
//! wins for its search root. Results are memoized in a bounded LRU cache.

use std::cell::RefCell;
use std::fmt::Write;

use crate::cache::LruCache;
use crate::config::LookupConfig;
use crate::kana;
use crate::mingle;
use crate::morph::{MorphologicalAnalyzer, ParsedMorpheme};
use crate::store::{AccentEntry, AccentStore, StoreError};
use crate::tokenize;

/// Flags controlling one lookup call. Part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupArgs {
    /// Strip markup from the expression before searching.
    pub sanitize: bool,
    /// Split the expression on separators and retry per part.
    pub recurse: bool,
    /// Allow analyzer passes (morpheme fallback, derived readings).
    pub use_analyzer: bool,
    /// Key results by stored headword instead of the query expression.
    pub group_by_headword: bool,
}

impl Default for LookupArgs {
    fn default() -> Self {
        Self {
            sanitize: true,
            recurse: true,
            use_analyzer: true,
            group_by_headword: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    expression: String,
    args: LookupArgs,
}

/// Lookup result: matched expressions in discovery order, each with a
/// non-empty entry list. A populated key is never overwritten by a later,
/// worse match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccentDict {
    order: Vec<String>,
    entries: std::collections::HashMap<String, Vec<AccentEntry>>,
}

impl AccentDict {
    /// Adds `entries` under `expression`. Empty entry lists and already
    /// populated keys are ignored.
    pub fn insert(&mut self, expression: &str, entries: Vec<AccentEntry>) {
        if entries.is_empty() || self.entries.contains_key(expression) {
            return;
        }
        self.order.push(expression.to_string());
        self.entries.insert(expression.to_string(), entries);
    }

    /// Absorbs `other`, keeping this dict's entries where keys collide.
    pub fn merge(&mut self, other: AccentDict) {
        for (expression, entries) in other {
            self.insert(&expression, entries);
        }
    }

    /// Entries for `expression`, if any were found.
    #[must_use]
    pub fn get(&self, expression: &str) -> Option<&[AccentEntry]> {
        self.entries.get(expression).map(Vec::as_slice)
    }

    /// Matched expressions in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(expression, entries)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AccentEntry])> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.entries[k].as_slice()))
    }

    /// Number of matched expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl IntoIterator for AccentDict {
    type Item = (String, Vec<AccentEntry>);
    type IntoIter = std::vec::IntoIter<(String, Vec<AccentEntry>)>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.order
            .iter()
            .map(|k| (k.clone(), self.entries.remove(k).unwrap_or_default()))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

/// Resolves expressions to accent entries through the store and an analyzer.
pub struct AccentLookup<A> {
    store: AccentStore,
    analyzer: A,
    config: LookupConfig,
    cache: RefCell<LruCache<LookupKey, AccentDict>>,
}

impl<A: MorphologicalAnalyzer> AccentLookup<A> {
    /// Builds a lookup over `store`, using `analyzer` for morpheme fallback.
    pub fn new(store: AccentStore, analyzer: A, config: LookupConfig) -> Self {
        let cache = RefCell::new(LruCache::new(config.cache_capacity));
        Self {
            store,
            analyzer,
            config,
            cache,
        }
    }

    /// The analyzer this lookup was built with.
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// The configuration this lookup was built with.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Looks up `expression` with default [`LookupArgs`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store is unreachable. A
    /// not-found expression is an empty dict, not an error.
    pub fn pronunciations(&self, expression: &str) -> Result<AccentDict, StoreError> {
        self.pronunciations_with(expression, LookupArgs::default())
    }

    /// Looks up `expression`, memoized by `(expression, args)`. A cache hit
    /// consults neither the store nor the analyzer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store is unreachable.
    pub fn pronunciations_with(
        &self,
        expression: &str,
        args: LookupArgs,
    ) -> Result<AccentDict, StoreError> {
        let key = LookupKey {
            expression: expression.to_string(),
            args,
        };
        if let Some(dict) = self.cache.borrow_mut().get(&key) {
            return Ok(dict.clone());
        }

        let expression = if args.sanitize {
            tokenize::sanitize_expr(expression)
        } else {
            expression.to_string()
        };
        let dict = self.search(&expression, args)?;
        self.cache.borrow_mut().insert(key, dict.clone());
        Ok(dict)
    }

    fn search(&self, expression: &str, args: LookupArgs) -> Result<AccentDict, StoreError> {
        let mut dict = AccentDict::default();
        if expression.is_empty() || self.config.blocklist.iter().any(|w| w == expression) {
            return Ok(dict);
        }

        let (word, supplied_reading) = mingle::split_possible_furigana(expression);
        let mut entries = self.store.search(&word, &self.config.preferred_source)?;

        // A supplied reading narrows the hits to entries that agree with it.
        if !supplied_reading.is_empty() && !entries.is_empty() {
            let reading = kana::to_katakana(&supplied_reading);
            entries.retain(|e| e.katakana_reading == reading);
        }

        // Retry keyed by the reading alone: the supplied one, or one derived
        // from a whole-word analyzer pass.
        if entries.is_empty() {
            let mut reading = supplied_reading;
            if reading.is_empty() && args.use_analyzer && self.config.kana_lookups {
                if let Some(derived) = self.derived_reading(&word) {
                    reading = derived;
                }
            }
            if !reading.is_empty() && kana::to_katakana(&reading) != kana::to_katakana(&word) {
                entries = self.store.search(&reading, &self.config.preferred_source)?;
            }
        }

        if !entries.is_empty() {
            insert_grouped(&mut dict, &word, entries, args.group_by_headword);
            return Ok(dict);
        }

        if args.recurse {
            let parts = tokenize::split_separators(&word);
            if parts.len() > 1 || parts.first().is_some_and(|p| *p != word) {
                let part_args = LookupArgs {
                    sanitize: false,
                    recurse: false,
                    ..args
                };
                for part in parts {
                    dict.merge(self.pronunciations_with(part, part_args)?);
                }
                return Ok(dict);
            }
        }

        if args.use_analyzer {
            for morpheme in self.morphemes(&word) {
                let (key, entries) = self.morpheme_entries(&morpheme)?;
                insert_grouped(&mut dict, &key, entries, args.group_by_headword);
            }
        }
        Ok(dict)
    }

    /// Headword lookup for one morpheme, falling back to its reading when
    /// the headword is unknown and kana lookups are enabled.
    fn morpheme_entries(
        &self,
        morpheme: &ParsedMorpheme,
    ) -> Result<(String, Vec<AccentEntry>), StoreError> {
        let entries = self
            .store
            .search(&morpheme.headword, &self.config.preferred_source)?;
        if !entries.is_empty() || !self.config.kana_lookups {
            return Ok((morpheme.headword.clone(), entries));
        }
        match &morpheme.katakana_reading {
            Some(reading) if kana::to_katakana(reading) != kana::to_katakana(&morpheme.headword) => {
                let entries = self.store.search(reading, &self.config.preferred_source)?;
                Ok((morpheme.headword.clone(), entries))
            }
            _ => Ok((morpheme.headword.clone(), Vec::new())),
        }
    }

    fn morphemes(&self, text: &str) -> Vec<ParsedMorpheme> {
        match self.analyzer.analyze(text) {
            Ok(morphemes) => morphemes,
            Err(err) => {
                log::warn!("treating analyzer failure as no morphemes: {err}");
                Vec::new()
            }
        }
    }

    /// Reading of `text` when the analyzer sees it as a single morpheme.
    fn derived_reading(&self, text: &str) -> Option<String> {
        let mut morphemes = self.morphemes(text);
        if morphemes.len() != 1 {
            return None;
        }
        morphemes.pop()?.katakana_reading
    }
}

fn insert_grouped(
    dict: &mut AccentDict,
    expression: &str,
    entries: Vec<AccentEntry>,
    group_by_headword: bool,
) {
    if !group_by_headword {
        dict.insert(expression, entries);
        return;
    }
    let mut order: Vec<String> = Vec::new();
    let mut grouped: std::collections::HashMap<String, Vec<AccentEntry>> =
        std::collections::HashMap::new();
    for entry in entries {
        if !grouped.contains_key(&entry.headword) {
            order.push(entry.headword.clone());
        }
        grouped.entry(entry.headword.clone()).or_default().push(entry);
    }
    for headword in order {
        if let Some(group) = grouped.remove(&headword) {
            dict.insert(&headword, group);
        }
    }
}

/// One-line summary of a lookup result: `reading[pitch]` per entry, entries
/// comma-separated, keys joined by `separator`.
#[must_use]
pub fn format_pronunciations(dict: &AccentDict, separator: &str) -> String {
    let mut out = String::new();
    for (i, (expression, entries)) in dict.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        let _ = write!(out, "{expression}: ");
        for (j, entry) in entries.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}[{}]", entry.katakana_reading, entry.pitch_number);
        }
    }
    out
}
