use std::collections::HashSet;

use regex::Regex;

use crate::error::ParseError;
use crate::patterns::PatternSet;

/// Per-parser configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Strip stage-direction spans like `(APPLAUSE)`.
    pub remove_actions: bool,
    /// Strip all bracketed spans like `[inaudible]`. Takes precedence over
    /// `remove_timestamps`.
    pub remove_annotations: bool,
    /// Strip only timestamp-shaped bracketed spans like `[20:20:34]`.
    /// Applied only when `remove_annotations` is false.
    pub remove_timestamps: bool,
    /// Discard lines attributed to the sentinel unknown speaker.
    pub remove_unknown_speakers: bool,
    /// Encode the turn sequence in run-length form.
    pub concise_speakers: bool,
    /// Speakers whose lines are dropped entirely.
    pub blacklist: HashSet<String>,
    /// Canonical-name merge rules, applied only by alias resolution.
    pub aliases: AliasMap,
    /// The extraction/removal patterns themselves.
    pub patterns: PatternSet,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            remove_actions: true,
            remove_annotations: true,
            remove_timestamps: true,
            remove_unknown_speakers: false,
            concise_speakers: false,
            blacklist: HashSet::new(),
            aliases: AliasMap::new(),
            patterns: PatternSet::default(),
        }
    }
}

/// Ordered mapping from canonical speaker name to the patterns that fold
/// surface name variants into it.
///
/// Insertion order is significant: both merging and order rewriting test
/// canonical names, and each name's patterns, in the order they were
/// registered, and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: Vec<AliasEntry>,
}

#[derive(Debug, Clone)]
pub(crate) struct AliasEntry {
    pub(crate) canonical: String,
    pub(crate) patterns: Vec<Regex>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register patterns for a canonical name, compiling them immediately.
    ///
    /// Repeated calls for the same canonical name append to its pattern
    /// list. A pattern that fails to compile surfaces
    /// [`ParseError::Config`] and leaves the map unchanged.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        canonical: impl Into<String>,
        patterns: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, ParseError> {
        let canonical = canonical.into();
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| ParseError::Config {
                canonical: canonical.clone(),
                pattern: pattern.to_string(),
                source,
            })?;
            compiled.push(regex);
        }
        match self.entries.iter_mut().find(|e| e.canonical == canonical) {
            Some(entry) => entry.patterns.extend(compiled),
            None => self.entries.push(AliasEntry {
                canonical,
                patterns: compiled,
            }),
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First canonical name with a pattern matching `surface`, if any.
    pub fn resolve(&self, surface: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| {
            entry
                .patterns
                .iter()
                .any(|p| p.is_match(surface))
                .then_some(entry.canonical.as_str())
        })
    }

    /// First canonical name matching `surface` other than `surface` itself.
    ///
    /// Used by merging, where a surface name matching its own canonical
    /// entry must not stop the scan: a later canonical name can still
    /// absorb the speaker.
    pub fn resolve_other(&self, surface: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.canonical != surface)
            .find_map(|entry| {
                entry
                    .patterns
                    .iter()
                    .any(|p| p.is_match(surface))
                    .then_some(entry.canonical.as_str())
            })
    }
}
