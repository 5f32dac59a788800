use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Synthetic speaker for text preceding any recognized speaker label.
pub const UNKNOWN_SPEAKER: &str = "none";

/// A run of consecutive lines from one speaker, used by the concise
/// order encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRun {
    pub speaker: String,
    pub count: usize,
}

/// Chronological turn sequence, in one of two encodings chosen at parser
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnOrder {
    /// One entry per retained line: the speaker that line was attributed to.
    Plain(Vec<String>),
    /// Run-length form: consecutive lines from the same speaker collapse
    /// into a single entry with an incrementing count.
    Concise(Vec<SpeakerRun>),
}

impl TurnOrder {
    /// Number of lines represented (sum of run counts in concise form).
    pub fn len(&self) -> usize {
        match self {
            TurnOrder::Plain(names) => names.len(),
            TurnOrder::Concise(runs) => runs.iter().map(|r| r.count).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TurnOrder::Plain(names) => names.is_empty(),
            TurnOrder::Concise(runs) => runs.is_empty(),
        }
    }

    fn push(&mut self, speaker: &str) {
        match self {
            TurnOrder::Plain(names) => names.push(speaker.to_string()),
            TurnOrder::Concise(runs) => match runs.last_mut() {
                Some(last) if last.speaker == speaker => last.count += 1,
                _ => runs.push(SpeakerRun {
                    speaker: speaker.to_string(),
                    count: 1,
                }),
            },
        }
    }
}

/// Structured result of normalizing one transcript.
///
/// Built empty at the start of a parse, mutated line-by-line during
/// normalization, and optionally rewritten in place by alias resolution.
/// Every speaker named in `order` is a key of `speaker` and vice versa,
/// and the per-speaker line counts agree with `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Speaker name (including the sentinel `"none"`) to that speaker's
    /// dialogue lines, in transcript order.
    pub speaker: HashMap<String, Vec<String>>,
    /// Turn-taking sequence across the whole transcript.
    pub order: TurnOrder,
}

impl Record {
    /// Empty record with the requested order encoding.
    pub fn new(concise: bool) -> Self {
        Self {
            speaker: HashMap::new(),
            order: if concise {
                TurnOrder::Concise(Vec::new())
            } else {
                TurnOrder::Plain(Vec::new())
            },
        }
    }

    /// Attribute one line of dialogue to `speaker`, creating the key on
    /// first use and extending the turn sequence.
    pub fn push_line(&mut self, speaker: &str, text: String) {
        self.speaker.entry(speaker.to_string()).or_default().push(text);
        self.order.push(speaker);
    }

    /// Total number of retained dialogue lines.
    pub fn line_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speaker.is_empty() && self.order.is_empty()
    }

    /// Turn sequence as `(speaker, consecutive-line count)` runs, regardless
    /// of the underlying encoding.
    pub fn runs(&self) -> Vec<(&str, usize)> {
        match &self.order {
            TurnOrder::Plain(names) => {
                let mut runs: Vec<(&str, usize)> = Vec::new();
                for name in names {
                    match runs.last_mut() {
                        Some((speaker, count)) if *speaker == name.as_str() => *count += 1,
                        _ => runs.push((name.as_str(), 1)),
                    }
                }
                runs
            }
            TurnOrder::Concise(runs) => {
                runs.iter().map(|r| (r.speaker.as_str(), r.count)).collect()
            }
        }
    }

    /// Speaker names in order of first appearance in the turn sequence.
    ///
    /// HashMap iteration order is unspecified, so anything observable (alias
    /// merging, rendering) walks speakers through this instead.
    pub fn speakers_in_order(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (speaker, _) in self.runs() {
            if !seen.iter().any(|s: &String| s == speaker) {
                seen.push(speaker.to_string());
            }
        }
        seen
    }
}
