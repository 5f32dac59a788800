use regex::Regex;

/// The five text-matching patterns driving normalization.
///
/// Transcripts are assumed to follow the Latin-alphabet, all-caps
/// speaker-label convention used by news-broadcast rushes:
///
/// ```text
/// [20:20:34] BERMAN: The story so far... (APPLAUSE) [inaudible]
/// ```
#[derive(Debug, Clone)]
pub struct PatternSet {
    /// Line boundary. Empty segments produced by the split are dropped,
    /// which collapses consecutive blank lines.
    pub line_boundary: Regex,
    /// Stage direction: a parenthesized all-caps phrase, e.g. `(APPLAUSE) `.
    pub action: Regex,
    /// Speaker label anchored at line start: optional leading timestamp,
    /// the all-caps name (captured, group 1), an optional bracketed aside,
    /// then a colon.
    pub speaker: Regex,
    /// A bracketed `H:MM:SS`-shaped span, e.g. ` [2:1:41] `.
    pub timestamp: Regex,
    /// Any bracketed span, non-greedy. Timestamps are a special case.
    pub annotation: Regex,
}

impl Default for PatternSet {
    fn default() -> Self {
        // Known-good literals; compilation cannot fail.
        Self {
            line_boundary: Regex::new(r"\r?\n").expect("invalid line boundary pattern"),
            action: Regex::new(r"\([A-Z ]+\) ?").expect("invalid action pattern"),
            speaker: Regex::new(
                r"^(?:\[\d{1,2}:\d{1,2}:\d{1,2}\] ?)?([A-Z\d /,.\-()]+?)(?: ?\[[A-Za-z ]+\])? ?: ?",
            )
            .expect("invalid speaker pattern"),
            timestamp: Regex::new(r" ?\[\d{1,2}:\d{1,2}:\d{1,2}\] ?")
                .expect("invalid timestamp pattern"),
            annotation: Regex::new(r"\[.+?\] ?").expect("invalid annotation pattern"),
        }
    }
}

/// Delete every match of `pattern` from `text`.
pub(crate) fn remove_all(text: &str, pattern: &Regex) -> String {
    pattern.replace_all(text, "").into_owned()
}
