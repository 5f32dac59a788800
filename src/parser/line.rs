use crate::models::{ParserOptions, Record, UNKNOWN_SPEAKER};
use crate::patterns::remove_all;

/// Current-speaker state carried across lines.
///
/// A two-state machine: either a recognized speaker is active, or the
/// sentinel unknown speaker is. A speaker-label match is the only
/// transition. Held in an explicit struct so the one-shot and streaming
/// drivers share it without closing over mutable locals.
#[derive(Debug, Clone)]
pub(crate) struct LineState {
    /// Active speaker; lines without a label continue this speaker.
    pub(crate) speaker: String,
    /// Whether the active speaker is blacklisted.
    pub(crate) ignore: bool,
}

impl LineState {
    pub(crate) fn new() -> Self {
        Self {
            speaker: UNKNOWN_SPEAKER.to_string(),
            ignore: false,
        }
    }
}

/// Apply the configured content stripping to one line.
///
/// Returns `None` when the line is blank, either originally or after
/// stripping; blank lines are never attributed to a speaker.
pub(crate) fn filter_line(options: &ParserOptions, line: &str) -> Option<String> {
    if line.is_empty() {
        return None;
    }
    let patterns = &options.patterns;
    let mut line = if options.remove_actions {
        remove_all(line, &patterns.action)
    } else {
        line.to_string()
    };
    if options.remove_annotations {
        line = remove_all(&line, &patterns.annotation);
    } else if options.remove_timestamps {
        line = remove_all(&line, &patterns.timestamp);
    }
    if line.is_empty() { None } else { Some(line) }
}

/// Process one raw line: strip, attribute, and append to the record.
///
/// Shared by the one-shot and streaming drivers so the two paths cannot
/// drift apart.
pub(crate) fn process_line(
    options: &ParserOptions,
    state: &mut LineState,
    record: &mut Record,
    raw: &str,
) {
    let Some(line) = filter_line(options, raw) else {
        return;
    };

    let mut text = line.as_str();
    if let Some(caps) = options.patterns.speaker.captures(text) {
        let name = caps.get(1).map_or("", |m| m.as_str()).trim();
        // An empty trimmed capture is not a speaker label; the line is a
        // continuation of whoever is active.
        if !name.is_empty() {
            state.speaker = name.to_string();
            state.ignore = options.blacklist.contains(name);
            text = &text[caps.get(0).map_or(0, |m| m.end())..];
        }
    }

    if state.ignore || (state.speaker == UNKNOWN_SPEAKER && options.remove_unknown_speakers) {
        return;
    }
    record.push_line(&state.speaker, text.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_line_blank_after_stripping() {
        let options = ParserOptions::default();
        assert_eq!(filter_line(&options, ""), None);
        assert_eq!(filter_line(&options, "(APPLAUSE)"), None);
        assert_eq!(filter_line(&options, "[inaudible]"), None);
    }

    #[test]
    fn test_filter_line_annotations_win_over_timestamps() {
        let options = ParserOptions::default();
        // Both flags default true; annotations take precedence and remove
        // non-timestamp brackets too.
        assert_eq!(
            filter_line(&options, "so [crosstalk] anyway [1:2:3] yes"),
            Some("so anyway yes".to_string())
        );
    }

    #[test]
    fn test_filter_line_timestamps_only() {
        let options = ParserOptions {
            remove_annotations: false,
            ..Default::default()
        };
        // The timestamp pattern consumes surrounding spaces on both sides.
        assert_eq!(
            filter_line(&options, "so [crosstalk] anyway [1:2:3] yes"),
            Some("so [crosstalk] anywayyes".to_string())
        );
    }

    #[test]
    fn test_empty_label_capture_is_continuation() {
        let options = ParserOptions::default();
        let mut state = LineState::new();
        let mut record = Record::new(false);
        process_line(&options, &mut state, &mut record, " : orphaned text");

        assert_eq!(state.speaker, UNKNOWN_SPEAKER);
        assert_eq!(record.speaker[UNKNOWN_SPEAKER], vec![" : orphaned text"]);
    }

    #[test]
    fn test_blacklist_persists_until_next_label() {
        let options = ParserOptions {
            blacklist: ["HECKLER".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let mut state = LineState::new();
        let mut record = Record::new(false);
        for raw in [
            "HECKLER: boo",
            "more booing",
            "COOPER: moving on",
        ] {
            process_line(&options, &mut state, &mut record, raw);
        }

        assert!(!record.speaker.contains_key("HECKLER"));
        assert_eq!(record.speaker["COOPER"], vec!["moving on"]);
        assert_eq!(record.line_count(), 1);
    }
}
