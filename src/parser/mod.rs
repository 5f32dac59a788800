mod line;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::aliases;
use crate::error::ParseError;
use crate::models::{ParserOptions, Record};

use line::{process_line, LineState};

/// Transcript tokenizer/normalizer.
///
/// Converts raw news-broadcast transcript text into a [`Record`] mapping
/// each speaker to their lines, in turn order. Configuration is fixed at
/// construction; a parser can be reused across any number of transcripts
/// and shared between threads.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    options: ParserOptions,
}

impl TranscriptParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// One-shot normalization of a complete transcript.
    ///
    /// Empty input yields an empty record. Malformed transcript structure
    /// never fails: text preceding any speaker label is attributed to the
    /// sentinel unknown speaker.
    pub fn parse(&self, transcript: &str) -> Record {
        self.parse_lines(self.options.patterns.line_boundary.split(transcript))
    }

    /// Normalize a sequence of already-split lines.
    ///
    /// This is the shared driver behind both [`parse`](Self::parse) and
    /// [`parse_stream`](Self::parse_stream).
    pub fn parse_lines<I, S>(&self, lines: I) -> Record
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut record = Record::new(self.options.concise_speakers);
        let mut state = LineState::new();
        for raw in lines {
            process_line(&self.options, &mut state, &mut record, raw.as_ref());
        }
        debug!(
            lines = record.line_count(),
            speakers = record.speaker.len(),
            "normalized transcript"
        );
        record
    }

    /// Incremental normalization over a streamed byte source.
    ///
    /// Lines are processed as they arrive; the accumulated record is
    /// delivered once the source is exhausted. Bytes that are not valid
    /// UTF-8 are coerced lossily rather than rejected. The only failure
    /// mode is an I/O error from the source.
    pub async fn parse_stream<R>(&self, reader: R) -> Result<Record, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut record = Record::new(self.options.concise_speakers);
        let mut state = LineState::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf).await?;
            if n == 0 {
                break;
            }
            let mut raw = String::from_utf8_lossy(&buf).into_owned();
            if raw.ends_with('\n') {
                raw.pop();
                if raw.ends_with('\r') {
                    raw.pop();
                }
            }
            process_line(&self.options, &mut state, &mut record, &raw);
        }

        debug!(
            lines = record.line_count(),
            speakers = record.speaker.len(),
            "normalized streamed transcript"
        );
        Ok(record)
    }

    /// Merge speaker-name variants into their canonical names, in place.
    ///
    /// See [`aliases::resolve`] for the merge contract.
    pub fn resolve_aliases(&self, record: &mut Record) {
        aliases::resolve(&self.options.aliases, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpeakerRun, TurnOrder, UNKNOWN_SPEAKER};

    fn plain_order(record: &Record) -> Vec<&str> {
        match &record.order {
            TurnOrder::Plain(names) => names.iter().map(String::as_str).collect(),
            TurnOrder::Concise(_) => panic!("expected plain order"),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let parser = TranscriptParser::default();
        let record = parser.parse("");

        assert!(record.is_empty());
    }

    #[test]
    fn test_action_stripping_with_defaults() {
        let parser = TranscriptParser::default();
        let record = parser.parse("A: Hello, (PAUSES) my name is Bob.(APPLAUSE)");

        assert_eq!(record.speaker["A"], vec!["Hello, my name is Bob."]);
        assert_eq!(plain_order(&record), vec!["A"]);
    }

    #[test]
    fn test_actions_kept_when_disabled() {
        let parser = TranscriptParser::new(ParserOptions {
            remove_actions: false,
            ..Default::default()
        });
        let record =
            parser.parse("PERSON A: Hello, (PAUSES) (DRINKS WATER) my name is Bob.(APPLAUSE)");

        assert_eq!(
            record.speaker["PERSON A"],
            vec!["Hello, (PAUSES) (DRINKS WATER) my name is Bob.(APPLAUSE)"]
        );
    }

    #[test]
    fn test_unknown_speaker_suppression() {
        let parser = TranscriptParser::new(ParserOptions {
            remove_unknown_speakers: true,
            ..Default::default()
        });
        let record = parser.parse("The quick [brown] fox jumps over the (lazy) dog.");

        assert!(record.speaker.is_empty());
        assert!(record.order.is_empty());
    }

    #[test]
    fn test_unknown_speaker_retained_by_default() {
        let parser = TranscriptParser::default();
        let record = parser.parse("Preamble before anyone speaks.\nCOOPER: Good evening.");

        assert_eq!(
            record.speaker[UNKNOWN_SPEAKER],
            vec!["Preamble before anyone speaks."]
        );
        assert_eq!(plain_order(&record), vec![UNKNOWN_SPEAKER, "COOPER"]);
    }

    #[test]
    fn test_blacklist_drops_speaker_lines() {
        let parser = TranscriptParser::new(ParserOptions {
            blacklist: ["B".to_string()].into_iter().collect(),
            ..Default::default()
        });
        let record = parser.parse("A: Blah blah blah\nB: ignored\nA: Blah blah");

        assert_eq!(record.speaker.len(), 1);
        assert_eq!(record.speaker["A"], vec!["Blah blah blah", "Blah blah"]);
        assert_eq!(plain_order(&record), vec!["A", "A"]);
    }

    #[test]
    fn test_timestamp_only_stripping() {
        let parser = TranscriptParser::new(ParserOptions {
            remove_annotations: false,
            remove_timestamps: true,
            ..Default::default()
        });
        let record = parser.parse("[20:20:34] BERMAN: [2:1:41] The [first] name...");

        assert_eq!(record.speaker["BERMAN"], vec!["The [first] name..."]);
    }

    #[test]
    fn test_continuation_lines_follow_active_speaker() {
        let parser = TranscriptParser::default();
        let record = parser.parse("COOPER: First thought.\nSecond thought.\nBERMAN: Reply.");

        assert_eq!(
            record.speaker["COOPER"],
            vec!["First thought.", "Second thought."]
        );
        assert_eq!(plain_order(&record), vec!["COOPER", "COOPER", "BERMAN"]);
    }

    #[test]
    fn test_blank_and_crlf_lines_dropped() {
        let parser = TranscriptParser::default();
        let record = parser.parse("A: one\r\n\r\n\nA: two\n");

        assert_eq!(record.speaker["A"], vec!["one", "two"]);
        assert_eq!(record.line_count(), 2);
    }

    #[test]
    fn test_concise_order_run_length() {
        let parser = TranscriptParser::new(ParserOptions {
            concise_speakers: true,
            ..Default::default()
        });
        let record = parser.parse("A: 1\nA: 2\nB: 3\nA: 4\nB: 5\nB: 6");

        assert_eq!(
            record.order,
            TurnOrder::Concise(vec![
                SpeakerRun { speaker: "A".into(), count: 2 },
                SpeakerRun { speaker: "B".into(), count: 1 },
                SpeakerRun { speaker: "A".into(), count: 1 },
                SpeakerRun { speaker: "B".into(), count: 2 },
            ])
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = TranscriptParser::default();
        let text = "COOPER: one\ntwo\nBERMAN: three\n(APPLAUSE)\nCOOPER: four";

        assert_eq!(parser.parse(text), parser.parse(text));
    }

    #[test]
    fn test_order_and_speaker_agree() {
        let parser = TranscriptParser::default();
        let record = parser.parse("intro\nA: x\nB: y\nmore from b\nA: z");

        let total: usize = record.speaker.values().map(Vec::len).sum();
        assert_eq!(total, record.line_count());
        for name in plain_order(&record) {
            assert!(record.speaker.contains_key(name));
        }
        for name in record.speaker.keys() {
            assert!(plain_order(&record).contains(&name.as_str()));
        }
    }

    #[tokio::test]
    async fn test_parse_stream_matches_one_shot() {
        let parser = TranscriptParser::default();
        let text = "COOPER: Good evening. (APPLAUSE)\nWe begin [tonight] with...\nBERMAN: Thanks.";

        let streamed = parser.parse_stream(text.as_bytes()).await.unwrap();
        assert_eq!(streamed, parser.parse(text));
    }

    #[tokio::test]
    async fn test_parse_stream_applies_blacklist() {
        let parser = TranscriptParser::new(ParserOptions {
            blacklist: ["B".to_string()].into_iter().collect(),
            ..Default::default()
        });
        let record = parser
            .parse_stream("A: kept\nB: dropped\nA: kept too".as_bytes())
            .await
            .unwrap();

        assert!(!record.speaker.contains_key("B"));
        assert_eq!(record.line_count(), 2);
    }

    #[tokio::test]
    async fn test_parse_stream_coerces_invalid_utf8() {
        let parser = TranscriptParser::default();
        let mut bytes = b"A: before ".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b" after\n");

        let record = parser.parse_stream(bytes.as_slice()).await.unwrap();
        assert_eq!(record.speaker["A"], vec!["before \u{FFFD} after"]);
    }
}
