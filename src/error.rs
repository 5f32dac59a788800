use thiserror::Error;

/// Errors surfaced by the parsing pipeline.
///
/// Malformed transcript content is never an error: stray brackets, unmatched
/// speaker labels and the like degrade gracefully during normalization. The
/// only failure modes are a caller-supplied alias pattern that does not
/// compile, and I/O trouble on the streaming path.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An alias pattern failed to compile.
    #[error("invalid alias pattern {pattern:?} for speaker {canonical:?}")]
    Config {
        /// Canonical speaker name the pattern was registered under
        canonical: String,
        /// The offending pattern source
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The incremental line source failed while being read.
    #[error("failed to read from transcript source")]
    Io(#[from] std::io::Error),
}
