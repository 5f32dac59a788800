pub mod aliases;
pub mod error;
pub mod io;
pub mod models;
pub mod parser;
pub mod patterns;

pub use error::ParseError;
pub use models::{AliasMap, ParserOptions, Record, SpeakerRun, TurnOrder, UNKNOWN_SPEAKER};
pub use parser::TranscriptParser;
pub use patterns::PatternSet;
