pub mod input;
pub mod output;

pub use input::{read_transcript, read_transcript_stdin};
pub use output::{format_human, write_human, write_json};
