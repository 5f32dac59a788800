use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use colloquy::{
    io::{read_transcript, read_transcript_stdin, write_human, write_json},
    AliasMap, ParserOptions, Record, TranscriptParser,
};

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(author, version, about = "Speech-transcript normalizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a transcript into a speaker-indexed record
    Parse {
        /// Input transcript file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the JSON record (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable rendering
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Parse the input incrementally, line by line, instead of
        /// reading it whole
        #[arg(long)]
        stream: bool,

        #[command(flatten)]
        options: ParseFlags,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print per-speaker statistics for a transcript
    Stats {
        /// Input transcript file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        options: ParseFlags,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct ParseFlags {
    /// Keep stage directions like "(APPLAUSE)"
    #[arg(long)]
    keep_actions: bool,

    /// Keep bracketed annotations like "[inaudible]"
    #[arg(long)]
    keep_annotations: bool,

    /// Keep timestamps like "[20:20:34]" (only meaningful with
    /// --keep-annotations)
    #[arg(long)]
    keep_timestamps: bool,

    /// Drop lines preceding any recognized speaker label
    #[arg(long)]
    remove_unknown: bool,

    /// Run-length encode the turn order
    #[arg(long)]
    concise: bool,

    /// Speaker whose lines are dropped (repeatable)
    #[arg(long = "blacklist", value_name = "SPEAKER")]
    blacklist: Vec<String>,

    /// Alias rule CANONICAL=PATTERN (repeatable)
    #[arg(long = "alias", value_name = "CANONICAL=PATTERN")]
    aliases: Vec<String>,
}

impl ParseFlags {
    fn into_options(self) -> Result<ParserOptions> {
        let mut aliases = AliasMap::new();
        for rule in &self.aliases {
            let (canonical, pattern) = rule
                .split_once('=')
                .with_context(|| format!("Invalid alias rule (expected CANONICAL=PATTERN): {}", rule))?;
            aliases
                .insert(canonical, [pattern])
                .with_context(|| format!("Invalid alias rule: {}", rule))?;
        }
        Ok(ParserOptions {
            remove_actions: !self.keep_actions,
            remove_annotations: !self.keep_annotations,
            remove_timestamps: !self.keep_timestamps,
            remove_unknown_speakers: self.remove_unknown,
            concise_speakers: self.concise,
            blacklist: self.blacklist.into_iter().collect::<HashSet<_>>(),
            aliases,
            ..Default::default()
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            human_readable,
            stream,
            options,
            verbose,
        } => {
            setup_logging(verbose);
            parse_transcript(input, output, human_readable, stream, options).await
        }
        Commands::Stats {
            input,
            options,
            verbose,
        } => {
            setup_logging(verbose);
            stats_transcript(input, options).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn parse_transcript(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    stream: bool,
    options: ParseFlags,
) -> Result<()> {
    let parser = TranscriptParser::new(options.into_options()?);
    let mut record = load_record(&parser, input.as_deref(), stream).await?;
    parser.resolve_aliases(&mut record);

    info!(
        "Parsed {} lines across {} speakers",
        record.line_count(),
        record.speaker.len()
    );

    match &output {
        Some(path) => {
            write_json(&record, path)?;
            info!("Output written to {:?}", path);
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &record)
                .context("Failed to write JSON to stdout")?;
            println!();
        }
    }

    if let Some(path) = &human_readable {
        write_human(&record, path)?;
        info!("Human-readable output written to {:?}", path);
    }

    Ok(())
}

async fn stats_transcript(input: Option<PathBuf>, options: ParseFlags) -> Result<()> {
    let parser = TranscriptParser::new(options.into_options()?);
    let mut record = load_record(&parser, input.as_deref(), false).await?;
    parser.resolve_aliases(&mut record);

    let runs = record.runs();

    println!("Transcript Statistics");
    println!("=====================");
    println!("Total lines: {}", record.line_count());
    println!("Total turns: {}", runs.len());
    println!("Speakers: {}", record.speaker.len());
    println!();

    for speaker in record.speakers_in_order() {
        let lines = record.speaker.get(&speaker).map_or(0, Vec::len);
        let turns = runs.iter().filter(|(name, _)| *name == speaker).count();
        println!("{}: {} lines, {} turns", speaker, lines, turns);
    }

    Ok(())
}

async fn load_record(
    parser: &TranscriptParser,
    input: Option<&std::path::Path>,
    stream: bool,
) -> Result<Record> {
    if stream {
        match input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open file: {:?}", path))?;
                info!("Streaming transcript from {:?}", path);
                Ok(parser.parse_stream(file).await?)
            }
            None => {
                info!("Streaming transcript from stdin");
                Ok(parser.parse_stream(tokio::io::stdin()).await?)
            }
        }
    } else {
        let text = match input {
            Some(path) => {
                info!("Loading transcript from {:?}", path);
                read_transcript(path)?
            }
            None => read_transcript_stdin()?,
        };
        Ok(parser.parse(&text))
    }
}
