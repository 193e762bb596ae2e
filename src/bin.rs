use clap::Parser;
use crossfill::backtracking_search::{find_fill, SearchConfig};
use crossfill::crossword::Crossword;
use crossfill::heuristics::TieBreak;
use crossfill::render::{render_grid, render_image};
use crossfill::vocabulary::Vocabulary;
use log::{LevelFilter, Log, Metadata, Record};
use std::fmt::{Debug, Formatter};
use std::fs;

/// crossfill: Fill a crossword structure with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the structure file, with _ representing playable cells and # representing blocks
    structure: String,

    /// Path to the word list file, one word per line
    words: String,

    /// Path to write a PPM image of the filled grid
    output: Option<String>,

    /// Break heuristic ties pseudo-randomly using this seed [default: stable order]
    #[arg(long)]
    seed: Option<u64>,

    /// Propagate arc consistency after each choice during search
    #[arg(long)]
    inference: bool,

    /// Log solver progress and statistics to stderr
    #[arg(long)]
    verbose: bool,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), Error> {
    let args = Args::parse();

    if args.verbose {
        log::set_logger(&LOGGER)
            .map_err(|error| Error(format!("Couldn't install logger: {error}")))?;
        log::set_max_level(LevelFilter::Debug);
    }

    let crossword = Crossword::from_file(&args.structure).map_err(|error| Error(error.to_string()))?;
    let vocabulary = Vocabulary::from_file(&args.words).map_err(|error| Error(error.to_string()))?;

    let config = SearchConfig {
        tie_break: args.seed.map_or(TieBreak::Stable, TieBreak::Seeded),
        inference: args.inference,
    };

    let success = match find_fill(&crossword, &vocabulary, config) {
        Ok(success) => success,
        Err(failure) => {
            println!("{failure}");
            return Ok(());
        }
    };

    if args.verbose {
        eprintln!("{:#?}", success.statistics);
    }

    println!("{}", render_grid(&crossword, &vocabulary, &success.assignment));

    if let Some(output) = args.output {
        fs::write(
            &output,
            render_image(&crossword, &vocabulary, &success.assignment),
        )
        .map_err(|_| Error(format!("Couldn't write file '{output}'")))?;
    }

    Ok(())
}
