use srtedit::session::{self, Session};
use srtedit::Track;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{ArgAction, Parser as ClapParser};
use log::{warn, LevelFilter};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(version, about = "Edit SRT subtitles from the terminal")]
struct Cli {
    #[arg(value_name = "FILE", help = "The SRT file to edit.")]
    input: PathBuf,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to save to.",
        default_value = "output.srt"
    )]
    output: PathBuf,
    #[arg(long, help = "Convert the subtitle text from Latin-1 to UTF-8 after loading.")]
    latin1: bool,
    #[arg(
        long,
        value_name = "OFFSET",
        allow_hyphen_values = true,
        value_parser = session::parse_offset,
        help = "Shift all subtitles by OFFSET (e.g. 1500, -2s, 00:00:01,500)."
    )]
    shift: Option<Duration>,
    #[arg(
        short,
        long,
        value_name = "NUM",
        help = "Toggle deletion of the subtitle numbered NUM. May be repeated."
    )]
    delete: Vec<usize>,
    #[arg(
        long,
        help = "Apply the edits given on the command line, save and exit without starting a session."
    )]
    batch: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity.")]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut track = Track::load(&cli.input)
        .with_context(|| format!("Failed to open input file: '{}'", cli.input.display()))?;
    if track.is_empty() {
        warn!("'{}' contains no subtitles", cli.input.display());
    }

    if cli.latin1 && !track.convert_from_latin1() {
        warn!("Input was already read as Latin-1, skipping conversion");
    }
    if let Some(offset) = cli.shift {
        track.shift(offset);
    }
    for num in &cli.delete {
        if track.toggle_delete(*num).is_none() {
            warn!("No subtitle numbered {}", num);
        }
    }

    if cli.batch {
        return track
            .save(&cli.output)
            .with_context(|| format!("Failed to save to '{}'", cli.output.display()));
    }

    let mut session = Session::new(track, cli.output);
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout.lock())
}
