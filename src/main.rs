use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use sector_scatter::config::{ConfigError, ScatterConfig};
use sector_scatter::{open_files, IOError, ScatterError, ScatterOptions, SectorMap, SectorMapEntry};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_MISSING_FILE: u8 = 2;
const EXIT_OVERSIZED_SECTION: u8 = 3;

/// Place sections of a binary at fixed sectors of an existing raw disk image
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The binary to take sections from
    source: PathBuf,
    /// The disk image to write the sections to (must already exist)
    dest: PathBuf,
    /// A JSON file describing the sector map
    #[arg(short, long, value_name = "FILE", required_unless_present = "sections")]
    map: Option<PathBuf>,
    /// Place a section, e.g. `2:section1:0`. Can be repeated, and overrides `--map` entries on the same sector
    #[arg(short, long = "section", value_name = "SECTOR:NAME:OFFSET[:LENGTH]")]
    sections: Vec<SectorMapEntry>,
    /// The size of a sector in bytes [default: 512]
    #[arg(long)]
    sector_size: Option<u32>,
    /// Allow extending the disk image if a section ends past it
    #[arg(long)]
    grow: bool,
    /// Log what is being done (repeat for more details)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// failures are already reported on stderr, so stay quiet unless asked
fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbosity))
        .parse_default_env()
        .init();
}

fn exit_code<I>(error: &ScatterError<I>) -> u8
where
    I: IOError,
{
    match error {
        ScatterError::MissingFile { .. } => EXIT_MISSING_FILE,
        ScatterError::OversizedSection { .. } => EXIT_OVERSIZED_SECTION,
        _ => EXIT_FAILURE,
    }
}

/// Combine the map file (if any) with the command line, the latter taking precedence
fn load_plan(args: &Args) -> Result<(SectorMap, ScatterOptions), ConfigError> {
    let (mut map, mut options) = match &args.map {
        Some(path) => {
            let config = ScatterConfig::load(path)?;
            (config.sector_map(), config.options())
        }
        None => (SectorMap::new(), ScatterOptions::default()),
    };

    map.extend(args.sections.iter().cloned());
    if let Some(sector_size) = args.sector_size {
        options = options.sector_size(sector_size);
    }
    if args.grow {
        options = options.grow(true);
    }

    Ok((map, options))
}

/// Scatter as `args` describe, printing every placed section to `out`
/// as soon as it's written and a single diagnostic to `err` on failure
fn run<O, E>(args: &Args, out: &mut O, err: &mut E) -> u8
where
    O: Write,
    E: Write,
{
    let (map, options) = match load_plan(args) {
        Ok(plan) => plan,
        Err(e) => {
            let _ = writeln!(err, "error: {}: {}", args.map.as_deref().unwrap_or(&args.dest).display(), e);
            return EXIT_FAILURE;
        }
    };

    let result = open_files(&args.source, &args.dest, options).and_then(|mut scatterer| {
        scatterer.scatter_with(&map, |placement| {
            let _ = writeln!(out, "{}", placement);
        })
    });

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "error: {}", e);
            exit_code(&e)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    ExitCode::from(run(&args, &mut io::stdout(), &mut io::stderr()))
}
