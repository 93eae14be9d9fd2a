//! Big Ball entry point
//!
//! Loads settings, builds the population and runs the paced loop in the
//! terminal until no regular balls remain or the user presses Q.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use big_ball::display::{JsonDisplay, StateSink, TextDisplay};
use big_ball::runner::{KeyboardStop, NeverStop, RunOptions, StopSignal, run};
use big_ball::sim::SimState;
use big_ball::{OutputFormat, Result, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of regular balls
    #[arg(long)]
    regular: Option<u32>,

    /// Number of monster balls
    #[arg(long)]
    monster: Option<u32>,

    /// Number of repellent balls
    #[arg(long)]
    repellent: Option<u32>,

    /// Canvas width
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    height: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between ticks in milliseconds (0 disables pacing)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Output format: text or json
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// No raw terminal, screen clearing or key polling
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(n) = self.regular {
            settings.num_regular = n;
        }
        if let Some(n) = self.monster {
            settings.num_monster = n;
        }
        if let Some(n) = self.repellent {
            settings.num_repellent = n;
        }
        if let Some(w) = self.width {
            settings.width = w;
        }
        if let Some(h) = self.height {
            settings.height = h;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(ms) = self.delay_ms {
            settings.tick_delay_ms = ms;
        }
        if self.max_ticks.is_some() {
            settings.max_ticks = self.max_ticks;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
    }
}

fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("unknown format '{s}' (expected text or json)"))
}

/// Keeps the terminal in raw mode for its lifetime
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            log::error!("failed to disable raw mode: {err}");
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn run_app(args: Args) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    args.apply(&mut settings);
    settings.validate()?;

    let seed = settings.seed.unwrap_or_else(clock_seed);
    let mut state = SimState::new(&settings.world(), seed);
    let options = RunOptions {
        tick_delay: settings.tick_delay(),
        max_ticks: settings.max_ticks,
    };

    let interactive =
        !args.headless && settings.format == OutputFormat::Text && io::stdout().is_terminal();

    if interactive {
        println!("Press 'Q' to stop the simulation.");
    }
    let raw_guard = if interactive {
        Some(RawModeGuard::enter()?)
    } else {
        None
    };

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn StateSink> = match (settings.format, interactive) {
        (OutputFormat::Json, _) => Box::new(JsonDisplay::new(stdout)),
        (OutputFormat::Text, true) => Box::new(TextDisplay::interactive(stdout)),
        (OutputFormat::Text, false) => Box::new(TextDisplay::plain(stdout)),
    };
    let mut stop: Box<dyn StopSignal> = if interactive {
        Box::new(KeyboardStop)
    } else {
        Box::new(NeverStop)
    };

    let summary = run(&mut state, sink.as_mut(), stop.as_mut(), &options)?;
    drop(sink);
    drop(raw_guard);

    eprintln!(
        "Finished after {} ticks ({:?}), seed {}",
        summary.ticks, summary.phase, seed
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Big Ball starting...");

    let args = Args::parse();
    match run_app(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
