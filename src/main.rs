//! Command-line runner for a Greasy Card game.
//!
//! Plays one game with the given seed, writes the audit log to a file and
//! optionally prints the JSON summary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Error};
use log::info;
use pico_args::Arguments;

use greasy_card::{AuditLog, GameConfig, GameError, RoundCoordinator};

const HELP: &str = "\
Play a game of Greasy Card

USAGE:
  greasy-card [OPTIONS] <SEED> <NUM_PLAYERS> <CHIPS_PER_BAG>

ARGS:
  <SEED>           Seed for every random choice in the game
  <NUM_PLAYERS>    Number of players, one thread each
  <CHIPS_PER_BAG>  Chips in a freshly opened bag

OPTIONS:
  --log     PATH   Audit log file             [default: game_log.txt]
  --rounds  N      Number of rounds to play   [default: NUM_PLAYERS]

FLAGS:
  --summary        Print the game summary as JSON
  -h, --help       Print help information

ENVIRONMENT:
  RUST_LOG         Diagnostic log filter      [default: warn]
";

struct Args {
    seed: u64,
    players: usize,
    chips_per_bag: u32,
    log_path: PathBuf,
    rounds: Option<u32>,
    summary: bool,
}

impl Args {
    fn parse(mut pargs: Arguments) -> Result<Self, Error> {
        let log_path = pargs
            .opt_value_from_str("--log")?
            .unwrap_or_else(|| PathBuf::from("game_log.txt"));
        let rounds = pargs.opt_value_from_str("--rounds")?;
        let summary = pargs.contains("--summary");

        let args = Self {
            seed: pargs.free_from_str().context("missing or invalid <SEED>")?,
            players: pargs.free_from_str().context("missing or invalid <NUM_PLAYERS>")?,
            chips_per_bag: pargs.free_from_str().context("missing or invalid <CHIPS_PER_BAG>")?,
            log_path,
            rounds,
            summary,
        };

        let rest = pargs.finish();
        if !rest.is_empty() {
            anyhow::bail!("unexpected arguments: {rest:?}");
        }
        Ok(args)
    }

    fn config(&self) -> GameConfig {
        let config = GameConfig::new(self.seed, self.players, self.chips_per_bag);
        match self.rounds {
            Some(rounds) => config.with_total_rounds(rounds),
            None => config,
        }
    }
}

fn usage_error(err: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("error: {err}\n");
    eprint!("{HELP}");
    ExitCode::from(1)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let args = match Args::parse(pargs) {
        Ok(args) => args,
        Err(err) => return usage_error(&format!("{err:#}")),
    };

    let config = args.config();
    if let Err(err) = config.validate() {
        return usage_error(&err);
    }

    match play(&args, config) {
        Ok(()) => {
            println!("Game has ended. Thank you for playing!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            match err.downcast_ref::<GameError>() {
                Some(game_err) if game_err.is_conservation_violation() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn play(args: &Args, config: GameConfig) -> Result<(), Error> {
    let log = AuditLog::create(&args.log_path)
        .with_context(|| format!("failed to create {}", args.log_path.display()))?;
    info!(
        "seed {}, {} players, {} chips per bag, logging to {}",
        config.seed,
        config.player_count,
        config.chips_per_bag,
        args.log_path.display()
    );

    let mut game = RoundCoordinator::new(config, log)?;
    let summary = game.run()?;

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
