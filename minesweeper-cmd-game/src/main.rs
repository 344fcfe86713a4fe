use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use log::{info, LevelFilter};
use minesweeper_core::{Game, GameStatus, RevealOutcome, Visibility};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use crate::command::{Command, HELP};

mod command;

#[derive(Debug, StructOpt)]
#[structopt(name = "minesweeper", about = "Play minesweeper in the terminal.")]
struct Opt {
  /// Number of columns, at least 4.
  #[structopt(short, long, default_value = "10")]
  width: u32,

  /// Number of rows, at least 4.
  #[structopt(short = "H", long, default_value = "10")]
  height: u32,

  /// Number of mines, at most half of the tiles.
  #[structopt(short = "n", long, default_value = "10")]
  mines: u32,

  /// Seed for the mine layout. A random layout is used when omitted.
  #[structopt(long)]
  seed: Option<u64>,

  /// Log level, overridden by RUST_LOG.
  #[structopt(long, default_value = "warn")]
  log_level: LevelFilter,
}

fn main() -> Result<()> {
  let opt = Opt::from_args();
  SimpleLogger::new()
    .with_level(opt.log_level)
    .env()
    .init()
    .context("failed to install logger")?;

  let game = match opt.seed {
    Some(seed) => Game::with_rng(opt.width, opt.height, opt.mines, StdRng::seed_from_u64(seed)),
    None => Game::new(opt.width, opt.height, opt.mines),
  };
  info!(
    "Starting a {}x{} game with {} mines",
    game.width(),
    game.height(),
    game.mines()
  );

  let stdin = io::stdin();
  let stdout = io::stdout();
  let status = play(game, stdin.lock(), stdout.lock())?;
  info!("Game ended: {:?}", status);
  Ok(())
}

/// Runs commands from `input` until the game ends or the player quits.
fn play<R: BufRead, W: Write>(mut game: Game, input: R, mut output: W) -> Result<GameStatus> {
  writeln!(output, "{}\n{}", game, HELP)?;

  for line in input.lines() {
    let line = line.context("failed to read command")?;
    let command = match line.parse::<Command>() {
      Ok(command) => command,
      Err(e) => {
        writeln!(output, "{}", e)?;
        continue;
      }
    };

    match command {
      Command::Reveal(pos) => {
        // Flags guard their tile against accidental reveals.
        if game.visibility(pos) == Ok(Visibility::Flagged) {
          writeln!(output, "{:?} is flagged, remove the flag first", pos)?;
          continue;
        }
        match game.reveal(pos) {
          Ok(RevealOutcome::Detonated) => writeln!(output, "Boom! {:?} was a mine.", pos)?,
          Ok(RevealOutcome::Revealed(tiles)) => writeln!(output, "{}\nOpened {} tiles.", game, tiles.len())?,
          Err(e) => writeln!(output, "{}", e)?,
        }
      }
      Command::Flag(pos) => match game.flag(pos) {
        Ok(true) => writeln!(output, "{}", game)?,
        Ok(false) => writeln!(output, "Cannot flag {:?} right now.", pos)?,
        Err(e) => writeln!(output, "{}", e)?,
      },
      Command::Show => writeln!(output, "{}", game)?,
      Command::Full => writeln!(output, "{}", game.show_full())?,
      Command::Help => writeln!(output, "{}", HELP)?,
      Command::Quit => break,
    }

    match game.status() {
      GameStatus::Playing => (),
      GameStatus::Lost => {
        writeln!(output, "You lost.\n{}", game.show_full())?;
        return Ok(GameStatus::Lost);
      }
      GameStatus::Won => {
        writeln!(output, "You won!\n{}", game.show_full())?;
        return Ok(GameStatus::Won);
      }
    }
  }

  Ok(game.status())
}
