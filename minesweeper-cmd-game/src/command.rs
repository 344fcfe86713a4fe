use std::num::ParseIntError;
use std::str::FromStr;

use minesweeper_core::board::BoardVec;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r X Y, reveal X Y   open the tile in column X, row Y
  f X Y, flag X Y     place or remove a flag
  show                print the board
  full                print the whole mine map
  help                print this text
  quit                leave the game";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
  Reveal(BoardVec),
  Flag(BoardVec),
  Show,
  Full,
  Help,
  Quit,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CommandError {
  #[error("empty command, try `help`")]
  Empty,
  #[error("unknown command `{0}`, try `help`")]
  Unknown(String),
  #[error("`{0}` needs a column and a row")]
  MissingCoordinates(String),
  #[error("cannot read `{1}` as a coordinate: {0}")]
  ParseNum(ParseIntError, String),
  #[error("unexpected `{0}` after the command")]
  Trailing(String),
}

fn parse_coordinate(src: &str) -> Result<i32, CommandError> {
  src.parse::<i32>().map_err(|e| CommandError::ParseNum(e, src.to_owned()))
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(CommandError::Empty)?.to_lowercase();

    let command = match name.as_str() {
      "r" | "reveal" | "f" | "flag" => {
        let (x, y) = match (words.next(), words.next()) {
          (Some(x), Some(y)) => (parse_coordinate(x)?, parse_coordinate(y)?),
          _ => return Err(CommandError::MissingCoordinates(name)),
        };
        if name.starts_with('r') {
          Command::Reveal(BoardVec::new(x, y))
        } else {
          Command::Flag(BoardVec::new(x, y))
        }
      }
      "show" => Command::Show,
      "full" => Command::Full,
      "help" | "?" => Command::Help,
      "quit" | "q" | "exit" => Command::Quit,
      _ => return Err(CommandError::Unknown(name)),
    };

    match words.next() {
      Some(extra) => Err(CommandError::Trailing(extra.to_owned())),
      None => Ok(command),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_tile_commands() {
    assert_eq!("r 3 4".parse::<Command>(), Ok(Command::Reveal(BoardVec::new(3, 4))));
    assert_eq!("  Reveal 0 9 ".parse::<Command>(), Ok(Command::Reveal(BoardVec::new(0, 9))));
    assert_eq!("f -1 2".parse::<Command>(), Ok(Command::Flag(BoardVec::new(-1, 2))));
    assert_eq!("FLAG 7 7".parse::<Command>(), Ok(Command::Flag(BoardVec::new(7, 7))));
  }

  #[test]
  fn parses_plain_commands() {
    assert_eq!("show".parse::<Command>(), Ok(Command::Show));
    assert_eq!("full".parse::<Command>(), Ok(Command::Full));
    assert_eq!("?".parse::<Command>(), Ok(Command::Help));
    assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
  }

  #[test]
  fn rejects_bad_input() {
    assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
    assert_eq!("dig 1 1".parse::<Command>(), Err(CommandError::Unknown("dig".to_owned())));
    assert_eq!("r 1".parse::<Command>(), Err(CommandError::MissingCoordinates("r".to_owned())));
    assert_eq!("show me".parse::<Command>(), Err(CommandError::Trailing("me".to_owned())));
    assert!(matches!(
      "f one 2".parse::<Command>(),
      Err(CommandError::ParseNum(_, src)) if src == "one"
    ));
  }
}
