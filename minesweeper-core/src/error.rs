use thiserror::Error;

use crate::board::BoardVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum GameError {
  #[error("tile {pos:?} is outside of the {width}x{height} board")]
  OutOfBounds { pos: BoardVec, width: u32, height: u32 },
}
