use core::fmt;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, BoardVec};
use crate::Field;

pub type GameBoard = Board<Field>;

/// A finished mine layout: where the mines are and how many surround every safe tile.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameSetup {
  board: GameBoard,
  mines: u32,
}

impl GameSetup {
  /// Builds a layout from a fixed set of mine positions.
  pub fn new(mines: &Board<bool>) -> Self {
    let mut setup = Self::empty(mines.width, mines.height);
    for (pos, &is_mine) in mines.enumerate() {
      if is_mine {
        setup.place_mine(pos);
      }
    }

    setup
  }

  fn empty(width: u32, height: u32) -> Self {
    GameSetup {
      board: GameBoard::new(width, height, Field::Empty(0)),
      mines: 0,
    }
  }

  /// Places `mines` mines uniformly at random, keeping `opened` and its neighbours free.
  ///
  /// Positions are drawn until one is found that is neither protected nor already a mine.
  /// A game is at least 4x4 and at most half covered, so the 9 protected tiles leave room for
  /// every mine except on a 4x4 board with 8 mines opened away from the border. There one
  /// neighbour, picked at random, loses its protection so that exactly `cells - mines` tiles stay
  /// protected. `opened` itself is never given up. With at least `mines` unprotected tiles the
  /// loop terminates, and each draw hits a free tile with probability at least
  /// `(cells - protected - placed) / cells`, so the expected number of draws stays a small
  /// multiple of `mines`.
  pub(crate) fn generate<R: Rng>(width: u32, height: u32, mines: u32, opened: BoardVec, rng: &mut R) -> Self {
    let mut setup = Self::empty(width, height);
    let cells = setup.board.len();
    assert!(cells > mines as usize, "{} mines do not fit on {} tiles", mines, cells);
    let (width, height) = (
      i32::try_from(width).expect("board width fits in i32"),
      i32::try_from(height).expect("board height fits in i32"),
    );

    let mut neighbours: Vec<_> = setup.board.neighbours(opened).collect();
    let spare = cells - mines as usize - 1;
    if neighbours.len() > spare {
      warn!(
        "Cannot keep all {} tiles around {:?} free of {} mines on a {}x{} board, exposing {} of them",
        neighbours.len(),
        opened,
        mines,
        width,
        height,
        neighbours.len() - spare
      );
      neighbours.shuffle(rng);
      neighbours.truncate(spare);
    }
    let mut protected = Board::new(setup.width(), setup.height(), false);
    protected[opened] = true;
    for pos in neighbours {
      protected[pos] = true;
    }

    let mut draws = 0u64;
    while setup.mines < mines {
      draws += 1;
      let pos = BoardVec::new(rng.gen_range(0..width), rng.gen_range(0..height));
      if protected[pos] || setup.board[pos].is_mine() {
        continue;
      }
      setup.place_mine(pos);
    }

    debug!(
      "Placed {} mines on a {}x{} board around {:?} in {} draws",
      mines, width, height, opened, draws
    );
    setup
  }

  fn place_mine(&mut self, pos: BoardVec) {
    debug_assert!(!self.board[pos].is_mine());
    self.board[pos] = Field::Mine;
    self.mines += 1;
    for neighbour_pos in self.board.neighbours(pos) {
      self.board[neighbour_pos].notify_mine();
    }
  }

  pub fn board(&self) -> &GameBoard {
    &self.board
  }

  pub fn mines(&self) -> u32 {
    self.mines
  }

  pub fn width(&self) -> u32 {
    self.board.width
  }

  pub fn height(&self) -> u32 {
    self.board.height
  }
}

impl fmt::Debug for GameSetup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for y in 0..self.height() {
      for x in 0..self.width() {
        let pos = BoardVec::new(x as i32, y as i32);
        write!(f, "{}", self.board[pos])?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn counted(setup: &GameSetup, pos: BoardVec) -> u8 {
    setup.board.neighbours(pos).filter(|&p| setup.board[p].is_mine()).count() as u8
  }

  #[test]
  fn counts_follow_mines() {
    let mut mines = Board::new(4, 4, false);
    mines[BoardVec::new(0, 0)] = true;
    mines[BoardVec::new(2, 1)] = true;
    let setup = GameSetup::new(&mines);

    assert_eq!(setup.mines(), 2);
    assert_eq!(setup.board()[BoardVec::new(1, 0)], Field::Empty(2));
    assert_eq!(setup.board()[BoardVec::new(1, 1)], Field::Empty(2));
    assert_eq!(setup.board()[BoardVec::new(3, 2)], Field::Empty(1));
    assert_eq!(setup.board()[BoardVec::new(0, 3)], Field::Empty(0));
    assert_eq!(format!("{:?}", setup), "Q211\n12Q1\n0111\n0000\n");
  }

  #[test]
  fn generation_places_exact_count_outside_protected_zone() {
    for seed in 0..50 {
      let mut rng = StdRng::seed_from_u64(seed);
      let opened = BoardVec::new(4, 3);
      let setup = GameSetup::generate(9, 7, 30, opened, &mut rng);

      assert_eq!(setup.mines(), 30);
      assert_eq!(setup.board().iter().filter(|f| f.is_mine()).count(), 30);
      for (pos, &field) in setup.board().enumerate() {
        match field {
          Field::Mine => assert!(pos.distance(opened) > 1, "seed {}: mine at {:?}", seed, pos),
          Field::Empty(n) => assert_eq!(n, counted(&setup, pos)),
        }
      }
    }
  }

  #[test]
  fn generation_is_reproducible() {
    let a = GameSetup::generate(10, 10, 20, BoardVec::new(0, 0), &mut StdRng::seed_from_u64(42));
    let b = GameSetup::generate(10, 10, 20, BoardVec::new(0, 0), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
  }

  #[test]
  fn crowded_board_exposes_a_single_neighbour() {
    let mut exposed = Vec::new();
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let opened = BoardVec::new(1, 2);
      let setup = GameSetup::generate(4, 4, 8, opened, &mut rng);
      assert_eq!(setup.mines(), 8);
      assert!(!setup.board()[opened].is_mine());

      let mined: Vec<_> = setup.board().neighbours(opened).filter(|&p| setup.board()[p].is_mine()).collect();
      assert!(mined.len() <= 1, "seed {}: mines at {:?}", seed, mined);
      exposed.extend(mined);
    }
    exposed.sort();
    exposed.dedup();
    assert!(exposed.len() > 1, "the exposed neighbour is always {:?}", exposed);
  }

  #[test]
  fn border_opening_on_crowded_board_keeps_full_protection() {
    for seed in 0..50 {
      let opened = BoardVec::new(0, 1);
      let setup = GameSetup::generate(4, 4, 8, opened, &mut StdRng::seed_from_u64(seed));
      for pos in setup.board().with_neighbours(opened) {
        assert!(!setup.board()[pos].is_mine(), "seed {}: mine at {:?}", seed, pos);
      }
    }
  }
}
