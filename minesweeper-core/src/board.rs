use core::fmt;
use std::ops::{Add, Index, IndexMut};

pub static NORTH: BoardVec = BoardVec::new(0, -1);
pub static NORTH_EAST: BoardVec = BoardVec::new(1, -1);
pub static EAST: BoardVec = BoardVec::new(1, 0);
pub static SOUTH_EAST: BoardVec = BoardVec::new(1, 1);
pub static SOUTH: BoardVec = BoardVec::new(0, 1);
pub static SOUTH_WEST: BoardVec = BoardVec::new(-1, 1);
pub static WEST: BoardVec = BoardVec::new(-1, 0);
pub static NORTH_WEST: BoardVec = BoardVec::new(-1, -1);
pub static CENTER: BoardVec = BoardVec::new(0, 0);

/// The Moore neighbourhood offsets.
pub static DIRECTIONS: [BoardVec; 8] = [NORTH_WEST, NORTH, NORTH_EAST, WEST, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST];
pub static CENTER_AND_DIRECTIONS: [BoardVec; 9] = [
  NORTH_WEST, NORTH, NORTH_EAST, WEST, CENTER, EAST, SOUTH_WEST, SOUTH, SOUTH_EAST,
];

/// A tile coordinate. Signed so that stepping off the edge of a board is representable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardVec {
  pub x: i32,
  pub y: i32,
}

impl BoardVec {
  pub const fn new(x: i32, y: i32) -> BoardVec {
    BoardVec { x, y }
  }

  /// Chebyshev distance, i.e. the number of king moves between two tiles.
  pub fn distance(self, other: BoardVec) -> u32 {
    self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
  }
}

impl fmt::Debug for BoardVec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

impl Add<BoardVec> for BoardVec {
  type Output = BoardVec;

  fn add(self, rhs: BoardVec) -> Self::Output {
    BoardVec::new(self.x + rhs.x, self.y + rhs.y)
  }
}

impl From<(i32, i32)> for BoardVec {
  fn from((x, y): (i32, i32)) -> Self {
    BoardVec::new(x, y)
  }
}

fn in_bounds(pos: BoardVec, width: u32, height: u32) -> bool {
  match (u32::try_from(pos.x), u32::try_from(pos.y)) {
    (Ok(x), Ok(y)) => x < width && y < height,
    _ => false,
  }
}

/// A fixed size grid of tiles, stored row by row.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board<T> {
  pub width: u32,
  pub height: u32,
  fields: Vec<T>,
}

impl<T> Board<T> {
  pub fn new(width: u32, height: u32, default: T) -> Self
  where
    T: Clone,
  {
    Self {
      width,
      height,
      fields: vec![default; width as usize * height as usize],
    }
  }

  pub fn contains(&self, pos: BoardVec) -> bool {
    in_bounds(pos, self.width, self.height)
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  fn pos_to_index(&self, pos: BoardVec) -> Option<usize> {
    if self.contains(pos) {
      Some(pos.x as usize + pos.y as usize * self.width as usize)
    } else {
      None
    }
  }

  pub fn get(&self, pos: BoardVec) -> Option<&T> {
    self.pos_to_index(pos).map(|i| &self.fields[i])
  }

  pub fn get_mut(&mut self, pos: BoardVec) -> Option<&mut T> {
    self.pos_to_index(pos).map(move |i| &mut self.fields[i])
  }

  /// The up to 8 tiles around `pos` that lie on the board.
  ///
  /// The iterator only copies the board size, so the board may be mutated while walking it.
  pub fn neighbours(&self, pos: BoardVec) -> impl Iterator<Item = BoardVec> {
    let (width, height) = (self.width, self.height);
    DIRECTIONS
      .iter()
      .map(move |&dir| pos + dir)
      .filter(move |&pos| in_bounds(pos, width, height))
  }

  /// Like [`Board::neighbours`], but including `pos` itself.
  pub fn with_neighbours(&self, pos: BoardVec) -> impl Iterator<Item = BoardVec> {
    let (width, height) = (self.width, self.height);
    CENTER_AND_DIRECTIONS
      .iter()
      .map(move |&dir| pos + dir)
      .filter(move |&pos| in_bounds(pos, width, height))
  }

  /// All positions in storage order: left to right, then top to bottom.
  pub fn positions(&self) -> impl Iterator<Item = BoardVec> {
    let (width, height) = (self.width as i32, self.height as i32);
    (0..height).flat_map(move |y| (0..width).map(move |x| BoardVec::new(x, y)))
  }

  pub fn enumerate(&self) -> impl Iterator<Item = (BoardVec, &T)> {
    self.positions().zip(self.fields.iter())
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.fields.iter()
  }
}

impl<T> Index<BoardVec> for Board<T> {
  type Output = T;

  fn index(&self, index: BoardVec) -> &Self::Output {
    self.get(index).unwrap_or_else(|| {
      panic!(
        "Cannot access position {:?} on board with size {}x{}",
        index, self.width, self.height
      )
    })
  }
}

impl<T> IndexMut<BoardVec> for Board<T> {
  fn index_mut(&mut self, index: BoardVec) -> &mut T {
    let (width, height) = (self.width, self.height);
    self.get_mut(index).unwrap_or_else(|| {
      panic!(
        "Cannot mut-access position {:?} on board with size {}x{}",
        index, width, height
      )
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn neighbours_are_clipped_at_edges() {
    let board = Board::new(9, 9, ());
    assert_eq!(board.neighbours(BoardVec::new(4, 4)).count(), 8);
    assert_eq!(board.neighbours(BoardVec::new(0, 4)).count(), 5);
    assert_eq!(board.neighbours(BoardVec::new(4, 8)).count(), 5);

    let mut corner: Vec<_> = board.neighbours(BoardVec::new(0, 0)).collect();
    corner.sort();
    assert_eq!(corner, vec![BoardVec::new(0, 1), BoardVec::new(1, 0), BoardVec::new(1, 1)]);

    assert_eq!(board.with_neighbours(BoardVec::new(8, 8)).count(), 4);
    assert!(board.with_neighbours(BoardVec::new(8, 8)).any(|pos| pos == BoardVec::new(8, 8)));
  }

  #[test]
  fn out_of_range_positions_are_rejected() {
    let mut board = Board::new(4, 5, 0u8);
    assert!(board.get(BoardVec::new(-1, 0)).is_none());
    assert!(board.get(BoardVec::new(0, -1)).is_none());
    assert!(board.get(BoardVec::new(4, 0)).is_none());
    assert!(board.get(BoardVec::new(0, 5)).is_none());
    assert!(board.get_mut(BoardVec::new(3, 4)).is_some());
    assert!(board.contains(BoardVec::new(3, 4)));
  }

  #[test]
  #[should_panic(expected = "Cannot access position (4, 0) on board with size 4x4")]
  fn indexing_outside_panics() {
    let board = Board::new(4, 4, 0u8);
    let _ = board[BoardVec::new(4, 0)];
  }

  #[test]
  fn positions_follow_storage_order() {
    let mut board = Board::new(3, 2, 0u32);
    for (i, pos) in board.positions().collect::<Vec<_>>().into_iter().enumerate() {
      board[pos] = i as u32;
    }
    let values: Vec<_> = board.iter().copied().collect();
    assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(board.enumerate().nth(4).map(|(pos, _)| pos), Some(BoardVec::new(1, 1)));
    assert_eq!(board.len(), 6);
  }

  #[test]
  fn distance_is_chebyshev() {
    let origin = BoardVec::new(2, 2);
    assert_eq!(origin.distance(origin), 0);
    assert_eq!(origin.distance(BoardVec::new(3, 1)), 1);
    assert_eq!(origin.distance(BoardVec::new(0, 3)), 2);
    assert_eq!(origin.distance(BoardVec::new(-3, 2)), 5);
  }
}
