use core::fmt;
use std::collections::VecDeque;

use board::{Board, BoardVec};
use log::trace;
use rand::RngCore;

pub mod board;
pub mod error;
pub mod field;
pub mod setup;

pub use error::GameError;
pub use field::Field;
pub use setup::{GameBoard, GameSetup};

/// Smallest accepted board side.
pub const MIN_SIDE: u32 = 4;
/// Largest accepted board side, so that every tile has an `i32` coordinate.
pub const MAX_SIDE: u32 = i32::MAX as u32;

fn clamp_side(side: u32) -> u32 {
  side.clamp(MIN_SIDE, MAX_SIDE)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Visibility {
  Hidden,
  Flagged,
  Revealed,
}

pub type ViewBoard = Board<Visibility>;

/// What the player gets to see of a single tile.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Symbol {
  Hidden,
  Flagged,
  Mine,
  Count(u8),
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Symbol::Hidden => write!(f, "?"),
      Symbol::Flagged => write!(f, "F"),
      Symbol::Mine => write!(f, "Q"),
      Symbol::Count(mines) => write!(f, "{}", mines),
    }
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum RevealOutcome {
  /// A mine was opened.
  Detonated,
  /// The tiles that turned visible by this call, each listed once, starting with the opened tile.
  /// Empty when the tile was already open.
  Revealed(Vec<BoardVec>),
}

impl RevealOutcome {
  pub fn is_detonated(&self) -> bool {
    matches!(self, RevealOutcome::Detonated)
  }

  pub fn revealed(&self) -> &[BoardVec] {
    match self {
      RevealOutcome::Detonated => &[],
      RevealOutcome::Revealed(tiles) => tiles,
    }
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GameStatus {
  Playing,
  Lost,
  Won,
}

enum Layout {
  /// No tile was opened yet, the mines are placed around the first one.
  Pending(Box<dyn RngCore>),
  Generated(GameSetup),
}

pub struct Game {
  layout: Layout,
  view: ViewBoard,
  mines: u32,
  safe_revealed: usize,
  detonated: bool,
}

impl Game {
  pub fn new(width: u32, height: u32, mines: u32) -> Self {
    Self::with_rng(width, height, mines, rand::thread_rng())
  }

  /// Creates a game whose mines will be drawn from `rng`.
  ///
  /// Both sides are clamped to [`MIN_SIDE`]..=[`MAX_SIDE`] and the mine count is clamped to
  /// between one and half of the tiles.
  pub fn with_rng(width: u32, height: u32, mines: u32, rng: impl RngCore + 'static) -> Self {
    let width = clamp_side(width);
    let height = clamp_side(height);
    let max_mines = u32::try_from(u64::from(width) * u64::from(height) / 2).unwrap_or(u32::MAX);
    Self {
      layout: Layout::Pending(Box::new(rng)),
      view: ViewBoard::new(width, height, Visibility::Hidden),
      mines: mines.clamp(1, max_mines),
      safe_revealed: 0,
      detonated: false,
    }
  }

  pub fn width(&self) -> u32 {
    self.view.width
  }

  pub fn height(&self) -> u32 {
    self.view.height
  }

  pub fn mines(&self) -> u32 {
    self.mines
  }

  pub fn is_generated(&self) -> bool {
    matches!(self.layout, Layout::Generated(_))
  }

  /// The mine layout, once the first tile has been opened.
  pub fn setup(&self) -> Option<&GameSetup> {
    match &self.layout {
      Layout::Pending(_) => None,
      Layout::Generated(setup) => Some(setup),
    }
  }

  fn check(&self, pos: BoardVec) -> Result<(), GameError> {
    if self.view.contains(pos) {
      Ok(())
    } else {
      Err(GameError::OutOfBounds {
        pos,
        width: self.width(),
        height: self.height(),
      })
    }
  }

  fn field_at(&self, pos: BoardVec) -> Field {
    match &self.layout {
      Layout::Pending(_) => Field::Empty(0),
      Layout::Generated(setup) => setup.board()[pos],
    }
  }

  /// The mine map cell at `pos`, regardless of whether the player can see it.
  pub fn field(&self, pos: BoardVec) -> Result<Field, GameError> {
    self.check(pos)?;
    Ok(self.field_at(pos))
  }

  pub fn visibility(&self, pos: BoardVec) -> Result<Visibility, GameError> {
    self.check(pos)?;
    Ok(self.view[pos])
  }

  /// Opens the tile at `pos`, cascading over every tile without adjacent mines.
  ///
  /// The first call places the mines so that `pos` and, as far as the mine count allows, its
  /// neighbours are safe.
  pub fn reveal(&mut self, pos: BoardVec) -> Result<RevealOutcome, GameError> {
    self.check(pos)?;
    if let Layout::Pending(rng) = &mut self.layout {
      let setup = GameSetup::generate(self.view.width, self.view.height, self.mines, pos, rng);
      self.layout = Layout::Generated(setup);
    }
    let board = match &self.layout {
      Layout::Generated(setup) => setup.board(),
      Layout::Pending(_) => unreachable!("mines are placed before the first tile is opened"),
    };

    if board[pos].is_mine() {
      trace!("Opened mine at {:?}", pos);
      self.view[pos] = Visibility::Revealed;
      self.detonated = true;
      return Ok(RevealOutcome::Detonated);
    }
    if self.view[pos] == Visibility::Revealed {
      return Ok(RevealOutcome::Revealed(Vec::new()));
    }

    let opened = flood_reveal(board, &mut self.view, pos);
    self.safe_revealed += opened.len();
    trace!("Opened {} tiles from {:?}", opened.len(), pos);
    Ok(RevealOutcome::Revealed(opened))
  }

  /// Toggles a flag on a closed tile. Returns whether anything changed.
  ///
  /// Nothing can be flagged before the first tile is opened.
  pub fn flag(&mut self, pos: BoardVec) -> Result<bool, GameError> {
    self.check(pos)?;
    if !self.is_generated() {
      return Ok(false);
    }

    let tile = &mut self.view[pos];
    *tile = match *tile {
      Visibility::Revealed => return Ok(false),
      Visibility::Hidden => Visibility::Flagged,
      Visibility::Flagged => Visibility::Hidden,
    };
    trace!("Tile {:?} is now {:?}", pos, tile);
    Ok(true)
  }

  pub fn visible_symbol(&self, pos: BoardVec) -> Result<Symbol, GameError> {
    self.check(pos)?;
    Ok(self.symbol_at(pos))
  }

  fn symbol_at(&self, pos: BoardVec) -> Symbol {
    match self.view[pos] {
      Visibility::Hidden => Symbol::Hidden,
      Visibility::Flagged => Symbol::Flagged,
      Visibility::Revealed => match self.field_at(pos) {
        Field::Mine => Symbol::Mine,
        Field::Empty(mines) if mines <= 8 => Symbol::Count(mines),
        Field::Empty(mines) => panic!("Tile {:?} claims {} neighbouring mines", pos, mines),
      },
    }
  }

  pub fn revealed_count(&self) -> usize {
    self.view.iter().filter(|&&tile| tile == Visibility::Revealed).count()
  }

  pub fn flag_count(&self) -> usize {
    self.view.iter().filter(|&&tile| tile == Visibility::Flagged).count()
  }

  /// True once a mine has been opened.
  pub fn is_game_over(&self) -> bool {
    self.detonated
  }

  /// True once every safe tile is open.
  pub fn is_victory(&self) -> bool {
    self.safe_revealed == self.view.len() - self.mines as usize
  }

  pub fn status(&self) -> GameStatus {
    if self.is_game_over() {
      GameStatus::Lost
    } else if self.is_victory() {
      GameStatus::Won
    } else {
      GameStatus::Playing
    }
  }

  /// Renders the whole mine map, hidden tiles included. Meant for debugging only.
  pub fn show_full(&self) -> FullMap<'_> {
    FullMap(self)
  }

  fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let noun = if self.mines == 1 { "mine" } else { "mines" };
    write!(f, "Minesweeper ({}x{}; {} {})", self.width(), self.height(), self.mines, noun)
  }

  fn write_rows<T: fmt::Display>(&self, f: &mut fmt::Formatter<'_>, tile: impl Fn(BoardVec) -> T) -> fmt::Result {
    for y in 0..self.height() as i32 {
      writeln!(f)?;
      for x in 0..self.width() as i32 {
        if x > 0 {
          write!(f, " ")?;
        }
        write!(f, "{}", tile(BoardVec::new(x, y)))?;
      }
    }

    Ok(())
  }
}

/// Marks `start` and, through every blank tile reached, its neighbours as revealed.
///
/// A tile is marked before it is queued, so the visibility board doubles as the visited set.
fn flood_reveal(board: &GameBoard, view: &mut ViewBoard, start: BoardVec) -> Vec<BoardVec> {
  let mut opened = vec![start];
  let mut queue = VecDeque::from([start]);
  view[start] = Visibility::Revealed;

  while let Some(pos) = queue.pop_front() {
    if !board[pos].is_blank() {
      continue;
    }
    for neighbour_pos in view.neighbours(pos) {
      if view[neighbour_pos] != Visibility::Revealed {
        view[neighbour_pos] = Visibility::Revealed;
        opened.push(neighbour_pos);
        queue.push_back(neighbour_pos);
      }
    }
  }

  opened
}

impl From<GameSetup> for Game {
  /// Starts a game on a fixed layout. Flags may be placed right away.
  fn from(setup: GameSetup) -> Self {
    Self {
      view: ViewBoard::new(setup.width(), setup.height(), Visibility::Hidden),
      mines: setup.mines(),
      layout: Layout::Generated(setup),
      safe_revealed: 0,
      detonated: false,
    }
  }
}

impl fmt::Display for Game {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.write_header(f)?;
    self.write_rows(f, |pos| self.symbol_at(pos))
  }
}

impl fmt::Debug for Game {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Game")
      .field("width", &self.width())
      .field("height", &self.height())
      .field("mines", &self.mines)
      .field("setup", &self.setup())
      .field("status", &self.status())
      .finish()
  }
}

pub struct FullMap<'a>(&'a Game);

impl fmt::Display for FullMap<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let game = self.0;
    game.write_header(f)?;
    game.write_rows(f, |pos| game.field_at(pos))
  }
}
