use core::fmt;

/// One cell of the mine map.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Field {
  Mine,
  /// A safe tile with the number of mines around it.
  Empty(u8),
}

impl Field {
  pub fn is_mine(self) -> bool {
    matches!(self, Field::Mine)
  }

  pub fn is_blank(self) -> bool {
    matches!(self, Field::Empty(0))
  }

  pub(crate) fn notify_mine(&mut self) {
    if let Field::Empty(mines) = self {
      *mines += 1;
      debug_assert!(*mines <= 8);
    }
  }
}

/// `-1` for a mine, the adjacent mine count otherwise.
impl From<Field> for i8 {
  fn from(field: Field) -> i8 {
    match field {
      Field::Mine => -1,
      Field::Empty(mines) => mines as i8,
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Mine => write!(f, "Q"),
      Field::Empty(mines) => write!(f, "{}", mines),
    }
  }
}
