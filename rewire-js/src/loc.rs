use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::cmp::{max, min};
use std::ops::{Add, AddAssign};

/// A half-open byte range `[start, end)` within the source.
///
/// Nodes synthesized by a transformation have no counterpart in the source and
/// carry [`Loc::SYNTHETIC`] instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub const SYNTHETIC: Loc = Loc(0, 0);

  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  /// 1-based line and column of the start of this range.
  pub fn line_col(&self, source: &str) -> (usize, usize) {
    let start = min(self.0, source.len());
    let before = &source.as_bytes()[..start];
    let line = before.iter().filter(|&&c| c == b'\n').count() + 1;
    let line_start = before
      .iter()
      .rposition(|&c| c == b'\n')
      .map(|i| i + 1)
      .unwrap_or(0);
    (line, start - line_start + 1)
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

#[cfg(test)]
mod tests {
  use super::Loc;

  #[test]
  fn test_line_col() {
    let src = "a\nbc\nd";
    assert_eq!(Loc(0, 1).line_col(src), (1, 1));
    assert_eq!(Loc(3, 4).line_col(src), (2, 2));
    assert_eq!(Loc(5, 6).line_col(src), (3, 1));
  }

  #[test]
  fn test_add_extends_range() {
    assert_eq!(Loc(4, 6) + Loc(1, 5), Loc(1, 6));
  }
}
