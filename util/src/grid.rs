use std::fmt::{Debug, Display};

use bitcode::{Decode, Encode};

use crate::{
  error::{CrossgenError, CrossgenResult},
  pos::Pos,
};

/// Row-major rectangular grid with bounds-checked access.
#[derive(Clone, PartialEq, Eq, Encode, Decode)]
pub struct Grid<T> {
  cells: Vec<T>,
  width: u32,
  height: u32,
}

impl<T> Grid<T> {
  pub fn from_vec(cells: Vec<T>, width: u32, height: u32) -> CrossgenResult<Self> {
    let expected_size = width as usize * height as usize;
    if cells.len() != expected_size {
      return Err(
        CrossgenError::Internal(format!(
          "Expected cells.len() == expected_size, {} != {expected_size}",
          cells.len()
        ))
        .into(),
      );
    }

    Ok(Self { cells, width, height })
  }

  fn idx(&self, pos: Pos) -> usize {
    debug_assert!(self.in_bounds(pos));
    pos.x as usize + pos.y as usize * self.width as usize
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn in_bounds(&self, pos: Pos) -> bool {
    pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
  }

  pub fn get(&self, pos: Pos) -> Option<&T> {
    self
      .in_bounds(pos)
      .then(|| self.cells.get(self.idx(pos)))
      .flatten()
  }

  pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
    self
      .in_bounds(pos)
      .then(|| {
        let index = self.idx(pos);
        self.cells.get_mut(index)
      })
      .flatten()
  }

  /// All positions in row-major order (top to bottom, left to right).
  pub fn positions(&self) -> impl Iterator<Item = Pos> {
    let width = self.width;
    (0..self.height as i32).flat_map(move |y| (0..width as i32).map(move |x| Pos { x, y }))
  }

  pub fn iter_row(&self, y: u32) -> impl Iterator<Item = &T> + '_ {
    let y = y as i32;
    (0..self.width as i32).flat_map(move |x| self.get(Pos { x, y }))
  }
}

impl<T> Grid<T>
where
  T: Default,
{
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      cells: (0..width * height).map(|_| T::default()).collect(),
      width,
      height,
    }
  }
}

impl<T: Debug> Debug for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.height).try_fold((), |_, y| {
      self.iter_row(y).try_fold((), |_, t| write!(f, "{t:?} "))?;
      writeln!(f)
    })
  }
}

impl<T: Display> Display for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.height).try_fold((), |_, y| {
      self.iter_row(y).try_fold((), |_, t| write!(f, "{t} "))?;
      writeln!(f)
    })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used)]

  use super::Grid;
  use crate::pos::Pos;

  #[test]
  fn from_vec_rejects_wrong_size() {
    assert!(Grid::from_vec(vec![0u8; 5], 2, 3).is_err());
    assert!(Grid::from_vec(vec![0u8; 6], 2, 3).is_ok());
  }

  #[test]
  fn get_respects_bounds() {
    let grid = Grid::from_vec((0..6).collect(), 3, 2).unwrap();
    assert_eq!(grid.get(Pos { x: 2, y: 1 }), Some(&5));
    assert_eq!(grid.get(Pos { x: 3, y: 0 }), None);
    assert_eq!(grid.get(Pos { x: 0, y: -1 }), None);
  }

  #[test]
  fn positions_are_row_major() {
    let grid = Grid::<u8>::new(2, 2);
    let positions: Vec<_> = grid.positions().collect();
    assert_eq!(
      positions,
      vec![
        Pos::zero(),
        Pos { x: 1, y: 0 },
        Pos { x: 0, y: 1 },
        Pos { x: 1, y: 1 }
      ]
    );
  }

  #[test]
  fn get_mut_writes_through() {
    let mut grid = Grid::<u8>::new(2, 2);
    *grid.get_mut(Pos { x: 1, y: 1 }).unwrap() = 7;
    assert_eq!(grid.get(Pos { x: 1, y: 1 }), Some(&7));
  }
}
