use util::{
  grid::Grid,
  pos::{Diff, Pos},
};

use crate::cell::Cell;

/// Whether every open cell is reachable from every other open cell through
/// 4-adjacent open cells. Flood-fills from the first open cell in scan order
/// with an explicit stack; a grid with no open cells is vacuously connected.
pub fn is_fully_connected(grid: &Grid<Cell>) -> bool {
  let Some(start) = grid.positions().find(|&pos| is_open(grid, pos)) else {
    return true;
  };

  let mut visited = Grid::<bool>::new(grid.width(), grid.height());
  let mut stack = vec![start];
  if let Some(mark) = visited.get_mut(start) {
    *mark = true;
  }

  while let Some(pos) = stack.pop() {
    for diff in [Diff::DX, -Diff::DX, Diff::DY, -Diff::DY] {
      let neighbor = pos + diff;
      if is_open(grid, neighbor) && !visited.get(neighbor).copied().unwrap_or(true) {
        if let Some(mark) = visited.get_mut(neighbor) {
          *mark = true;
        }
        stack.push(neighbor);
      }
    }
  }

  grid
    .positions()
    .all(|pos| !is_open(grid, pos) || visited.get(pos).copied().unwrap_or(false))
}

fn is_open(grid: &Grid<Cell>, pos: Pos) -> bool {
  grid.get(pos).is_some_and(Cell::is_open)
}
