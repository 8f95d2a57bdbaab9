use std::{collections::HashMap, fmt::Display};

use log::debug;
use rand::{
  distr::{weighted::WeightedIndex, Distribution},
  seq::IndexedRandom,
  Rng,
};
use util::{
  error::{CrossgenError, CrossgenResult},
  grid::Grid,
  pos::{Diff, Pos},
};
use word_bank::WordBank;

use crate::{
  cell::Cell,
  connectivity,
  fitter::WordFitter,
  slot::{Slot, SlotDir, SlotKey},
};

/// Shortest run of open cells that counts as a word slot.
pub const MIN_SLOT_LEN: u32 = 3;

#[derive(Clone, Copy, Debug)]
pub struct GenerationParams {
  pub size: u32,
  pub max_attempts: u32,
}

impl Default for GenerationParams {
  fn default() -> Self {
    Self { size: 15, max_attempts: 1000 }
  }
}

/// A square crossword grid: the cell matrix plus the slot dictionary keyed
/// by direction and clue number. The black pattern always has 180-degree
/// rotational symmetry and a single connected open region.
#[derive(Clone, Debug)]
pub struct CrosswordGrid {
  size: u32,
  pub(crate) grid: Grid<Cell>,
  pub(crate) slots: HashMap<SlotKey, Slot>,
}

impl CrosswordGrid {
  /// Generate a symmetric pattern and fill every slot with dictionary
  /// words, retrying from a fresh random pattern whenever the pattern is
  /// disconnected, has no slots, or cannot be filled. Blocks until a fully
  /// solved grid exists or `max_attempts` patterns have been discarded.
  pub fn generate(
    params: &GenerationParams,
    bank: &WordBank,
    rng: &mut impl Rng,
  ) -> CrossgenResult<Self> {
    if params.size < MIN_SLOT_LEN {
      return Err(
        CrossgenError::Internal(format!(
          "Grid size must be at least {MIN_SLOT_LEN}, got {}",
          params.size
        ))
        .into(),
      );
    }

    for attempt in 1..=params.max_attempts {
      let mut candidate = Self::empty(params.size);
      candidate.seed_checkerboard(rng);
      candidate.subdivide_lines(SlotDir::Across, rng)?;
      candidate.place_center_divider(rng);
      candidate.subdivide_lines(SlotDir::Down, rng)?;
      candidate.number_slots();
      candidate.prune_isolated_cells();

      if candidate.slots.is_empty() {
        debug!("attempt {attempt}: pattern has no slots, retrying");
        continue;
      }
      if !connectivity::is_fully_connected(&candidate.grid) {
        debug!("attempt {attempt}: open cells are disconnected, retrying");
        continue;
      }
      if candidate.fill_words(bank) {
        debug!("grid filled on attempt {attempt}");
        return Ok(candidate);
      }
      debug!("attempt {attempt}: word fill exhausted all candidates, retrying");
    }

    Err(CrossgenError::GenerationExhausted(params.max_attempts).into())
  }

  /// Build a numbered grid from a fixed layout string: `_` for an open
  /// cell, `X` (or `*`) for a black square. Open cells that belong to no
  /// slot are converted to black, as in generation.
  pub fn from_pattern(pattern: &str) -> CrossgenResult<Self> {
    let (width, height, cells) = pattern.lines().try_fold(
      (None, 0u32, vec![]),
      |(width, height, mut cells), line| -> CrossgenResult<_> {
        let line = line.trim();
        cells.extend(
          line
            .chars()
            .map(|c| match c {
              '_' => Ok(Cell::default()),
              'X' | '*' => Ok(Cell::black()),
              _ => {
                Err(CrossgenError::Parse(format!("Unrecognized pattern character '{c}'")).into())
              }
            })
            .collect::<CrossgenResult<Vec<_>>>()?,
        );
        if let Some(width) = width {
          if line.chars().count() != width {
            return Err(
              CrossgenError::Parse(format!(
                "Pattern line lengths differ: {} vs {width}",
                line.chars().count()
              ))
              .into(),
            );
          }
        }

        Ok((Some(line.chars().count()), height + 1, cells))
      },
    )?;

    let width =
      width.ok_or_else(|| CrossgenError::Parse("Empty pattern string".to_owned()))? as u32;
    if width != height {
      return Err(
        CrossgenError::Parse(format!("Pattern must be square, got {width}x{height}")).into(),
      );
    }

    let mut result = Self {
      size: width,
      grid: Grid::from_vec(cells, width, height)?,
      slots: HashMap::new(),
    };
    result.number_slots();
    result.prune_isolated_cells();
    Ok(result)
  }

  /// Assign a word to every slot using the bank's pre-shuffled candidate
  /// lists. Returns false (leaving the grid unchanged) when no complete
  /// assignment exists.
  pub fn fill_words(&mut self, bank: &WordBank) -> bool {
    WordFitter::new(&mut self.grid, &mut self.slots, bank).fill()
  }

  pub fn size(&self) -> u32 {
    self.size
  }

  pub fn cells(&self) -> &Grid<Cell> {
    &self.grid
  }

  pub fn cell(&self, pos: Pos) -> Option<&Cell> {
    self.grid.get(pos)
  }

  pub fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
    self.slots.values()
  }

  pub fn slot(&self, dir: SlotDir, number: u32) -> Option<&Slot> {
    self.slots.get(&(dir, number))
  }

  /// Plain-text diagnostic dump: `*` black, `_` empty, letters otherwise.
  pub fn dump(&self) -> String {
    self.to_string()
  }

  fn empty(size: u32) -> Self {
    Self {
      size,
      grid: Grid::new(size, size),
      slots: HashMap::new(),
    }
  }

  fn mirror(&self, pos: Pos) -> Pos {
    let n = self.size as i32 - 1;
    Pos { x: n - pos.x, y: n - pos.y }
  }

  fn set_black(&mut self, pos: Pos) {
    if let Some(cell) = self.grid.get_mut(pos) {
      cell.set_black();
    }
  }

  /// Blacken every cell matching a randomly chosen parity phase. Painting
  /// the top half and mirroring each cell keeps the pattern symmetric for
  /// even sizes as well; for odd sizes parity is mirror-invariant, so this
  /// matches blackening the whole grid directly.
  fn seed_checkerboard(&mut self, rng: &mut impl Rng) {
    const PHASES: [(i32, i32); 4] = [(1, 1), (1, 0), (0, 1), (0, 0)];
    let &(row_parity, col_parity) = PHASES.choose(rng).unwrap_or(&PHASES[0]);

    let n = self.size as i32;
    for y in 0..=(n - 1) / 2 {
      for x in 0..n {
        if y % 2 == row_parity && x % 2 == col_parity {
          let pos = Pos { x, y };
          let mirror = self.mirror(pos);
          self.set_black(pos);
          self.set_black(mirror);
        }
      }
    }
  }

  /// Split every usable space in the first half of the grid's lines into
  /// word-length segments, placing a black divider between consecutive
  /// segments and mirroring each divider to keep the pattern symmetric.
  fn subdivide_lines(&mut self, dir: SlotDir, rng: &mut impl Rng) -> CrossgenResult {
    let half = (self.size / 2) as i32;
    for line in 0..half {
      for (run_start, run_len) in self.usable_spaces(dir, line) {
        let segments = choose_segment_lengths(run_len, rng)?;
        let mut divider = run_start - 1;
        for &segment in &segments[..segments.len() - 1] {
          divider += segment + 1;
          let pos = match dir {
            SlotDir::Across => Pos { x: divider, y: line },
            SlotDir::Down => Pos { x: line, y: divider },
          };
          let mirror = self.mirror(pos);
          self.set_black(pos);
          self.set_black(mirror);
        }
      }
    }
    Ok(())
  }

  /// Maximal runs of open cells of usable length in one line, as
  /// (start index, length) pairs.
  fn usable_spaces(&self, dir: SlotDir, line: i32) -> Vec<(i32, i32)> {
    let n = self.size as i32;
    let mut spaces = vec![];
    let mut run_start = None;
    for i in 0..=n {
      let pos = match dir {
        SlotDir::Across => Pos { x: i, y: line },
        SlotDir::Down => Pos { x: line, y: i },
      };
      let open = i < n && is_open_at(&self.grid, pos);
      match (open, run_start) {
        (true, None) => run_start = Some(i),
        (false, Some(start)) => {
          let len = i - start;
          if len >= MIN_SLOT_LEN as i32 {
            spaces.push((start, len));
          }
          run_start = None;
        }
        _ => {}
      }
    }
    spaces
  }

  /// The center cell is its own mirror image, so an odd-size grid may take
  /// a black square there (probability 1/2) without a mirroring step. Even
  /// sizes have no self-symmetric cell and skip this.
  fn place_center_divider(&mut self, rng: &mut impl Rng) {
    if self.size % 2 == 0 {
      return;
    }
    let center = Pos {
      x: self.size as i32 / 2,
      y: self.size as i32 / 2,
    };
    if is_open_at(&self.grid, center) && rng.random_bool(0.5) {
      self.set_black(center);
    }
  }

  /// Scan row-major and hand the next sequential clue number to every cell
  /// that starts a qualifying slot; a cell starting both an across and a
  /// down slot shares one number between them.
  fn number_slots(&mut self) {
    let positions: Vec<Pos> = self.grid.positions().collect();
    let mut number = 0;
    for pos in positions {
      let start = slot_start_at(&self.grid, pos);
      if start == SlotStart::None {
        continue;
      }
      number += 1;
      if let Some(cell) = self.grid.get_mut(pos) {
        cell.assign_number(number);
      }
      match start {
        SlotStart::Across(length) => self.record_slot(SlotDir::Across, number, pos, length),
        SlotStart::Down(length) => self.record_slot(SlotDir::Down, number, pos, length),
        SlotStart::Both { across, down } => {
          self.record_slot(SlotDir::Across, number, pos, across);
          self.record_slot(SlotDir::Down, number, pos, down);
        }
        SlotStart::None => {}
      }
    }
  }

  fn record_slot(&mut self, dir: SlotDir, number: u32, start: Pos, length: u32) {
    let slot = Slot::new(number, dir, start, length);
    for pos in slot.cells() {
      if let Some(cell) = self.grid.get_mut(pos) {
        cell.set_slot_id(dir, number);
      }
    }
    self.slots.insert((dir, number), slot);
  }

  /// Open cells that ended up in no slot become black squares.
  fn prune_isolated_cells(&mut self) {
    let positions: Vec<Pos> = self.grid.positions().collect();
    for pos in positions {
      if let Some(cell) = self.grid.get_mut(pos) {
        if cell.is_open()
          && cell.slot_id(SlotDir::Across).is_none()
          && cell.slot_id(SlotDir::Down).is_none()
        {
          cell.set_black();
        }
      }
    }
  }
}

impl Display for CrosswordGrid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.grid)
  }
}

/// How a cell participates in slot starts, as decided row-major by the
/// numbering scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotStart {
  None,
  Across(u32),
  Down(u32),
  Both { across: u32, down: u32 },
}

fn slot_start_at(grid: &Grid<Cell>, pos: Pos) -> SlotStart {
  if !is_open_at(grid, pos) {
    return SlotStart::None;
  }

  let across = ((pos.x == 0 || is_black_at(grid, pos - Diff::DX))
    && pos.x != grid.width() as i32 - 1)
    .then(|| run_length(grid, pos, SlotDir::Across))
    .filter(|&length| length >= MIN_SLOT_LEN);
  let down = ((pos.y == 0 || is_black_at(grid, pos - Diff::DY))
    && pos.y != grid.height() as i32 - 1)
    .then(|| run_length(grid, pos, SlotDir::Down))
    .filter(|&length| length >= MIN_SLOT_LEN);

  match (across, down) {
    (Some(across), Some(down)) => SlotStart::Both { across, down },
    (Some(across), None) => SlotStart::Across(across),
    (None, Some(down)) => SlotStart::Down(down),
    (None, None) => SlotStart::None,
  }
}

fn run_length(grid: &Grid<Cell>, pos: Pos, dir: SlotDir) -> u32 {
  let mut cursor = pos;
  let mut length = 0;
  while is_open_at(grid, cursor) {
    length += 1;
    cursor += dir.delta();
  }
  length
}

fn is_open_at(grid: &Grid<Cell>, pos: Pos) -> bool {
  grid.get(pos).is_some_and(Cell::is_open)
}

fn is_black_at(grid: &Grid<Cell>, pos: Pos) -> bool {
  grid.get(pos).is_some_and(Cell::is_black)
}

/// Randomly partition a space of open cells into word segments of length at
/// least `MIN_SLOT_LEN`, separated by single dividers. Length-3 segments,
/// and segment choices that would force a length-3 remainder, carry weight 5
/// against 100 for everything else.
fn choose_segment_lengths(space: i32, rng: &mut impl Rng) -> CrossgenResult<Vec<i32>> {
  let min = MIN_SLOT_LEN as i32;
  let max_segments = (space - min) / (min + 1) + 1;
  let num_segments = if max_segments >= 4 {
    weighted_choice(&[1, 2], &[5, 100], rng)?
  } else if max_segments == 3 {
    rng.random_range(1..=2)
  } else {
    1
  };

  if num_segments == 1 {
    return Ok(vec![space]);
  }

  let mut remaining = space;
  let mut segments = Vec::with_capacity(num_segments as usize);
  for i in 0..num_segments {
    if i == num_segments - 1 {
      segments.push(remaining);
    } else {
      let segments_after = num_segments - i - 1;
      let longest = remaining - segments_after * (min + 1);
      let lengths: Vec<i32> = (min..=longest).collect();
      let weights: Vec<u32> = lengths
        .iter()
        .map(|&length| {
          if length == min || remaining - length == min + 1 {
            5
          } else {
            100
          }
        })
        .collect();
      let length = weighted_choice(&lengths, &weights, rng)?;
      remaining -= length + 1;
      segments.push(length);
    }
  }
  Ok(segments)
}

fn weighted_choice<T: Copy>(choices: &[T], weights: &[u32], rng: &mut impl Rng) -> CrossgenResult<T> {
  let index = WeightedIndex::new(weights.iter().copied())
    .map_err(|err| CrossgenError::Internal(format!("Bad segment weights: {err}")))?
    .sample(rng);
  choices
    .get(index)
    .copied()
    .ok_or_else(|| CrossgenError::Internal(format!("Weighted index {index} out of range")).into())
}
