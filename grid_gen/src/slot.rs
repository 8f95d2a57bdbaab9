use std::fmt::Display;

use util::pos::{Diff, Pos};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotDir {
  Across,
  Down,
}

impl SlotDir {
  /// Unit step from one cell of a slot to the next.
  pub fn delta(self) -> Diff {
    match self {
      SlotDir::Across => Diff::DX,
      SlotDir::Down => Diff::DY,
    }
  }

  pub fn crossing(self) -> SlotDir {
    match self {
      SlotDir::Across => SlotDir::Down,
      SlotDir::Down => SlotDir::Across,
    }
  }
}

impl Display for SlotDir {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        SlotDir::Across => "across",
        SlotDir::Down => "down",
      }
    )
  }
}

/// Key into the slot dictionary: direction plus clue number.
pub type SlotKey = (SlotDir, u32);

/// A numbered run of at least three open cells in one direction, holding at
/// most one assigned word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
  number: u32,
  dir: SlotDir,
  start: Pos,
  length: u32,
  assigned_word: Option<String>,
}

impl Slot {
  pub(crate) fn new(number: u32, dir: SlotDir, start: Pos, length: u32) -> Self {
    Self { number, dir, start, length, assigned_word: None }
  }

  pub fn number(&self) -> u32 {
    self.number
  }

  pub fn dir(&self) -> SlotDir {
    self.dir
  }

  pub fn start(&self) -> Pos {
    self.start
  }

  pub fn length(&self) -> u32 {
    self.length
  }

  pub fn key(&self) -> SlotKey {
    (self.dir, self.number)
  }

  pub fn assigned_word(&self) -> Option<&str> {
    self.assigned_word.as_deref()
  }

  pub fn is_filled(&self) -> bool {
    self.assigned_word.is_some()
  }

  /// Positions of the cells this slot spans, in word order.
  pub fn cells(&self) -> impl Iterator<Item = Pos> {
    let start = self.start;
    let delta = self.dir.delta();
    (0..self.length as i32).map(move |i| start + delta * i)
  }

  pub(crate) fn assign(&mut self, word: String) {
    debug_assert_eq!(word.chars().count() as u32, self.length);
    self.assigned_word = Some(word);
  }

  pub(crate) fn clear(&mut self) {
    self.assigned_word = None;
  }
}
