use std::collections::HashMap;

use itertools::Itertools;
use util::{grid::Grid, pos::Pos};
use word_bank::WordBank;

use crate::{
  cell::Cell,
  slot::{Slot, SlotDir, SlotKey},
};

/// Backtracking word assignment over a numbered slot dictionary.
///
/// Slots are visited in an alternating across/down interleave (ascending
/// clue numbers per direction) so crossing conflicts surface early.
/// Candidates come from the bank's pre-shuffled per-length lists. A
/// placement is kept only while every unfilled crossing slot still has at
/// least one compatible candidate; this one-step lookahead prunes dead ends
/// but does not guarantee global solvability, so deeper conflicts unwind
/// through the normal backtracking path.
pub struct WordFitter<'a> {
  grid: &'a mut Grid<Cell>,
  slots: &'a mut HashMap<SlotKey, Slot>,
  bank: &'a WordBank,
  across_numbers: Vec<u32>,
  down_numbers: Vec<u32>,
}

impl<'a> WordFitter<'a> {
  pub fn new(
    grid: &'a mut Grid<Cell>,
    slots: &'a mut HashMap<SlotKey, Slot>,
    bank: &'a WordBank,
  ) -> Self {
    let across_numbers = direction_numbers(slots, SlotDir::Across);
    let down_numbers = direction_numbers(slots, SlotDir::Down);
    Self { grid, slots, bank, across_numbers, down_numbers }
  }

  /// Attempt to assign a word to every slot. Returns false when every
  /// candidate combination is exhausted, in which case the grid and slot
  /// dictionary are back in their pre-call state.
  pub fn fill(&mut self) -> bool {
    self.fill_from(0, 0, 0)
  }

  fn fill_from(&mut self, alt_index: usize, across_index: usize, down_index: usize) -> bool {
    if across_index == self.across_numbers.len() && down_index == self.down_numbers.len() {
      return true;
    }
    let (key, across_index, down_index) = self.next_slot(alt_index, across_index, down_index);
    let Some((start, dir, length)) = self.slot_shape(key) else {
      return false;
    };

    let pattern = self.read_pattern(start, dir, length);
    let bank = self.bank;
    for word in bank.words_with_length(length) {
      if !word_fits(&pattern, word) {
        continue;
      }
      self.place_word(key, word);
      if self.crossings_feasible(key) && self.fill_from(alt_index + 1, across_index, down_index) {
        return true;
      }
      self.erase_word(key);
    }
    false
  }

  /// Alternate between the across and down lists until one runs out, then
  /// drain the other in order.
  fn next_slot(
    &self,
    alt_index: usize,
    across_index: usize,
    down_index: usize,
  ) -> (SlotKey, usize, usize) {
    if across_index < self.across_numbers.len()
      && (down_index >= self.down_numbers.len() || alt_index % 2 == 0)
    {
      (
        (SlotDir::Across, self.across_numbers[across_index]),
        across_index + 1,
        down_index,
      )
    } else {
      (
        (SlotDir::Down, self.down_numbers[down_index]),
        across_index,
        down_index + 1,
      )
    }
  }

  fn slot_shape(&self, key: SlotKey) -> Option<(Pos, SlotDir, u32)> {
    self
      .slots
      .get(&key)
      .map(|slot| (slot.start(), slot.dir(), slot.length()))
  }

  /// The slot's cells as currently fixed letters, empty cells as None.
  fn read_pattern(&self, start: Pos, dir: SlotDir, length: u32) -> Vec<Option<char>> {
    (0..length as i32)
      .map(|i| {
        self
          .grid
          .get(start + dir.delta() * i)
          .and_then(|cell| cell.letter())
      })
      .collect()
  }

  fn place_word(&mut self, key: SlotKey, word: &str) {
    let Some((start, dir, _)) = self.slot_shape(key) else {
      return;
    };
    for (i, letter) in word.chars().enumerate() {
      if let Some(cell) = self.grid.get_mut(start + dir.delta() * i as i32) {
        cell.set_letter(letter);
      }
    }
    if let Some(slot) = self.slots.get_mut(&key) {
      slot.assign(word.to_owned());
    }
  }

  /// Exact inverse of `place_word`: letters shared with a crossing slot
  /// that is still filled stay on the grid, everything else reverts to
  /// empty.
  fn erase_word(&mut self, key: SlotKey) {
    let Some((start, dir, length)) = self.slot_shape(key) else {
      return;
    };
    if let Some(slot) = self.slots.get_mut(&key) {
      slot.clear();
    }
    let crossing_dir = dir.crossing();
    for i in 0..length as i32 {
      let pos = start + dir.delta() * i;
      let retained = self
        .crossing_slot(pos, crossing_dir)
        .is_some_and(Slot::is_filled);
      if !retained {
        if let Some(cell) = self.grid.get_mut(pos) {
          cell.clear_letter();
        }
      }
    }
  }

  fn crossing_slot(&self, pos: Pos, crossing_dir: SlotDir) -> Option<&Slot> {
    let id = self.grid.get(pos).and_then(|cell| cell.slot_id(crossing_dir))?;
    self.slots.get(&(crossing_dir, id))
  }

  /// One-step lookahead: every unfilled slot crossing `key` must still have
  /// at least one candidate compatible with the letters now on the grid.
  fn crossings_feasible(&self, key: SlotKey) -> bool {
    let Some((start, dir, length)) = self.slot_shape(key) else {
      return false;
    };
    let crossing_dir = dir.crossing();
    (0..length as i32).all(|i| {
      let pos = start + dir.delta() * i;
      match self.crossing_slot(pos, crossing_dir) {
        Some(slot) if !slot.is_filled() => {
          let pattern = self.read_pattern(slot.start(), slot.dir(), slot.length());
          self
            .bank
            .words_with_length(slot.length())
            .any(|word| word_fits(&pattern, word))
        }
        _ => true,
      }
    })
  }
}

fn direction_numbers(slots: &HashMap<SlotKey, Slot>, want: SlotDir) -> Vec<u32> {
  slots
    .keys()
    .filter(|&&(dir, _)| dir == want)
    .map(|&(_, number)| number)
    .sorted()
    .collect()
}

/// A candidate matches when it agrees with every letter already fixed in
/// the slot's cells.
fn word_fits(pattern: &[Option<char>], word: &str) -> bool {
  word.chars().count() == pattern.len()
    && pattern
      .iter()
      .zip(word.chars())
      .all(|(&fixed, letter)| fixed.is_none_or(|fixed| fixed == letter))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use rand::{rngs::StdRng, SeedableRng};
  use util::pos::Pos;
  use word_bank::WordBank;

  use crate::{layout::CrosswordGrid, slot::SlotDir};

  use super::{word_fits, WordFitter};

  fn bank_of(words: &[&str]) -> WordBank {
    let mut rng = StdRng::seed_from_u64(3);
    WordBank::from_words(words.iter().map(|word| word.to_string()), &mut rng)
  }

  fn plus_shape() -> CrosswordGrid {
    CrosswordGrid::from_pattern(
      "X_X
       ___
       X_X",
    )
    .unwrap()
  }

  fn letter_at(xword: &CrosswordGrid, x: i32, y: i32) -> Option<char> {
    xword.cell(Pos { x, y }).and_then(|cell| cell.letter())
  }

  #[gtest]
  fn test_word_fits() {
    expect_true!(word_fits(&[None, Some('a'), None], "cat"));
    expect_false!(word_fits(&[None, Some('a'), None], "dog"));
    expect_false!(word_fits(&[None, None], "cat"));
    expect_true!(word_fits(&[None, None, None], "dog"));
  }

  #[gtest]
  fn test_interleave_order() {
    let mut xword = CrosswordGrid::from_pattern(
      "___
       X__
       X__",
    )
    .unwrap();
    let bank = bank_of(&["cat"]);
    let fitter = WordFitter::new(&mut xword.grid, &mut xword.slots, &bank);

    expect_that!(fitter.across_numbers.clone(), container_eq([1]));
    expect_that!(fitter.down_numbers.clone(), container_eq([2, 3]));
    expect_that!(fitter.next_slot(0, 0, 0), eq(((SlotDir::Across, 1), 1, 0)));
    expect_that!(fitter.next_slot(1, 1, 0), eq(((SlotDir::Down, 2), 1, 1)));
    expect_that!(fitter.next_slot(2, 1, 1), eq(((SlotDir::Down, 3), 1, 2)));
  }

  #[gtest]
  fn test_fill_plus_shape() {
    let mut xword = plus_shape();
    let bank = bank_of(&["cat"]);
    expect_true!(xword.fill_words(&bank));

    expect_that!(letter_at(&xword, 0, 1), some(eq('c')));
    expect_that!(letter_at(&xword, 1, 1), some(eq('a')));
    expect_that!(letter_at(&xword, 2, 1), some(eq('t')));
    expect_that!(letter_at(&xword, 1, 0), some(eq('c')));
    expect_that!(letter_at(&xword, 1, 2), some(eq('t')));
    expect_true!(xword.slots().all(|slot| slot.is_filled()));
  }

  #[gtest]
  fn test_fill_fails_without_matching_lengths() {
    let mut xword = CrosswordGrid::from_pattern(
      "____
       ____
       ____
       ____",
    )
    .unwrap();
    let bank = bank_of(&["cat", "dog"]);
    expect_false!(xword.fill_words(&bank));

    // A failed fill leaves no letters and no assignments behind.
    expect_true!(xword
      .cells()
      .positions()
      .all(|pos| xword.cell(pos).and_then(|cell| cell.letter()).is_none()));
    expect_true!(xword.slots().all(|slot| !slot.is_filled()));
  }

  #[gtest]
  fn test_erase_retains_crossing_letters() {
    let mut xword = plus_shape();
    let bank = bank_of(&["cat", "man"]);
    let mut fitter = WordFitter::new(&mut xword.grid, &mut xword.slots, &bank);

    fitter.place_word((SlotDir::Across, 2), "cat");
    fitter.place_word((SlotDir::Down, 1), "man");

    fitter.erase_word((SlotDir::Across, 2));
    expect_that!(
      fitter.grid.get(Pos { x: 0, y: 1 }).and_then(|cell| cell.letter()),
      none()
    );
    expect_that!(
      fitter.grid.get(Pos { x: 2, y: 1 }).and_then(|cell| cell.letter()),
      none()
    );
    // The shared cell keeps the still-filled down word's letter.
    expect_that!(
      fitter.grid.get(Pos { x: 1, y: 1 }).and_then(|cell| cell.letter()),
      some(eq('a'))
    );

    fitter.erase_word((SlotDir::Down, 1));
    expect_that!(
      fitter.grid.get(Pos { x: 1, y: 1 }).and_then(|cell| cell.letter()),
      none()
    );
    expect_that!(
      fitter.grid.get(Pos { x: 1, y: 0 }).and_then(|cell| cell.letter()),
      none()
    );
  }

  #[gtest]
  fn test_lookahead_rejects_unfillable_crossing() {
    let mut xword = plus_shape();
    let bank = bank_of(&["cat", "tac"]);
    let mut fitter = WordFitter::new(&mut xword.grid, &mut xword.slots, &bank);

    fitter.place_word((SlotDir::Across, 2), "dog");
    expect_false!(fitter.crossings_feasible((SlotDir::Across, 2)));
    fitter.erase_word((SlotDir::Across, 2));

    fitter.place_word((SlotDir::Across, 2), "cat");
    expect_true!(fitter.crossings_feasible((SlotDir::Across, 2)));
  }
}
