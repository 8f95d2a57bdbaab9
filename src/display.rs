use grid_gen::{cell::Cell, layout::CrosswordGrid, slot::SlotDir};
use itertools::Itertools;
use termion::{color, style};
use util::pos::Pos;

use crate::args::ColorMode;

/// Two characters per cell: a letter or clue number on a white background,
/// black squares on black. `blank` prints clue numbers and blanks instead
/// of the solution letters.
pub fn render_grid(xword: &CrosswordGrid, mode: ColorMode, blank: bool) -> String {
  let mut out = String::new();
  for y in 0..xword.size() as i32 {
    for x in 0..xword.size() as i32 {
      let Some(cell) = xword.cell(Pos { x, y }) else {
        continue;
      };
      match (mode, cell.is_black()) {
        (ColorMode::Plain, true) => out.push_str("##"),
        (ColorMode::Plain, false) => out.push_str(&cell_text(cell, blank)),
        (ColorMode::Color, true) => {
          out.push_str(&format!("{}  {}", color::Bg(color::Black), style::Reset));
        }
        (ColorMode::Color, false) => {
          out.push_str(&format!(
            "{}{}{}{}",
            color::Bg(color::LightWhite),
            color::Fg(color::Red),
            cell_text(cell, blank),
            style::Reset
          ));
        }
      }
    }
    out.push('\n');
  }
  out
}

fn cell_text(cell: &Cell, blank: bool) -> String {
  match (blank, cell.letter(), cell.number()) {
    (false, Some(letter), _) => format!(" {}", letter.to_ascii_uppercase()),
    (_, _, Some(number)) => format!("{number:2}"),
    _ => "  ".to_owned(),
  }
}

/// The assigned answers, listed per direction in clue-number order.
pub fn render_answers(xword: &CrosswordGrid) -> String {
  let mut out = String::new();
  for dir in [SlotDir::Across, SlotDir::Down] {
    out.push_str(&format!("{dir}:\n"));
    for slot in xword
      .slots()
      .filter(|slot| slot.dir() == dir)
      .sorted_by_key(|slot| slot.number())
    {
      out.push_str(&format!(
        "  {:2} {}\n",
        slot.number(),
        slot.assigned_word().unwrap_or("-")
      ));
    }
  }
  out
}
