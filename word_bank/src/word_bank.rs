use std::{
  collections::HashMap,
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
};

use log::debug;
use rand::{seq::SliceRandom, Rng};
use util::error::{CrossgenError, CrossgenResult};

pub const MIN_WORD_LEN: u32 = 3;
pub const MAX_WORD_LEN: u32 = 15;

/// Candidate words grouped by length, each group shuffled once at load.
/// Iteration order within a group is the shuffled order, so search results
/// are reproducible for a fixed seed.
#[derive(Clone, Debug)]
pub struct WordBank {
  lists: HashMap<u32, Vec<String>>,
}

impl WordBank {
  pub fn from_file(path: impl AsRef<Path>, rng: &mut impl Rng) -> CrossgenResult<Self> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
      CrossgenError::DictionaryUnavailable(format!("{}: {err}", path.display()))
    })?;
    let words = BufReader::new(file)
      .lines()
      .collect::<Result<Vec<_>, _>>()
      .map_err(|err| CrossgenError::DictionaryUnavailable(format!("{}: {err}", path.display())))?;

    let bank = Self::from_words(words, rng);
    if bank.is_empty() {
      return Err(
        CrossgenError::DictionaryUnavailable(format!(
          "{} contains no usable words",
          path.display()
        ))
        .into(),
      );
    }
    debug!("loaded {} words from {}", bank.word_count(), path.display());
    Ok(bank)
  }

  pub fn from_words(words: impl IntoIterator<Item = String>, rng: &mut impl Rng) -> Self {
    let mut lists: HashMap<u32, Vec<String>> = HashMap::new();
    for word in words {
      if let Some(word) = Self::canonicalize(&word) {
        lists
          .entry(word.chars().count() as u32)
          .or_default()
          .push(word);
      }
    }
    // Shuffle in ascending length order so a fixed seed reproduces the bank.
    for length in MIN_WORD_LEN..=MAX_WORD_LEN {
      if let Some(list) = lists.get_mut(&length) {
        list.shuffle(rng);
      }
    }
    Self { lists }
  }

  /// Entries outside the usable length range or containing non-letter
  /// characters are silently rejected.
  fn canonicalize(word: &str) -> Option<String> {
    let word = word.trim();
    let len = word.chars().count() as u32;
    if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len)
      || !word.chars().all(|c| c.is_ascii_alphabetic())
    {
      return None;
    }
    Some(word.to_ascii_lowercase())
  }

  pub fn words_with_length(&self, length: u32) -> impl Iterator<Item = &str> + '_ {
    self
      .lists
      .get(&length)
      .into_iter()
      .flatten()
      .map(|word| word.as_str())
  }

  pub fn has_words_with_length(&self, length: u32) -> bool {
    self.lists.get(&length).is_some_and(|list| !list.is_empty())
  }

  pub fn word_count(&self) -> usize {
    self.lists.values().map(|list| list.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.lists.values().all(|list| list.is_empty())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used)]

  use std::{env, fs};

  use rand::{rngs::StdRng, SeedableRng};
  use util::error::CrossgenError;

  use super::{WordBank, MAX_WORD_LEN, MIN_WORD_LEN};

  fn bank_from(words: &[&str], seed: u64) -> WordBank {
    let mut rng = StdRng::seed_from_u64(seed);
    WordBank::from_words(words.iter().map(|word| word.to_string()), &mut rng)
  }

  #[test]
  fn filters_and_normalizes_entries() {
    let bank = bank_from(
      &["CAT", " dog ", "ab", "it's", "antidisestablishmentarianism", "hello"],
      1,
    );
    let mut threes: Vec<_> = bank.words_with_length(3).collect();
    threes.sort_unstable();
    assert_eq!(threes, vec!["cat", "dog"]);
    assert_eq!(bank.words_with_length(5).collect::<Vec<_>>(), vec!["hello"]);
    assert!(!bank.has_words_with_length(2));
    assert_eq!(bank.word_count(), 3);
  }

  #[test]
  fn same_seed_reproduces_candidate_order() {
    let words = [
      "cat", "dog", "arm", "tea", "sun", "mud", "fern", "bird", "lamp", "stone", "plane",
    ];
    let first = bank_from(&words, 42);
    let second = bank_from(&words, 42);
    for length in MIN_WORD_LEN..=MAX_WORD_LEN {
      assert_eq!(
        first.words_with_length(length).collect::<Vec<_>>(),
        second.words_with_length(length).collect::<Vec<_>>()
      );
    }
  }

  #[test]
  fn different_seeds_permute_the_same_sets() {
    let words = [
      "cat", "dog", "arm", "tea", "sun", "mud", "fern", "bird", "lamp", "stone", "plane",
    ];
    let first = bank_from(&words, 1);
    let second = bank_from(&words, 2);
    for length in MIN_WORD_LEN..=MAX_WORD_LEN {
      let mut first_words: Vec<_> = first.words_with_length(length).collect();
      let mut second_words: Vec<_> = second.words_with_length(length).collect();
      first_words.sort_unstable();
      second_words.sort_unstable();
      assert_eq!(first_words, second_words);
    }
  }

  #[test]
  fn missing_file_is_dictionary_unavailable() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = WordBank::from_file("/nonexistent/words.txt", &mut rng).unwrap_err();
    assert!(matches!(
      err.downcast_ref::<CrossgenError>(),
      Some(CrossgenError::DictionaryUnavailable(_))
    ));
  }

  #[test]
  fn file_with_no_usable_words_is_dictionary_unavailable() {
    let path = env::temp_dir().join("crossgen_unusable_dict.txt");
    fs::write(&path, "ab\nx1y\n\n").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let result = WordBank::from_file(&path, &mut rng);
    fs::remove_file(&path).ok();
    let err = result.unwrap_err();
    assert!(matches!(
      err.downcast_ref::<CrossgenError>(),
      Some(CrossgenError::DictionaryUnavailable(_))
    ));
  }

  #[test]
  fn loads_words_from_file() {
    let path = env::temp_dir().join("crossgen_dict.txt");
    fs::write(&path, "cat\ndog\nbird\n").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let bank = WordBank::from_file(&path, &mut rng).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(bank.word_count(), 3);
    assert!(bank.has_words_with_length(3));
    assert!(bank.has_words_with_length(4));
  }
}
