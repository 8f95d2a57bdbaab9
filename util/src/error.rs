use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum CrossgenError {
  Internal(String),
  Parse(String),
  DictionaryUnavailable(String),
  GenerationExhausted(u32),
}

impl Display for CrossgenError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      CrossgenError::Internal(msg) => write!(f, "Internal error: {msg}"),
      CrossgenError::Parse(msg) => write!(f, "Parse error: {msg}"),
      CrossgenError::DictionaryUnavailable(msg) => write!(f, "Dictionary unavailable: {msg}"),
      CrossgenError::GenerationExhausted(attempts) => {
        write!(f, "Grid generation exhausted after {attempts} attempts")
      }
    }
  }
}

impl Error for CrossgenError {}

pub type CrossgenResult<T = ()> = Result<T, Box<dyn Error>>;
