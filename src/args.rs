use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
  Color,
  Plain,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  #[arg(long, default_value_t = 15)]
  pub size: u32,

  #[arg(long, default_value = "words_alpha.txt")]
  pub dict: PathBuf,

  #[arg(long)]
  pub seed: Option<u64>,

  #[arg(long, default_value_t = 1000)]
  pub max_attempts: u32,

  #[arg(long, default_value = "color")]
  pub color: ColorMode,

  #[arg(long)]
  pub blank: bool,
}
