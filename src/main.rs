#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod display;

use clap::Parser;
use grid_gen::layout::{CrosswordGrid, GenerationParams};
use rand::{rngs::StdRng, SeedableRng};
use util::{error::CrossgenResult, time::time_fn};
use word_bank::WordBank;

use crate::args::Args;

fn main() -> CrossgenResult {
  env_logger::init();
  let args = Args::parse();

  let mut rng = match args.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_os_rng(),
  };

  let bank = WordBank::from_file(&args.dict, &mut rng)?;
  let params = GenerationParams {
    size: args.size,
    max_attempts: args.max_attempts,
  };

  let (time, result) = time_fn(|| CrosswordGrid::generate(&params, &bank, &mut rng));
  let xword = result?;
  println!("Took {}s", time.as_secs_f32());
  println!();
  print!("{}", display::render_grid(&xword, args.color, args.blank));
  println!();
  print!("{}", display::render_answers(&xword));

  Ok(())
}
