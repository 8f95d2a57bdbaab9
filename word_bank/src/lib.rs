pub mod word_bank;

pub use word_bank::WordBank;
