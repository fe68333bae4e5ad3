//! The tokenizer (spec §2 "Tokenizer", §4.4): a fixed `TokenMatcher` list
//! compiled to one combined tagged DFA, scanned longest-match with
//! declaration-order tie-breaking.

mod matcher;
mod standard;
mod tokenizer;

pub use matcher::TokenMatcher;
pub use standard::standard_matchers;
pub use tokenizer::{signature_of, Tokenizer};
