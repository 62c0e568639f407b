//! The tokenizer / wordgraph builder (spec.md component C): turns a raw
//! sentence into a DAG of subword alternatives (`gword`) and flattens
//! that DAG into the word array the rest of the pipeline walks
//! (`tokenizer`).

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod gword;
pub mod tokenizer;

pub use gword::{status, Gword, MorphemeType, NodeIdx, WordGraph};
pub use tokenizer::{tokenize, TokenizeError, TokenizeOptions, TokenizeOutput, TokenizeWarning, WordArrayEntry, DEFAULT_SPLIT_CAP};
