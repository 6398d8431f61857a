//! Deterministic extraction and ranking used when the language model is out
//! of quota. No I/O, no failure modes.

pub mod extract;
pub mod score;

pub use extract::extract_parameters;
pub use score::{rank_hotels, score_hotel};
