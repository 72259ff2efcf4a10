//! Decoding the sawmill line format.
//!
//! [`Parser`] turns one text stream into entries; [`MultiParser`] merges
//! several of them into a single stream ordered by timestamp.

mod line;
mod multi;
mod parser;


pub use multi::MultiParser;
pub use parser::{Parser, ParserOptions};
