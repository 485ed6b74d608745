//! Title normalization - turning noisy release filenames into comparable form.
//!
//! Release filenames carry a lot of baggage (resolution tags, codec tags,
//! group names, container extensions) that has nothing to do with the movie
//! itself. This module strips all of it and produces a canonical token
//! sequence that the matching engine can compare.

mod normalizer;

pub use normalizer::{extract_year, normalize, CanonicalTitle};
