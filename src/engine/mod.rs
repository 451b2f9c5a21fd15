//! Detection engine: scoring, candidate selection, match detection, and
//! resolution

pub mod candidates;
pub mod detector;
pub mod merge;
pub mod resolution;
pub mod scorer;

pub use candidates::*;
pub use detector::*;
pub use merge::*;
pub use resolution::*;
pub use scorer::*;
