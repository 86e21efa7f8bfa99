pub mod outcome;
pub mod rules;
pub mod title;

pub use outcome::normalize_outcome;
pub use title::normalize_title;
