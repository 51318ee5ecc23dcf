pub mod distance;

pub use distance::{edit_distance, fuzzy_ratio};
