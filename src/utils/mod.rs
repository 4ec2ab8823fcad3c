// Small numeric helpers shared by the analysis modules
pub mod maths_utils;

pub use maths_utils::{get_min_max, mean_value, standard_deviation, variance};
