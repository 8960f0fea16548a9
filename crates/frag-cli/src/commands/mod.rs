pub mod completions;
pub mod config;
pub mod curve;
pub mod run;
pub mod score;
pub mod util;
