pub mod benchmark;
pub mod cli;
pub mod holdout;
pub mod util;
