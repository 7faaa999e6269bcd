pub mod macros;
pub mod money;
pub mod time;

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;

pub use money::*;
pub use time::*;
