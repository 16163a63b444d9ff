mod command;
mod day;
mod dinner;

pub use command::*;
pub use day::*;
pub use dinner::*;
