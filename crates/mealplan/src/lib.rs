mod rotation;
mod selector;
mod store;
mod week;

pub use rotation::*;
pub use selector::*;
pub use store::*;
pub use week::*;
