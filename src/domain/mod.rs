mod counter;
mod errors;

pub use counter::*;
pub use errors::*;
