mod consts;
mod map;
mod scatterer;
#[cfg(all(test, feature = "std"))]
mod tests;

pub use consts::*;
pub use map::*;
pub use scatterer::*;
