//! Pure geometry: periodic table grid placement and arc text paths.
//!
//! Nothing in here does I/O or holds state; the sinks turn the numbers and
//! path strings produced here into markup.

mod arc;
pub use arc::*;

mod grid;
pub use grid::*;
