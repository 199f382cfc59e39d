pub mod cover;

mod epub;
pub use epub::*;
