pub mod cs;

pub use cs::compression;
pub use cs::error::{Error, Result};
