pub mod compression;
pub mod error;

// Re-export all modules
pub use compression::*;
