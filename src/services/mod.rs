//! Services kept outside the pixel pipeline

pub mod io;

pub use io::{ImageIOService, OutputFormat};
