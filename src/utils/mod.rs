//! Shared raster utilities

pub mod raster;

pub use raster::{clamp_u8, convolve3x3, from_array, gaussian_blur, to_array};
