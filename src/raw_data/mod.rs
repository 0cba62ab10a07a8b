// src/raw_data/mod.rs
//! Byte-level reading, sample decoding and calibration.

mod cursor;
mod decoder;
mod scaling;

pub use cursor::ByteCursor;
pub use decoder::{DataBlockDecoder, RawSamples, SampleFormat};
pub use scaling::{widen_f32, Calibration, ScalingConverter, XAxis};
