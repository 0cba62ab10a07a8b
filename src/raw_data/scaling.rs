// src/raw_data/scaling.rs
use crate::error::{CfsError, Result};
use crate::raw_data::RawSamples;

/// Linear y-axis calibration: `physical = raw * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub scale: f64,
    pub offset: f64,
}

impl Calibration {
    pub const IDENTITY: Calibration = Calibration {
        scale: 1.0,
        offset: 0.0,
    };

    pub fn new(scale: f64, offset: f64) -> Self {
        Calibration { scale, offset }
    }

    /// Build from the single-precision fields stored in a data-section header
    pub fn from_stored(scale: f32, offset: f32) -> Self {
        Calibration {
            scale: widen_f32(scale),
            offset: widen_f32(offset),
        }
    }

    #[inline]
    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }
}

/// Where the x coordinates of a channel's samples come from
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// `x[i] = start + i * interval`
    EqualSpaced { start: f64, interval: f64 },
    /// One stored x value per sample
    Explicit(Vec<f64>),
}

impl XAxis {
    pub fn equal_spaced(start: f64, interval: f64) -> Self {
        XAxis::EqualSpaced { start, interval }
    }
}

/// Converts raw samples to physical units and computes x coordinates
pub struct ScalingConverter;

impl ScalingConverter {
    /// Apply the calibration in double precision
    ///
    /// # Example
    ///
    /// ```
    /// use cfs_rs::raw_data::{Calibration, RawSamples, ScalingConverter};
    ///
    /// let raw = RawSamples::I16(vec![100, 200, 300]);
    /// let physical = ScalingConverter::to_physical(&raw, Calibration::new(0.01, 0.0));
    /// assert_eq!(physical, vec![1.0, 2.0, 3.0]);
    /// ```
    pub fn to_physical(raw: &RawSamples, calibration: Calibration) -> Vec<f64> {
        let mut values = raw.to_f64();
        for v in values.iter_mut() {
            *v = calibration.apply(*v);
        }
        values
    }

    /// X coordinates for `count` samples
    pub fn x_coordinates(axis: &XAxis, count: usize) -> Result<Vec<f64>> {
        match axis {
            XAxis::EqualSpaced { start, interval } => {
                Ok((0..count).map(|i| start + i as f64 * interval).collect())
            }
            XAxis::Explicit(values) => {
                if values.len() != count {
                    return Err(CfsError::CorruptFrameTable(format!(
                        "{} explicit x values for {} samples",
                        values.len(),
                        count
                    )));
                }
                Ok(values.clone())
            }
        }
    }
}

/// Widen a stored single-precision value to the double nearest its shortest
/// decimal form, so a stored 0.001 becomes 0.001 rather than 0.0010000000474974513.
pub fn widen_f32(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}
