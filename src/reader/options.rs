// src/reader/options.rs

/// Settings that control how a CFS file is decoded
///
/// # Example
///
/// ```
/// use cfs_rs::DecodeOptions;
///
/// let options = DecodeOptions::default()
///     .filter_internal_variables(false)
///     .max_channels(32);
/// assert_eq!(options.channel_limit(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    filter_internal_variables: bool,
    max_channels: usize,
    max_frames: usize,
}

impl DecodeOptions {
    /// CED software caps a file at 99 channels
    pub const DEFAULT_MAX_CHANNELS: usize = 100;
    pub const DEFAULT_MAX_FRAMES: usize = u16::MAX as usize;

    pub fn new() -> Self {
        Self::default()
    }

    /// Hide Signal's housekeeping variables (`User1`, `SysD`, ...)
    pub fn filter_internal_variables(mut self, filter: bool) -> Self {
        self.filter_internal_variables = filter;
        self
    }

    /// Channel counts above this are treated as a corrupt header
    pub fn max_channels(mut self, max: usize) -> Self {
        self.max_channels = max;
        self
    }

    /// Frame counts above this are treated as a corrupt header
    pub fn max_frames(mut self, max: usize) -> Self {
        self.max_frames = max;
        self
    }

    pub fn filters_internal_variables(&self) -> bool {
        self.filter_internal_variables
    }

    pub fn channel_limit(&self) -> usize {
        self.max_channels
    }

    pub fn frame_limit(&self) -> usize {
        self.max_frames
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            filter_internal_variables: true,
            max_channels: Self::DEFAULT_MAX_CHANNELS,
            max_frames: Self::DEFAULT_MAX_FRAMES,
        }
    }
}
