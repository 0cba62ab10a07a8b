// src/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfsError {
    #[error("Not a CFS file: marker was {found:?}")]
    NotACfsFile { found: String },

    #[error("Unsupported CFS version: {0}")]
    UnsupportedVersion(u8),

    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    #[error("Corrupt frame table: {0}")]
    CorruptFrameTable(String),

    #[error("Unknown data type code {code} on channel {channel}")]
    UnknownDataType { channel: usize, code: u8 },

    #[error("Unsupported channel kind {kind} on channel {channel}")]
    UnsupportedChannelKind { channel: usize, kind: String },

    #[error("Channel {channel} stores text, not samples")]
    NonNumericChannel { channel: usize },

    #[error("Read of {requested} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds { offset: usize, requested: usize, len: usize },

    #[error("Invalid offset {offset} for buffer of {len} bytes")]
    InvalidOffset { offset: usize, len: usize },

    #[error("Misaligned block: {length} bytes with stride {stride} and sample size {sample_size}")]
    MisalignedBlock { length: usize, stride: usize, sample_size: usize },

    #[error("Frame index {index} out of range (frame count {frame_count})")]
    IndexOutOfRange { index: String, frame_count: usize },

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
}

pub type Result<T> = std::result::Result<T, CfsError>;
